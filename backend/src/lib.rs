//! Passthrough client for the external booking API.
//!
//! Every call returns the backend's status code together with its decoded
//! JSON body, so the proxy routes can relay either verbatim.

use reqwest::{header, Client, Error as ReqwestError, Response, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ReqwestError),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    Url(String),
}

/// Status and JSON body of one backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendReply {
    pub status: u16,
    pub body: Value,
}

impl BackendReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST {base}/bookings` with the caller's body forwarded untouched.
    pub async fn create_booking(&self, body: &Value) -> Result<BackendReply, BackendError> {
        let url = self.url(&["bookings"])?;
        let response = self.client.post(url).json(body).send().await?;
        let reply = read_reply(response).await?;
        debug!(status = reply.status, "backend: create booking");
        Ok(reply)
    }

    /// `GET {base}/bookings`, always asking for a fresh copy.
    pub async fn list_bookings(&self) -> Result<BackendReply, BackendError> {
        let url = self.url(&["bookings"])?;
        let response = self
            .client
            .get(url)
            .header(header::CACHE_CONTROL, "no-store")
            .send()
            .await?;
        let reply = read_reply(response).await?;
        debug!(status = reply.status, "backend: list bookings");
        Ok(reply)
    }

    /// `PATCH {base}/bookings/{id}/status`. `body` is sent as given; the
    /// backend decides whether its `status` is acceptable.
    pub async fn update_booking_status(
        &self,
        id: &str,
        body: &Value,
    ) -> Result<BackendReply, BackendError> {
        let url = self.url(&["bookings", id, "status"])?;
        let response = self
            .client
            .patch(url)
            .header(header::CACHE_CONTROL, "no-store")
            .json(body)
            .send()
            .await?;
        let reply = read_reply(response).await?;
        debug!(status = reply.status, booking_id = id, "backend: update status");
        Ok(reply)
    }

    /// Appends percent-encoded segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| BackendError::Url(format!("{}: {err}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Url(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn read_reply(response: Response) -> Result<BackendReply, BackendError> {
    let status = response.status().as_u16();
    let text = response.text().await?;
    let body = serde_json::from_str(&text).map_err(|err| {
        warn!(status, "backend: response body is not JSON");
        BackendError::Json(err)
    })?;
    Ok(BackendReply { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_and_escaped() {
        let client = BackendClient::new("http://backend.local/api/");
        assert_eq!("http://backend.local/api", client.base_url());
        assert_eq!(
            "http://backend.local/api/bookings/a%2Fb/status",
            client.url(&["bookings", "a/b", "status"]).unwrap().as_str()
        );
    }

    #[test]
    fn bad_base_url_is_reported() {
        let client = BackendClient::new("not a url");
        assert!(matches!(client.url(&["bookings"]), Err(BackendError::Url(_))));
    }

    #[test]
    fn success_range() {
        let reply = |status| BackendReply {
            status,
            body: Value::Null,
        };
        assert!(reply(200).is_success());
        assert!(reply(201).is_success());
        assert!(!reply(400).is_success());
        assert!(!reply(500).is_success());
    }
}
