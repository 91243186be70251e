use async_trait::async_trait;
use chrono::{DateTime, Local};
use domain::{validate_booking, Booking, BookingForm, BookingPayload, BookingStatus, StatusUpdate};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ClientError, Operation};

/// Booking calls the views depend on.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn create_booking(&self, payload: &BookingPayload) -> Result<Booking, ClientError>;

    /// Bookings in backend order.
    async fn list_bookings(&self) -> Result<Vec<Booking>, ClientError>;

    /// Any status is forwarded; the backend decides whether the transition is legal.
    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Booking, ClientError>;
}

/// Validates the form locally, then creates the booking. Nothing is sent
/// when validation fails.
pub async fn submit_booking<A>(
    api: &A,
    room_id: &str,
    form: BookingForm,
    now: DateTime<Local>,
) -> Result<Booking, ClientError>
where
    A: BookingApi + ?Sized,
{
    validate_booking(&form, now)?;
    api.create_booking(&form.into_payload(room_id)).await
}

/// HTTP client for the gateway's `/api` routes.
#[derive(Debug, Clone)]
pub struct BookingClient {
    client: Client,
    api_base: String,
}

impl BookingClient {
    /// `api_base` is the prefix the routes hang off, e.g. `http://127.0.0.1:3000/api`.
    pub fn new(api_base: &str) -> Self {
        Self::with_client(Client::new(), api_base)
    }

    pub fn with_client(client: Client, api_base: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, operation: Operation, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid = |reason: String| {
            warn!(%operation, api_base = %self.api_base, %reason, "invalid api base");
            ClientError::unknown(operation)
        };
        let mut url = Url::parse(&self.api_base).map_err(|err| invalid(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|err| ClientError::network(operation, &err))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ClientError::network(operation, &err))?;
        let body: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            return Err(ClientError::backend(operation, status.as_u16(), body.as_ref()));
        }

        let body = body.ok_or_else(|| ClientError::unknown(operation))?;
        serde_json::from_value(body).map_err(|err| {
            warn!(%operation, %err, "unexpected response shape");
            ClientError::unknown(operation)
        })
    }
}

#[async_trait]
impl BookingApi for BookingClient {
    async fn create_booking(&self, payload: &BookingPayload) -> Result<Booking, ClientError> {
        let operation = Operation::BookingCreation;
        let url = self.url(operation, &["booking"])?;
        let booking: Booking = self
            .send(operation, self.client.post(url).json(payload))
            .await?;
        info!(booking_id = %booking.id, room_id = %booking.room_id, "booking created");
        Ok(booking)
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, ClientError> {
        let operation = Operation::BookingFetch;
        let url = self.url(operation, &["booking"])?;
        let bookings: Vec<Booking> = self.send(operation, self.client.get(url)).await?;
        debug!(count = bookings.len(), "bookings fetched");
        Ok(bookings)
    }

    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Booking, ClientError> {
        let operation = Operation::BookingUpdate;
        let url = self.url(operation, &["bookings", id, "status"])?;
        let body = StatusUpdate { status };
        let booking: Booking = self
            .send(operation, self.client.patch(url).json(&body))
            .await?;
        info!(booking_id = %booking.id, status = %booking.status, "booking status updated");
        Ok(booking)
    }
}
