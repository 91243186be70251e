use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use domain::{map_room_data, Room};
use reqwest::{Client, Url};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{ClientError, Operation};

/// How long a successful room listing is reused before asking again.
pub const ROOM_REVALIDATE: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct CachedRooms {
    fetched_at: Instant,
    rooms: Vec<Room>,
}

/// Lists rooms from `{base}/rooms`. Works against the booking backend
/// directly or against the gateway's `/api` prefix.
///
/// Clones share one revalidation slot. Failures are never cached.
#[derive(Debug, Clone)]
pub struct RoomClient {
    client: Client,
    base_url: String,
    revalidate: Duration,
    cached: Arc<RwLock<Option<CachedRooms>>>,
}

impl RoomClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            revalidate: ROOM_REVALIDATE,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_revalidate(mut self, revalidate: Duration) -> Self {
        self.revalidate = revalidate;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>, ClientError> {
        {
            let cached = self.cached.read().await;
            if let Some(entry) = cached.as_ref() {
                if entry.fetched_at.elapsed() < self.revalidate {
                    debug!(count = entry.rooms.len(), "rooms served from revalidation slot");
                    return Ok(entry.rooms.clone());
                }
            }
        }

        let rooms = self.fetch_rooms().await?;
        let mut cached = self.cached.write().await;
        *cached = Some(CachedRooms {
            fetched_at: Instant::now(),
            rooms: rooms.clone(),
        });
        Ok(rooms)
    }

    /// Drops the cached listing so the next call goes to the network.
    pub async fn invalidate(&self) {
        self.cached.write().await.take();
    }

    async fn fetch_rooms(&self) -> Result<Vec<Room>, ClientError> {
        let operation = Operation::RoomFetch;
        let url = Url::parse(&format!("{}/rooms", self.base_url)).map_err(|err| {
            warn!(base_url = %self.base_url, %err, "invalid rooms url");
            ClientError::unknown(operation)
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ClientError::network(operation, &err))?;

        let status = response.status();
        if !status.is_success() {
            // Server text is not surfaced for room listings.
            return Err(ClientError::backend(operation, status.as_u16(), None));
        }

        let text = response
            .text()
            .await
            .map_err(|err| ClientError::network(operation, &err))?;
        let body: Value = serde_json::from_str(&text).map_err(|err| {
            warn!(%err, "rooms response is not JSON");
            ClientError::unknown(operation)
        })?;
        let records = body.as_array().ok_or_else(|| {
            warn!("rooms response is not an array");
            ClientError::unknown(operation)
        })?;

        let rooms: Vec<Room> = records.iter().map(map_room_data).collect();
        debug!(count = rooms.len(), "rooms fetched");
        Ok(rooms)
    }
}
