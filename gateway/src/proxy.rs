//! Proxy routes towards the external booking API.
//!
//! Error bodies are always `{ "message": ... }`. Backend and transport
//! details go to the log, never to the caller.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use backend::{BackendClient, BackendReply};
use client::RoomClient;
use common_net::metrics::gateway_metrics;
use domain::ErrorBody;
use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::{BOOKING_PATH, BOOKING_STATUS_PATH, ROOMS_PATH};

const INTERNAL_ERROR: &str = "Internal server error";
const BOOKING_FAILED: &str = "Booking failed";
const FETCH_BOOKINGS_FAILED: &str = "Failed to fetch bookings";
const BACKEND_UNREACHABLE: &str = "Failed to connect to backend service";
const ROOMS_FAILED: &str = "Error fetching rooms";

#[derive(Clone)]
pub struct ProxyState {
    pub backend: BackendClient,
    pub rooms: RoomClient,
}

fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

fn relay_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}

fn internal_error(route: &str) -> Response {
    gateway_metrics().inc_backend_failure(route);
    message(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
}

/// `POST /api/booking`
pub async fn create_booking(State(state): State<ProxyState>, body: Bytes) -> Response {
    gateway_metrics().inc_request(BOOKING_PATH);

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(%err, "create booking: unreadable request body");
            return internal_error("create_booking");
        }
    };

    match state.backend.create_booking(&payload).await {
        Ok(BackendReply { status, body }) if (200..300).contains(&status) => {
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(BackendReply { status, body }) => {
            let text = ErrorBody::message_of(&body).unwrap_or_else(|| BOOKING_FAILED.to_string());
            warn!(status, message = %text, "create booking rejected by backend");
            message(relay_status(status), text)
        }
        Err(err) => {
            error!(%err, "create booking: backend call failed");
            internal_error("create_booking")
        }
    }
}

/// `GET /api/booking`
pub async fn list_bookings(State(state): State<ProxyState>) -> Response {
    gateway_metrics().inc_request(BOOKING_PATH);

    match state.backend.list_bookings().await {
        Ok(reply) if reply.is_success() => (StatusCode::OK, Json(reply.body)).into_response(),
        Ok(reply) => {
            warn!(status = reply.status, "list bookings rejected by backend");
            message(relay_status(reply.status), FETCH_BOOKINGS_FAILED)
        }
        Err(err) => {
            error!(%err, "list bookings: backend call failed");
            internal_error("list_bookings")
        }
    }
}

/// `PATCH /api/bookings/:id/status`, relayed verbatim in both directions.
pub async fn update_booking_status(
    State(state): State<ProxyState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    gateway_metrics().inc_request(BOOKING_STATUS_PATH);

    let update = match status_body(&body) {
        Some(update) => update,
        None => {
            warn!(booking_id = %id, "update status: unreadable request body");
            gateway_metrics().inc_backend_failure("update_booking_status");
            return message(StatusCode::INTERNAL_SERVER_ERROR, BACKEND_UNREACHABLE);
        }
    };

    match state.backend.update_booking_status(&id, &update).await {
        Ok(BackendReply { status, body }) => (relay_status(status), Json(body)).into_response(),
        Err(err) => {
            error!(%err, booking_id = %id, "update status: backend call failed");
            gateway_metrics().inc_backend_failure("update_booking_status");
            message(StatusCode::INTERNAL_SERVER_ERROR, BACKEND_UNREACHABLE)
        }
    }
}

/// Rebuilds `{status}` from the request body. The value is not checked here;
/// an absent `status` yields `{}`. `None` for non-JSON or `null` bodies.
fn status_body(raw: &[u8]) -> Option<Value> {
    let body: Value = serde_json::from_slice(raw).ok()?;
    if body.is_null() {
        return None;
    }
    let mut update = Map::new();
    if let Some(status) = body.get("status") {
        update.insert("status".to_string(), status.clone());
    }
    Some(Value::Object(update))
}

/// `GET /api/rooms`
pub async fn list_rooms(State(state): State<ProxyState>) -> Response {
    gateway_metrics().inc_request(ROOMS_PATH);

    match state.rooms.list_rooms().await {
        Ok(rooms) => (StatusCode::OK, Json(rooms)).into_response(),
        Err(err) => {
            error!(kind = ?err.kind, "list rooms failed");
            gateway_metrics().inc_backend_failure("list_rooms");
            message(StatusCode::INTERNAL_SERVER_ERROR, ROOMS_FAILED)
        }
    }
}
