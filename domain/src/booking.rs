use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{datetime, room::opaque_text, status::BookingStatus};

/// Denormalized room details embedded in each booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(deserialize_with = "opaque_id")]
    pub room_id: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub description: String,
    /// Organizer.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub created_at: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default, deserialize_with = "snapshot_or_default")]
    pub rooms: RoomSnapshot,
}

impl Booking {
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        datetime::parse_timestamp(&self.start_time)
    }

    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        datetime::parse_timestamp(&self.end_time)
    }
}

/// Write-side projection of [`Booking`]; id, status, created_at and the room
/// snapshot are assigned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub room_id: String,
    pub name: String,
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
}

/// The fields a user types into the booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub name: String,
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
}

impl BookingForm {
    pub fn into_payload(self, room_id: impl Into<String>) -> BookingPayload {
        BookingPayload {
            room_id: room_id.into(),
            name: self.name,
            title: self.title,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Body of `PATCH /bookings/{id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

/// Error body returned by the proxy routes and, usually, by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Pulls a non-empty `message` string out of an arbitrary JSON body.
    pub fn message_of(body: &Value) -> Option<String> {
        body.get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(opaque_text(&value))
}

/// `null` reads as an empty string.
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn snapshot_or_default<'de, D>(deserializer: D) -> Result<RoomSnapshot, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RoomSnapshot>::deserialize(deserializer)?.unwrap_or_default())
}
