use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A bookable meeting room as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub location: String,
    pub capacity: u32,
    pub image_link: String,
    pub status: String,
    pub realtime_status: String,
    pub next_booking_start: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Booked,
}

impl Availability {
    pub fn label(self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::Booked => "Booked",
        }
    }
}

impl Room {
    /// Only `"available"` is meaningful; any other realtime status shows as booked.
    pub fn availability(&self) -> Availability {
        if self.realtime_status == "available" {
            Availability::Available
        } else {
            Availability::Booked
        }
    }
}

/// Reshapes one raw backend record into a [`Room`], field by field.
/// Absent or mistyped fields fall back to empty values.
pub fn map_room_data(data: &Value) -> Room {
    Room {
        id: opaque_text(&data["id"]),
        name: text(data, "name"),
        location: text(data, "location"),
        capacity: data["capacity"]
            .as_u64()
            .and_then(|c| u32::try_from(c).ok())
            .unwrap_or_default(),
        image_link: text(data, "image_link"),
        status: text(data, "status"),
        realtime_status: text(data, "realtime_status"),
        next_booking_start: data["next_booking_start"].as_str().map(str::to_string),
    }
}

fn text(data: &Value, key: &str) -> String {
    data[key].as_str().unwrap_or_default().to_string()
}

/// Ids are opaque; numeric ids from SQL-backed APIs become their decimal text.
pub(crate) fn opaque_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
