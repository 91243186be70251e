use domain::{datetime::format_date_time, Room};

use super::render_table;
use crate::{error::ClientError, room::RoomClient};

/// Room cards of the landing page, as rows.
#[derive(Debug, Clone, Default)]
pub struct RoomBrowser {
    pub rooms: Vec<Room>,
}

impl RoomBrowser {
    pub async fn load(client: &RoomClient) -> Result<Self, ClientError> {
        Ok(Self {
            rooms: client.list_rooms().await?,
        })
    }

    pub fn render(&self) -> String {
        if self.rooms.is_empty() {
            return "No rooms available".to_string();
        }

        let rows: Vec<Vec<String>> = self
            .rooms
            .iter()
            .map(|room| {
                vec![
                    room.id.clone(),
                    room.name.clone(),
                    room.location.clone(),
                    room.capacity.to_string(),
                    room.availability().label().to_string(),
                    room.next_booking_start
                        .as_deref()
                        .map(format_date_time)
                        .unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();

        render_table(
            &["ID", "NAME", "LOCATION", "CAPACITY", "STATUS", "NEXT BOOKING"],
            &rows,
        )
    }
}
