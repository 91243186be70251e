use domain::{datetime::format_date_time, Booking};

use super::render_table;
use crate::{booking::BookingApi, error::ClientError};

/// Read-only list of every booking.
#[derive(Debug, Clone, Default)]
pub struct BookingList {
    pub bookings: Vec<Booking>,
}

impl BookingList {
    pub async fn load<A: BookingApi + ?Sized>(api: &A) -> Result<Self, ClientError> {
        Ok(Self {
            bookings: api.list_bookings().await?,
        })
    }

    pub fn render(&self) -> String {
        if self.bookings.is_empty() {
            return "No bookings yet".to_string();
        }

        let rows: Vec<Vec<String>> = self
            .bookings
            .iter()
            .map(|booking| {
                vec![
                    booking.title.clone(),
                    booking.name.clone(),
                    booking.rooms.name.clone(),
                    format!(
                        "{} to {}",
                        format_date_time(&booking.start_time),
                        format_date_time(&booking.end_time)
                    ),
                    booking.status.as_str().to_uppercase(),
                ]
            })
            .collect();

        render_table(&["TITLE", "ORGANIZER", "ROOM", "WHEN", "STATUS"], &rows)
    }
}
