//! Typed clients for the booking gateway and the terminal views built on them.

pub mod booking;
pub mod error;
pub mod room;
pub mod views;

pub use booking::{submit_booking, BookingApi, BookingClient};
pub use error::{ClientError, ErrorKind, Operation};
pub use room::{RoomClient, ROOM_REVALIDATE};
pub use views::{AdminBoard, BookingList, RoomBrowser};
