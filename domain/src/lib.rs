//! Booking domain: the shapes exchanged with the booking backend and the
//! pure rules applied to them before and after every call.

pub mod booking;
pub mod datetime;
pub mod filter;
pub mod room;
pub mod status;
pub mod validation;

pub use booking::{Booking, BookingForm, BookingPayload, ErrorBody, RoomSnapshot, StatusUpdate};
pub use filter::{filter_bookings, BookingSummary, FilterCriteria, StatusFilter};
pub use room::{map_room_data, Availability, Room};
pub use status::{AdminAction, BookingStatus, TransitionError};
pub use validation::{
    validate_booking, validate_booking_in, BookingWindow, ValidationError, MIN_DURATION_MINUTES,
};
