use chrono::{DateTime, Duration, Local, TimeZone};
use thiserror::Error;

use crate::{booking::BookingForm, datetime::parse_instant_in};

pub const MIN_DURATION_MINUTES: i64 = 30;

/// First rule a booking form breaks. Variants are declared in the order the
/// rules are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name required.")]
    NameRequired,
    #[error("title required.")]
    TitleRequired,
    #[error("description required.")]
    DescriptionRequired,
    #[error("start time required.")]
    StartTimeRequired,
    #[error("end time required.")]
    EndTimeRequired,
    #[error("start time cannot be in the past.")]
    StartInPast,
    #[error("end time must be after start time.")]
    EndNotAfterStart,
    #[error("minimum meeting duration is 30 minutes.")]
    TooShort,
}

/// The parsed interval of a form that passed validation.
#[derive(Debug, Clone)]
pub struct BookingWindow<Tz: TimeZone = Local> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

// Manual impls: `Local` itself has no `PartialEq`.
impl<Tz: TimeZone> PartialEq for BookingWindow<Tz> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl<Tz: TimeZone> Eq for BookingWindow<Tz> {}

impl<Tz: TimeZone> BookingWindow<Tz> {
    pub fn duration(&self) -> Duration {
        self.end.clone() - self.start.clone()
    }
}

/// Checks a booking form against `now`, reading form times in the local zone.
///
/// A timestamp that is present but cannot be parsed is reported as missing.
/// Times are compared as instants, so a range spanning a clock change
/// counts the minutes that actually elapse.
pub fn validate_booking(
    form: &BookingForm,
    now: DateTime<Local>,
) -> Result<BookingWindow, ValidationError> {
    validate_booking_in(&Local, form, now)
}

/// [`validate_booking`] with form times read in `zone`.
pub fn validate_booking_in<Tz: TimeZone>(
    zone: &Tz,
    form: &BookingForm,
    now: DateTime<Tz>,
) -> Result<BookingWindow<Tz>, ValidationError> {
    if is_blank(&form.name) {
        return Err(ValidationError::NameRequired);
    }
    if is_blank(&form.title) {
        return Err(ValidationError::TitleRequired);
    }
    if is_blank(&form.description) {
        return Err(ValidationError::DescriptionRequired);
    }
    if is_blank(&form.start_time) {
        return Err(ValidationError::StartTimeRequired);
    }
    if is_blank(&form.end_time) {
        return Err(ValidationError::EndTimeRequired);
    }

    let start =
        parse_instant_in(zone, &form.start_time).ok_or(ValidationError::StartTimeRequired)?;
    let end = parse_instant_in(zone, &form.end_time).ok_or(ValidationError::EndTimeRequired)?;

    if start < now {
        return Err(ValidationError::StartInPast);
    }
    if end <= start {
        return Err(ValidationError::EndNotAfterStart);
    }

    let window = BookingWindow { start, end };
    if window.duration() < Duration::minutes(MIN_DURATION_MINUTES) {
        return Err(ValidationError::TooShort);
    }

    Ok(window)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
