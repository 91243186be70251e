use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone};

// `%.f` also accepts the absence of a fractional part.
const WALL_CLOCK_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a form or backend timestamp into local wall-clock time.
///
/// `datetime-local` values (`2025-01-01T10:00`) are taken as already local;
/// RFC 3339 values carrying an offset are converted to the local zone.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Local).naive_local());
    }

    WALL_CLOCK_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Parses a timestamp into an absolute instant.
///
/// Offset-carrying values keep their offset; wall-clock values are read in
/// the local zone.
pub fn parse_instant(raw: &str) -> Option<DateTime<Local>> {
    parse_instant_in(&Local, raw)
}

/// [`parse_instant`] with wall-clock values read in `zone`.
pub fn parse_instant_in<Tz: TimeZone>(zone: &Tz, raw: &str) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(zone));
    }
    parse_timestamp(raw).and_then(|naive| resolve_local(zone, naive))
}

/// Places a wall-clock time in `zone`. A repeated hour resolves to its first
/// occurrence; a time skipped by a forward jump moves forward by an hour.
pub fn resolve_local<Tz: TimeZone>(zone: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| zone.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}

/// `5 Jan 2025 09:30`; unparseable input is returned unchanged.
pub fn format_date_time(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(at) => at.format("%-d %b %Y %H:%M").to_string(),
        None => raw.to_string(),
    }
}

pub fn now_local() -> DateTime<Local> {
    Local::now()
}
