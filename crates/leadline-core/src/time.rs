use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use thiserror::Error;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

#[derive(Debug, Error)]
pub enum TimeParseError {
    #[error("timestamp cannot be empty")]
    Empty,
    #[error("invalid datetime format: expected YYYY-MM-DD or YYYY-MM-DD HH:MM")]
    InvalidDateTime,
    #[error("ambiguous local time: {0}")]
    AmbiguousLocalTime(String),
}

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

/// Accepts `YYYY-MM-DD` (midnight) or `YYYY-MM-DD HH:MM[:SS]` in local time.
pub fn parse_local_timestamp(input: &str) -> Result<i64, TimeParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::Empty);
    }

    let naive = if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0)
    } else {
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    };
    let naive = naive.ok_or(TimeParseError::InvalidDateTime)?;

    Local
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc).timestamp())
        .ok_or_else(|| TimeParseError::AmbiguousLocalTime(naive.to_string()))
}

pub fn format_timestamp_date(ts: i64) -> String {
    to_local(ts).format("%Y-%m-%d").to_string()
}

pub fn format_timestamp_datetime(ts: i64) -> String {
    to_local(ts).format("%Y-%m-%d %H:%M").to_string()
}

/// Start and end (exclusive) of the calendar day containing `now_utc` at `offset`.
pub fn day_bounds(now_utc: i64, offset: FixedOffset) -> (i64, i64) {
    let now = DateTime::<Utc>::from_timestamp(now_utc, 0).unwrap_or_default();
    let local_midnight = now
        .with_timezone(&offset)
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default();
    let start = local_midnight.and_utc().timestamp() - i64::from(offset.local_minus_utc());
    (start, start + Duration::days(1).num_seconds())
}

fn to_local(ts: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
}

#[cfg(test)]
mod tests {
    use super::{day_bounds, format_timestamp_datetime, parse_local_timestamp, TimeParseError};
    use chrono::{FixedOffset, Local, TimeZone, Utc};

    #[test]
    fn parse_local_timestamp_accepts_date_and_datetime() {
        let ts = parse_local_timestamp("2030-01-15 13:45").unwrap();
        assert_eq!(format_timestamp_datetime(ts), "2030-01-15 13:45");

        let midnight = parse_local_timestamp("2030-01-15").unwrap();
        let expected = Local
            .with_ymd_and_hms(2030, 1, 15, 0, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
            .timestamp();
        assert_eq!(midnight, expected);
    }

    #[test]
    fn parse_local_timestamp_rejects_garbage() {
        assert!(matches!(parse_local_timestamp(" "), Err(TimeParseError::Empty)));
        assert!(matches!(
            parse_local_timestamp("next tuesday"),
            Err(TimeParseError::InvalidDateTime)
        ));
    }

    #[test]
    fn day_bounds_respect_offset() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 2, 0, 0).unwrap().timestamp();
        let utc = FixedOffset::east_opt(0).unwrap();
        let (start, end) = day_bounds(now, utc);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap().timestamp());
        assert_eq!(end - start, 86_400);

        let bogota = FixedOffset::west_opt(5 * 3600).unwrap();
        let (start, _) = day_bounds(now, bogota);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 9, 5, 0, 0).unwrap().timestamp());
    }
}
