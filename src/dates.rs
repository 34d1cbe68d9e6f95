//! Timestamp text in the `yyyy-MM-dd HH:mm:ss` form used by label
//! arguments, always in UTC.

use time::format_description::BorrowedFormatItem;
use time::macros::{datetime, format_description};
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Earliest instant [`parse_timestamp_checked`] accepts.
pub const EARLIEST: OffsetDateTime = datetime!(1700-01-01 00:00:00 UTC);
/// Latest instant [`parse_timestamp_checked`] accepts.
pub const LATEST: OffsetDateTime = datetime!(4000-12-31 23:59:59 UTC);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("invalid timestamp '{input}': {reason}")]
    Parse { input: String, reason: String },
    #[error("timestamp '{0}' is outside 1700-01-01 .. 4000-12-31")]
    OutOfRange(String),
    #[error("cannot format timestamp: {0}")]
    Format(String),
}

pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, DateError> {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .map_err(|e| DateError::Format(e.to_string()))
}

/// Parses a UTC timestamp. The whole input must match; trailing characters
/// are an error.
pub fn parse_timestamp(input: &str) -> Result<OffsetDateTime, DateError> {
    PrimitiveDateTime::parse(input, TIMESTAMP_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| DateError::Parse {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

/// Like [`parse_timestamp`], but only accepts instants between
/// [`EARLIEST`] and [`LATEST`].
pub fn parse_timestamp_checked(input: &str) -> Result<OffsetDateTime, DateError> {
    let timestamp = parse_timestamp(input)?;
    if timestamp < EARLIEST || timestamp > LATEST {
        return Err(DateError::OutOfRange(input.to_string()));
    }
    Ok(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_now_round_trips() {
        let now = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();
        let text = format_timestamp(now).unwrap();
        assert_eq!(parse_timestamp_checked(&text).unwrap(), now);
    }

    #[test]
    fn test_offset_is_normalized() {
        let local = datetime!(2024-03-01 01:30:00 +02:00);
        assert_eq!(format_timestamp(local).unwrap(), "2024-02-29 23:30:00");
    }

    #[rstest]
    #[case("1700-01-01 00:00:00")]
    #[case("4000-12-31 23:59:59")]
    #[case("2001-09-09 01:46:40")]
    fn test_in_range(#[case] input: &str) {
        assert!(parse_timestamp_checked(input).is_ok());
    }

    #[rstest]
    #[case("1699-12-31 23:59:59")]
    #[case("4001-01-01 00:00:00")]
    fn test_out_of_range(#[case] input: &str) {
        assert!(parse_timestamp(input).is_ok());
        assert!(matches!(
            parse_timestamp_checked(input),
            Err(DateError::OutOfRange(_))
        ));
    }

    #[rstest]
    #[case("2020-01-01 00:00:00x")]
    #[case("2020-01-01 00:00:00 ")]
    #[case("2020-01-01")]
    #[case("2020-13-01 00:00:00")]
    fn test_malformed(#[case] input: &str) {
        assert!(matches!(
            parse_timestamp_checked(input),
            Err(DateError::Parse { .. })
        ));
    }
}
