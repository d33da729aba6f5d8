use anyhow::Result;
use chrono::{NaiveDate, Utc};
use chrono_english::{parse_date_string, Dialect};
use squad_core::error::CoreError;
use squad_core::models::parse_date_key;
use thiserror::Error;

/// A wall-clock time as entered on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: i32,
    pub minute: i32,
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseTimeError {
    #[error("Malformed time '{0}', expected HH:MM")]
    Malformed(String),
    #[error("Time '{0}' is outside 00:00..23:59")]
    OutOfRange(String),
}

/// Parses a calendar date: `YYYY-MM-DD` first, then natural language
/// such as `tomorrow` or `next friday`.
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    if let Ok(date) = parse_date_key(date_str) {
        return Ok(date);
    }
    parse_date_string(date_str.trim(), Utc::now(), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| {
            CoreError::InvalidInput(format!("Failed to parse date '{}': {}", date_str, e)).into()
        })
}

/// Parses `HH:MM` (or a bare hour like `9`).
pub fn parse_time(time_str: &str) -> Result<TimeOfDay, ParseTimeError> {
    let trimmed = time_str.trim();
    let (hour, minute) = match trimmed.split_once(':') {
        Some((h, m)) => (h, m),
        None => (trimmed, "0"),
    };

    let hour: i32 = hour
        .parse()
        .map_err(|_| ParseTimeError::Malformed(time_str.to_string()))?;
    let minute: i32 = minute
        .parse()
        .map_err(|_| ParseTimeError::Malformed(time_str.to_string()))?;

    if !(0..=23).contains(&hour) || !(0..=59).contains(&minute) {
        return Err(ParseTimeError::OutOfRange(time_str.to_string()));
    }
    Ok(TimeOfDay { hour, minute })
}

/// Splits an optional `HH:MM` flag into the hour/minute pair the store uses.
pub fn split_time(time_str: Option<&str>) -> Result<(Option<i32>, Option<i32>)> {
    match time_str {
        Some(s) => {
            let time = parse_time(s).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
            Ok((Some(time.hour), Some(time.minute)))
        }
        None => Ok((None, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("09:30", 9, 30)]
    #[case("18:05", 18, 5)]
    #[case("7", 7, 0)]
    #[case(" 0:00 ", 0, 0)]
    #[case("23:59", 23, 59)]
    fn test_parse_time_valid(#[case] input: &str, #[case] hour: i32, #[case] minute: i32) {
        assert_eq!(parse_time(input).unwrap(), TimeOfDay { hour, minute });
    }

    #[rstest]
    #[case("24:00")]
    #[case("12:60")]
    #[case("-1:00")]
    fn test_parse_time_out_of_range(#[case] input: &str) {
        assert!(matches!(parse_time(input), Err(ParseTimeError::OutOfRange(_))));
    }

    #[rstest]
    #[case("noon")]
    #[case("9:3o")]
    #[case("")]
    fn test_parse_time_malformed(#[case] input: &str) {
        assert!(matches!(parse_time(input), Err(ParseTimeError::Malformed(_))));
    }

    #[test]
    fn test_parse_date_key_first() {
        assert_eq!(
            parse_date("2024-03-09").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
    }

    #[test]
    fn test_parse_date_natural_language() {
        let today = Utc::now().date_naive();
        let tomorrow = parse_date("tomorrow").unwrap();
        assert_eq!(tomorrow, today.succ_opt().unwrap());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("sometime soon-ish").is_err());
    }

    #[test]
    fn test_split_time() {
        assert_eq!(split_time(Some("18:30")).unwrap(), (Some(18), Some(30)));
        assert_eq!(split_time(None).unwrap(), (None, None));
        assert!(split_time(Some("25:00")).is_err());
    }
}
