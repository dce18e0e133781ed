//! Calendar parsing at the HTTP edge
//!
//! The booking core only sees `NaiveDate`/`NaiveTime`. Clients may send
//! `DD-MM-YYYY` or `DD/MM/YYYY`; both are normalized here.

use chrono::{NaiveDate, NaiveTime};

use crate::domain::{DomainError, DomainResult};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

pub fn parse_date(raw: &str) -> DomainResult<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| {
            DomainError::Validation(format!(
                "Invalid date '{}', expected YYYY-MM-DD",
                raw
            ))
        })
}

pub fn parse_time(raw: &str) -> DomainResult<NaiveTime> {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| {
            DomainError::Validation(format!("Invalid time '{}', expected HH:MM:SS", raw))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_first_dates_are_normalized() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        for raw in ["2026-10-16", "16-10-2026", "16/10/2026", " 2026-10-16 "] {
            assert_eq!(parse_date(raw).unwrap(), expected, "{}", raw);
        }
        assert_eq!(expected.format("%Y-%m-%d").to_string(), "2026-10-16");
    }

    #[test]
    fn garbage_dates_are_validation_errors() {
        for raw in ["", "2026/10/16", "31-02-2026", "tomorrow"] {
            assert!(matches!(parse_date(raw), Err(DomainError::Validation(_))), "{}", raw);
        }
    }

    #[test]
    fn times_accept_optional_seconds() {
        let expected = NaiveTime::from_hms_opt(13, 30, 0).unwrap();
        assert_eq!(parse_time("13:30").unwrap(), expected);
        assert_eq!(parse_time("13:30:00").unwrap(), expected);
        assert!(parse_time("25:00").is_err());
    }
}
