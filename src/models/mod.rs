//! Defines the data structures and models used throughout the application.
//!
//! This includes structures representing raw payloads fetched from the NASA APIs,
//! the normalized domain types built from them, and the query types that
//! describe (and validate) what to ask for.

mod apod;
mod epic;
mod mars;
mod neo;

pub use apod::*;
pub use epic::*;
pub use mars::*;
pub use neo::*;

use chrono::NaiveDate;
use crate::error::{AppError, Result};

/// Date format used by every NASA endpoint in this crate.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date, reporting a CLI error naming the offending field.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        AppError::Cli(format!(
            "Invalid {} '{}': expected YYYY-MM-DD ({})",
            field, value, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_iso_dates() {
        let date = parse_date("date", " 2024-02-29 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        for bad in ["2023-02-29", "18/01/2026", "yesterday", ""] {
            match parse_date("start date", bad) {
                Err(AppError::Cli(msg)) => assert!(msg.contains("start date")),
                other => panic!("Expected Cli error for '{}', got {:?}", bad, other),
            }
        }
    }
}
