//! # Naap Number Formatting
//!
//! The naap number (Urdu "naap" = measurement) is the human-readable
//! customer identifier: a per-year sequence rendered as
//! `{year}-{number:04}`, e.g. `2025-0001`. The database side of the
//! allocation lives in `darzi-db`; this module owns the pure
//! formatting and parsing.

use crate::error::CoreError;

/// Renders a naap number.
///
/// Numbers beyond 9999 widen past four digits instead of truncating:
/// `format_naap_number(2025, 10000)` is `"2025-10000"`.
///
/// ## Example
/// ```rust
/// use darzi_core::naap::format_naap_number;
///
/// assert_eq!(format_naap_number(2025, 1), "2025-0001");
/// assert_eq!(format_naap_number(2025, 42), "2025-0042");
/// ```
pub fn format_naap_number(year: i32, number: i64) -> String {
    format!("{year}-{number:04}")
}

/// Splits a naap number back into `(year, number)`.
///
/// Used when sorting or grouping imported customers by their original
/// year of registration.
pub fn parse_naap_number(naap: &str) -> Result<(i32, i64), CoreError> {
    let malformed = || CoreError::MalformedNaapNumber(naap.to_string());

    let (year, number) = naap.split_once('-').ok_or_else(malformed)?;
    let year: i32 = year.parse().map_err(|_| malformed())?;
    let number: i64 = number.parse().map_err(|_| malformed())?;
    if number < 1 {
        return Err(malformed());
    }
    Ok((year, number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(format_naap_number(2025, 1), "2025-0001");
        assert_eq!(format_naap_number(2025, 123), "2025-0123");
        assert_eq!(format_naap_number(2023, 9999), "2023-9999");
    }

    #[test]
    fn test_format_widens_past_9999() {
        assert_eq!(format_naap_number(2025, 10000), "2025-10000");
        assert_eq!(format_naap_number(2025, 123456), "2025-123456");
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_naap_number("2025-0001").unwrap(), (2025, 1));
        assert_eq!(parse_naap_number("2025-10000").unwrap(), (2025, 10000));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_naap_number("2025").is_err());
        assert!(parse_naap_number("year-one").is_err());
        assert!(parse_naap_number("2025-0000").is_err());
        assert!(parse_naap_number("").is_err());
    }

    #[test]
    fn test_round_trip() {
        let naap = format_naap_number(2024, 57);
        assert_eq!(parse_naap_number(&naap).unwrap(), (2024, 57));
    }
}
