//! Parsing of raw form and query values into typed inputs.
//!
//! Form structs keep every field as a `String` (defaulting to empty) so a
//! malformed value becomes an `InvalidRequest` naming the field, which the
//! handler turns into a flash, rather than an extractor rejection.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Error, UnknownVariant};

fn invalid(field: &'static str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": "invalid_format" }))
}

fn present(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Required integer.
pub(crate) fn int(field: &'static str, raw: &str) -> Result<i32, Error> {
    present(raw)
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| invalid(field, format!("{} must be a whole number.", label(field))))
}

/// Integer that may be left blank.
pub(crate) fn optional_int(field: &'static str, raw: &str) -> Result<Option<i32>, Error> {
    present(raw).map(|_| int(field, raw)).transpose()
}

/// Required finite number.
pub(crate) fn number(field: &'static str, raw: &str) -> Result<f64, Error> {
    present(raw)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or_else(|| invalid(field, format!("{} must be a valid number.", label(field))))
}

/// Number that may be left blank.
pub(crate) fn optional_number(field: &'static str, raw: &str) -> Result<Option<f64>, Error> {
    present(raw).map(|_| number(field, raw)).transpose()
}

/// Required ISO date (`YYYY-MM-DD`).
pub(crate) fn date(field: &'static str, raw: &str) -> Result<NaiveDate, Error> {
    present(raw)
        .and_then(|value| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
        .ok_or_else(|| invalid(field, "Invalid date format.".to_owned()))
}

/// Required member of a closed vocabulary.
pub(crate) fn choice<T>(field: &'static str, raw: &str) -> Result<T, Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    raw.trim()
        .parse::<T>()
        .map_err(|error| invalid(field, format!("Invalid {}.", error.kind)))
}

/// Vocabulary filter where blank means "any".
pub(crate) fn optional_choice<T>(field: &'static str, raw: &str) -> Result<Option<T>, Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    present(raw).map(|value| choice(field, value)).transpose()
}

/// Checkbox-style flag: only the literal `true` is set.
pub(crate) fn flag(raw: &str) -> bool {
    raw.trim() == "true"
}

/// Free text that may be left blank.
pub(crate) fn optional_text(raw: &str) -> Option<String> {
    present(raw).map(str::to_owned)
}

/// `?sort=` selector shared by list pages.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SortQuery {
    pub sort: Option<String>,
}

impl SortQuery {
    /// Raw key, resolved by the page's sort enum.
    pub(crate) fn key(&self) -> Option<&str> {
        self.sort.as_deref()
    }
}

fn label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, RoomCapacity, ViewType};
    use rstest::rstest;

    #[rstest]
    #[case(" 42 ", Some(42))]
    #[case("", None)]
    fn optional_int_accepts_blank(#[case] raw: &str, #[case] expected: Option<i32>) {
        assert_eq!(optional_int("hotel_id", raw).expect("parses"), expected);
    }

    #[rstest]
    #[case("abc")]
    #[case("4.5")]
    fn int_rejects_non_integers(#[case] raw: &str) {
        let err = int("room_id", raw).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Room id must be a whole number.");
    }

    #[rstest]
    #[case("NaN")]
    #[case("inf")]
    #[case("ten")]
    fn number_rejects_non_finite(#[case] raw: &str) {
        assert!(number("payment_amount", raw).is_err());
    }

    #[test]
    fn date_requires_iso_format() {
        assert_eq!(
            date("checkin", "2025-06-03").expect("valid"),
            NaiveDate::from_ymd_opt(2025, 6, 3).expect("valid date")
        );
        assert_eq!(
            date("checkin", "03/06/2025").expect_err("rejected").message(),
            "Invalid date format."
        );
    }

    #[test]
    fn choices_use_stored_labels() {
        assert_eq!(choice::<ViewType>("view_type", "sea_view").expect("valid"), ViewType::Sea);
        assert_eq!(
            optional_choice::<RoomCapacity>("capacity", " ").expect("blank is any"),
            None
        );
        assert!(choice::<RoomCapacity>("capacity", "penthouse").is_err());
    }

    #[rstest]
    #[case("true", true)]
    #[case(" true ", true)]
    #[case("TRUE", false)]
    #[case("on", false)]
    #[case("", false)]
    fn flag_is_literal_true(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(flag(raw), expected);
    }
}
