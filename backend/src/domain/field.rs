//! Field-level validation shared by entity drafts.

use serde_json::json;

use super::Error;

/// Build an `InvalidRequest` error naming the offending field.
pub(crate) fn field_error(field: &'static str, code: &'static str, message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

/// Trim `value` and reject it when blank.
pub(crate) fn required(field: &'static str, value: &str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(field_error(field, "missing_field", "All fields are required."));
    }
    Ok(trimmed.to_owned())
}
