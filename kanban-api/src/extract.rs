/// Request extractors and field helpers
///
/// Bodies go through [`ValidatedJson`], which deserializes into a typed
/// request struct and runs its `validator` rules. Any failure, from a
/// missing content type to a wrong field type, becomes a 400 with a
/// readable message.
///
/// Path ids are taken as strings and parsed with [`parse_id`] so a
/// non-integer id produces the same 400 body on every route.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use validator::{Validate, ValidationErrors};

use crate::error::{ApiError, ApiResult};

/// JSON body that has passed schema validation
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ApiError::BadRequest(validation_message(&errors)))?;

        Ok(Self(value))
    }
}

/// Flattens validator errors into one message, sorted for stable output
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field))
            })
        })
        .collect();

    messages.sort();
    messages.join("; ")
}

/// Parses a path id, rejecting anything that is not an integer
pub fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::BadRequest("Invalid id".to_string()))
}

/// Trims a required text field; absent or blank input is rejected with `message`
pub fn required_text(value: Option<String>, message: &str) -> ApiResult<String> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ApiError::BadRequest(message.to_string())),
    }
}

/// Trims an optional text field, treating blank as absent
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Parses an optional `YYYY-MM-DD` date; blank counts as absent
pub fn optional_date(field: &str, value: Option<String>) -> ApiResult<Option<NaiveDate>> {
    match optional_text(value) {
        None => Ok(None),
        Some(text) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid {} (expected YYYY-MM-DD)", field))),
    }
}

/// Deserializes an optional string with surrounding whitespace removed
///
/// Use with `#[serde(default, deserialize_with = "trimmed")]` so `length`
/// rules measure the text that will be stored. Blank input stays `Some("")`
/// for [`required_text`] to reject.
pub fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|text| text.trim().to_string()))
}

/// Deserializes a field that may be absent, null, or set
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`: an absent
/// field stays `None`, while `null` or `""` become `Some(None)` (clear) and
/// any other string becomes `Some(Some(value))`.
pub fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(Some(optional_text(value)))
}
