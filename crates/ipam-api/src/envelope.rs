// Response envelope handling
//
// The server wraps every payload as `{ "success": bool, "data": T }` or
// `{ "success": false, "error": "..." }`. The failure branch is turned
// into `Error::Api` here, so callers only ever see the success branch.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::error::Error;

/// Success branch of the server envelope.
///
/// `data` is `None` when the server answered a success status with an empty
/// or non-JSON body (bodiless deletes, 204s) or with an envelope that has no
/// `data` field.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    /// Optional human-readable note from the server (`"Subnet deleted"`).
    pub message: Option<String>,
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            data: None,
            message: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
        }
    }

    /// A success with no payload.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Take the payload, failing with [`Error::EmptyResponse`] if there is none.
    pub fn into_data(self) -> Result<T, Error> {
        self.data.ok_or(Error::EmptyResponse)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: self.data.map(f),
            message: self.message,
        }
    }
}

/// One page of a list endpoint.
///
/// Item order is whatever the server sent; nothing here re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    /// Any other paging metadata the server includes.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl<T> Paginated<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> IntoIterator for Paginated<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// Decode a success-status body into the envelope's success branch.
pub(crate) fn decode<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<ApiResponse<T>, Error> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        trace!(%status, "success status with non-JSON body, treating as empty payload");
        return Ok(ApiResponse::empty());
    };

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(Error::Api {
            status: status.as_u16(),
            message: embedded_message(&value).unwrap_or_else(|| "Request failed".into()),
        });
    }

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let data = match value.get("data") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(T::deserialize(raw).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.to_owned(),
            }
        })?),
    };

    Ok(ApiResponse { data, message })
}

/// Pick the most useful message for a non-2xx response.
///
/// JSON bodies supply `error` or `message`; anything else falls back to the
/// status reason phrase.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = format!("Request failed with status {}", status.as_u16());
    match serde_json::from_str::<Value>(body) {
        Ok(value) => embedded_message(&value).unwrap_or(fallback),
        Err(_) => status
            .canonical_reason()
            .map_or(fallback, str::to_owned),
    }
}

fn embedded_message(value: &Value) -> Option<String> {
    let error = value.get("error");
    error
        .and_then(Value::as_str)
        .or_else(|| error.and_then(|e| e.get("message")).and_then(Value::as_str))
        .or_else(|| value.get("message").and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}
