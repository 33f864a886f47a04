//! Error types for the employee API client.
//!
//! # Design
//! Every failure carries a human-readable message through `Display`. For
//! non-2xx responses the message is taken from the backend's `message` field
//! when present, then from the raw body, then a generic fallback. `NotFound`
//! gets a dedicated variant because detail views and updates branch on it.

use serde::Deserialize;
use thiserror::Error;

use crate::transport::TransportError;
use crate::validation::ValidationErrors;

pub const UNKNOWN_ERROR: &str = "unknown error";

/// Errors returned by `EmployeeClient` parse methods and `EmployeeRepository`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The payload failed field rules. Produced by form validation.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// An equivalent employee already exists; nothing was written.
    #[error("an equivalent employee already exists (id {existing_id})")]
    DuplicateRecord { existing_id: u64 },

    /// The server returned 404: the requested employee does not exist.
    #[error("employee not found")]
    NotFound,

    /// No response arrived before the request timeout.
    #[error("request timed out")]
    Timeout,

    /// The request never produced an HTTP response.
    #[error("{0}")]
    Network(String),

    /// The server returned a non-2xx status other than 404.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => ApiError::Timeout,
            TransportError::Network(msg) if msg.trim().is_empty() => {
                ApiError::Network(UNKNOWN_ERROR.to_string())
            }
            TransportError::Network(msg) => ApiError::Network(msg),
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
}

/// Pick the most useful message out of an error response body.
pub(crate) fn server_message(body: &str) -> String {
    if let Ok(ErrorEnvelope { message: Some(message) }) = serde_json::from_str::<ErrorEnvelope>(body) {
        if !message.trim().is_empty() {
            return message;
        }
    }
    let body = body.trim();
    if body.is_empty() || body.starts_with('{') {
        UNKNOWN_ERROR.to_string()
    } else {
        body.to_string()
    }
}
