//! HTTP adapter mapping for store and validation failures.
//!
//! Every handler and body-extraction failure becomes one of these JSON shapes:
//!
//! ```text
//! 400 {"error": "<message>"}
//! 413 {"error": "Request body is too large"}
//! 500 {"error": "Internal Server Error", "details": "<error text>"}
//! ```

use crate::store::StoreError;
use actix_web::error::{BlockingError, JsonPayloadError, PayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use userboard_core::RepoError;

pub const NAME_REQUIRED_MESSAGE: &str = "Name is required and must be a non-empty string";
pub const INVALID_JSON_MESSAGE: &str = "Request body must be valid JSON";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body is too large";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Client input failed a precondition; nothing was written.
    BadRequest(&'static str),
    /// Request body exceeded the configured JSON limit.
    PayloadTooLarge,
    /// Store or runtime failure; `details` carries the raw error text.
    Internal { details: String },
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    pub fn name_required() -> Self {
        Self::BadRequest(NAME_REQUIRED_MESSAGE)
    }

    pub fn invalid_json() -> Self {
        Self::BadRequest(INVALID_JSON_MESSAGE)
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::Internal {
            details: details.into(),
        }
    }

    fn body(&self) -> ErrorBody<'_> {
        match self {
            Self::BadRequest(message) => ErrorBody {
                error: *message,
                details: None,
            },
            Self::PayloadTooLarge => ErrorBody {
                error: PAYLOAD_TOO_LARGE_MESSAGE,
                details: None,
            },
            Self::Internal { details } => ErrorBody {
                error: INTERNAL_ERROR_MESSAGE,
                details: Some(details.as_str()),
            },
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::PayloadTooLarge => write!(f, "{PAYLOAD_TOO_LARGE_MESSAGE}"),
            Self::Internal { details } => write!(f, "internal error: {details}"),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Repo(RepoError::Validation(_)) => Self::name_required(),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<JsonPayloadError> for ApiError {
    fn from(err: JsonPayloadError) -> Self {
        match err {
            JsonPayloadError::OverflowKnownLength { .. }
            | JsonPayloadError::Overflow { .. }
            | JsonPayloadError::Payload(PayloadError::Overflow) => Self::PayloadTooLarge,
            JsonPayloadError::ContentType | JsonPayloadError::Deserialize(_) => {
                Self::invalid_json()
            }
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<BlockingError> for ApiError {
    fn from(err: BlockingError) -> Self {
        Self::internal(err.to_string())
    }
}
