//! API error mapping.
//!
//! | Code | HTTP status | Body `error` |
//! |------|-------------|--------------|
//! | `MissingFields` | 400 | `Missing required fields` |
//! | `InvalidOrderParams` | 400 | rule message, e.g. `Price is required for Limit orders` |
//! | `InvalidRequest` | 400 | `Invalid request body` |
//! | `InternalError` | 500 | `Internal server error` |

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use super::response::ErrorResponse;
use crate::domain::order_entry::errors::OrderError;

/// Generic message returned for any server-side fault.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Message returned when the body cannot be decoded.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Error codes for the order API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A required order field is absent.
    MissingFields,
    /// A conditional price rule failed.
    InvalidOrderParams,
    /// The request body could not be decoded.
    InvalidRequest,
    /// Unexpected server fault.
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::InvalidOrderParams | Self::InvalidRequest => {
                StatusCode::BAD_REQUEST
            }
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error: a code plus the message the client is allowed to see.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a bad request error for an undecodable body.
    #[must_use]
    pub fn invalid_body() -> Self {
        Self {
            code: ErrorCode::InvalidRequest,
            message: INVALID_BODY_MESSAGE.to_string(),
        }
    }

    /// Create an internal error. The detail stays in the server log.
    #[must_use]
    pub fn internal() -> Self {
        Self {
            code: ErrorCode::InternalError,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<OrderError> for ApiError {
    fn from(error: OrderError) -> Self {
        match error {
            OrderError::MissingRequiredFields { fields } => {
                tracing::info!(?fields, "Order rejected: missing required fields");
                Self {
                    code: ErrorCode::MissingFields,
                    message: OrderError::MissingRequiredFields { fields }.to_string(),
                }
            }
            OrderError::InvalidParameters { field, message } => {
                tracing::info!(field, %message, "Order rejected: invalid parameters");
                Self {
                    code: ErrorCode::InvalidOrderParams,
                    message,
                }
            }
            OrderError::RegistryUnavailable { reason } => {
                tracing::error!(%reason, "Order registry fault");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorResponse {
            success: false,
            error: self.message,
        };
        (self.code.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = ApiError::from(OrderError::MissingRequiredFields {
            fields: vec!["side"],
        });
        assert_eq!(err.code(), ErrorCode::MissingFields);
        assert_eq!(err.code().status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Missing required fields");
    }

    #[test]
    fn registry_fault_hides_detail() {
        let err = ApiError::from(OrderError::RegistryUnavailable {
            reason: "poisoned lock at registry.rs:42".to_string(),
        });
        assert_eq!(err.code().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn invalid_parameters_keep_rule_message() {
        let err = ApiError::from(OrderError::InvalidParameters {
            field: "price",
            message: "Price must be greater than 0".to_string(),
        });
        assert_eq!(err.code(), ErrorCode::InvalidOrderParams);
        assert_eq!(err.message(), "Price must be greater than 0");
    }
}
