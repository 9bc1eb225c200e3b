use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Relay failures. Each maps to a fixed status and wire body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid data format: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Endpoint not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self::Internal(message.to_string())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match self {
            Self::BadRequest(ref detail) => {
                tracing::debug!("Rejected sync payload: {detail}");
                ErrorBody {
                    error: "Invalid data format",
                    message: None,
                }
            }
            Self::Unauthorized(ref detail) => {
                tracing::debug!("Rejected request: {detail}");
                ErrorBody {
                    error: "Missing or invalid API key",
                    message: None,
                }
            }
            Self::NotFound => ErrorBody {
                error: "Endpoint not found",
                message: None,
            },
            Self::MethodNotAllowed => ErrorBody {
                error: "Method not allowed",
                message: None,
            },
            Self::Internal(ref message) => {
                tracing::error!("Sync error: {message}");
                ErrorBody {
                    error: "Internal server error",
                    message: Some(message.clone()),
                }
            }
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_variants() {
        assert_eq!(AppError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_body_carries_message() {
        let body = ErrorBody {
            error: "Internal server error",
            message: Some("disk full".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Internal server error","message":"disk full"}"#
        );
    }
}
