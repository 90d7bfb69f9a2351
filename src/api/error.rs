//! HTTP error mapping for the REST API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use derive_more::{Display, Error};
use serde::Serialize;
use tracing::error;

use crate::error::GameError;

/// API-level error converted to an HTTP response.
#[derive(Debug, Clone, Display, Error)]
pub enum ApiError {
    /// Malformed request input.
    #[display("{reason}")]
    BadRequest {
        /// Human-readable reason.
        reason: String,
    },
    /// Entity does not exist.
    #[display("{reason}")]
    NotFound {
        /// Human-readable reason.
        reason: String,
    },
    /// Actor lacks standing for the action.
    #[display("{reason}")]
    Forbidden {
        /// Human-readable reason.
        reason: String,
    },
    /// Action violates a state or uniqueness rule.
    #[display("{reason}")]
    Conflict {
        /// Human-readable reason.
        reason: String,
    },
    /// Unexpected server-side failure.
    #[display("{reason}")]
    Internal {
        /// Human-readable reason.
        reason: String,
    },
}

impl ApiError {
    /// Creates a bad-request error.
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest {
            reason: reason.into(),
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::NotFound { reason } => Self::NotFound { reason },
            GameError::Forbidden { reason } => Self::Forbidden { reason },
            GameError::Conflict { reason } => Self::Conflict { reason },
            GameError::Db { source } => {
                error!(error = %source, "Persistence failure");
                Self::Internal {
                    reason: "Internal server error".to_string(),
                }
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorBody {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}
