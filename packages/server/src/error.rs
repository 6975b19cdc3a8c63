//! Mapping of domain errors onto HTTP responses.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use shopguard_alerts::AlertError;
use shopguard_backend::BackendError;
use shopguard_server_models::{ApiErrorBody, FallbackBody};

/// Errors returned by API handlers.
///
/// Every variant renders as `{"error": "..."}`; the prefix tells the
/// front end whether the caller or the backend is at fault.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The backend answered with something unusable.
    #[error("Invalid backend response: {0}")]
    BadGateway(String),

    /// The backend could not be reached and no fallback applies.
    #[error("Backend offline: {0}")]
    BackendOffline(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::BackendOffline(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::debug!("{self}");
        }
        HttpResponse::build(status).json(ApiErrorBody {
            error: self.to_string(),
        })
    }
}

impl From<AlertError> for ApiError {
    fn from(e: AlertError) -> Self {
        match e {
            AlertError::NotFound { .. } => Self::NotFound("Alert not found".to_string()),
            AlertError::Validation { message } => Self::BadRequest(message),
            AlertError::Storage(message) => Self::Internal(message),
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(e: BackendError) -> Self {
        if e.is_unavailable() {
            return Self::BackendOffline(e.to_string());
        }
        match e {
            BackendError::Config(message) => Self::Internal(message),
            other => Self::BadGateway(other.to_string()),
        }
    }
}

/// Builds the `503` response carrying a locally produced payload.
pub fn fallback_response<T: Serialize>(payload: T, reason: &impl std::fmt::Display) -> HttpResponse {
    log::warn!("Serving fallback data: {reason}");
    HttpResponse::ServiceUnavailable().json(FallbackBody {
        payload,
        demo_mode: true,
        error: format!("Backend offline: {reason}"),
    })
}
