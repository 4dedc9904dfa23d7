//! API error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::response::ErrorResponse;
use crate::application::ports::{AuthError, PropertyLookupError};
use crate::application::services::WorkspaceError;
use crate::domain::shared::DomainError;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body could not be read as the expected JSON.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Input rejected by the engine.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// Property lookup failed.
    #[error(transparent)]
    Lookup(#[from] PropertyLookupError),

    /// Account operation failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Scenario could not be updated or saved.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// No property provider is configured.
    #[error("Property lookup is not configured")]
    LookupDisabled,
}

impl ApiError {
    /// HTTP status and stable error code.
    #[must_use]
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MalformedBody(_) => (StatusCode::BAD_REQUEST, "malformed_body"),
            Self::Invalid(_) | Self::Workspace(WorkspaceError::Invalid(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input")
            }
            Self::Workspace(WorkspaceError::Store(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_failed")
            }
            Self::Lookup(e) => match e {
                PropertyLookupError::NotFound { .. } => (StatusCode::NOT_FOUND, "property_not_found"),
                PropertyLookupError::InvalidAddress { .. } => {
                    (StatusCode::BAD_REQUEST, "invalid_address")
                }
                PropertyLookupError::Provider { .. } | PropertyLookupError::Transport { .. } => {
                    (StatusCode::BAD_GATEWAY, "provider_unavailable")
                }
                PropertyLookupError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "cancelled"),
            },
            Self::Auth(e) => match e {
                AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
                AuthError::NotSignedIn => (StatusCode::UNAUTHORIZED, "not_signed_in"),
                AuthError::EmailNotConfirmed => (StatusCode::FORBIDDEN, "email_not_confirmed"),
                AuthError::AlreadyRegistered { .. } => (StatusCode::CONFLICT, "already_registered"),
                AuthError::InvalidInput { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input"),
                AuthError::NetworkUnavailable { .. } => {
                    (StatusCode::SERVICE_UNAVAILABLE, "auth_unavailable")
                }
            },
            Self::LookupDisabled => (StatusCode::SERVICE_UNAVAILABLE, "lookup_disabled"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::warn!(code, error = %self, "Request failed");
        }
        let body = ErrorResponse {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
