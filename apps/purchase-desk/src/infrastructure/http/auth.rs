//! Account endpoints backed by the auth provider.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::controller::AppState;
use super::error::ApiError;
use super::extract::ApiJson;
use super::request::{CredentialsRequest, PasswordResetRequest};
use crate::application::ports::AuthError;
use crate::domain::identity::{Email, ProfileUpdate, Session, UserProfile};

/// Current session, if any.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    /// Whether a session is active.
    pub signed_in: bool,
    /// The active session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

pub(super) async fn sign_up(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let credentials = request.to_credentials().map_err(AuthError::from)?;
    let profile = state
        .auth
        .sign_up(&credentials, request.display_name.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub(super) async fn sign_in(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CredentialsRequest>,
) -> Result<Json<Session>, ApiError> {
    let credentials = request.to_credentials().map_err(AuthError::from)?;
    Ok(Json(state.auth.sign_in(&credentials).await?))
}

pub(super) async fn sign_out(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.auth.sign_out().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn session(State(state): State<AppState>) -> Result<Json<SessionStatus>, ApiError> {
    let session = state.auth.current_session().await?;
    Ok(Json(SessionStatus {
        signed_in: session.is_some(),
        session,
    }))
}

pub(super) async fn password_reset(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PasswordResetRequest>,
) -> Result<StatusCode, ApiError> {
    let email = Email::parse(&request.email).map_err(AuthError::from)?;
    state.auth.reset_password(&email).await?;
    // Accepted whether or not the address has an account.
    Ok(StatusCode::ACCEPTED)
}

pub(super) async fn get_profile(
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, ApiError> {
    let session = state
        .auth
        .current_session()
        .await?
        .ok_or(AuthError::NotSignedIn)?;
    Ok(Json(state.auth.get_profile(session.user.id).await?))
}

pub(super) async fn update_profile(
    State(state): State<AppState>,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.auth.update_profile(&update).await?))
}
