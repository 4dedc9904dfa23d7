//! Auth Provider Port (Driven Port)
//!
//! Interface to the hosted account service. The calculation engine never
//! touches it; the session only decides whose scenario is loaded.

use async_trait::async_trait;

use crate::domain::identity::{Credentials, Email, ProfileUpdate, Session, UserId, UserProfile};
use crate::domain::shared::DomainError;

/// Classified auth failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account exists but its address is unconfirmed.
    #[error("Email address has not been confirmed")]
    EmailNotConfirmed,

    /// Sign-up for an address that already has an account.
    #[error("An account already exists for {email}")]
    AlreadyRegistered {
        /// Address in use.
        email: String,
    },

    /// Provider could not be reached.
    #[error("Auth provider unavailable: {message}")]
    NetworkUnavailable {
        /// Error details.
        message: String,
    },

    /// Operation requires a session.
    #[error("Not signed in")]
    NotSignedIn,

    /// Malformed request (bad email, weak password, unknown user).
    #[error("Invalid auth input: {message}")]
    InvalidInput {
        /// Error details.
        message: String,
    },
}

impl From<DomainError> for AuthError {
    fn from(err: DomainError) -> Self {
        Self::InvalidInput {
            message: err.to_string(),
        }
    }
}

/// Port for account and session management.
#[async_trait]
pub trait AuthProviderPort: Send + Sync {
    /// Sign in and make the returned session current.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Register an account. The address may need confirming before sign-in.
    async fn sign_up(
        &self,
        credentials: &Credentials,
        display_name: Option<&str>,
    ) -> Result<UserProfile, AuthError>;

    /// End the current session. Succeeds if nobody is signed in.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The current session, if any.
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;

    /// Send a password reset link. Unknown addresses succeed silently.
    async fn reset_password(&self, email: &Email) -> Result<(), AuthError>;

    /// Change the signed-in user's profile.
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, AuthError>;

    /// Fetch a profile by id.
    async fn get_profile(&self, user_id: UserId) -> Result<UserProfile, AuthError>;
}
