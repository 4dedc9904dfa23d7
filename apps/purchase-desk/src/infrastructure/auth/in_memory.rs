//! In-memory auth provider for development and tests.
//!
//! Mirrors the hosted provider's classified failures. Passwords are held
//! in memory as given; never point real users at this adapter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::application::ports::{AuthError, AuthProviderPort};
use crate::domain::identity::{Credentials, Email, ProfileUpdate, Session, UserId, UserProfile};

/// Lifetime of issued access tokens.
const SESSION_TTL_HOURS: i64 = 1;

#[derive(Debug, Clone)]
struct Account {
    profile: UserProfile,
    password: String,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<Email, Account>,
    session: Option<Session>,
    reset_requests: Vec<Email>,
}

/// Single-client auth provider kept entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryAuthProvider {
    require_confirmation: bool,
    offline: AtomicBool,
    state: RwLock<State>,
}

impl InMemoryAuthProvider {
    /// Provider whose new accounts can sign in immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose new accounts must be confirmed first.
    #[must_use]
    pub fn requiring_confirmation() -> Self {
        Self {
            require_confirmation: true,
            ..Self::default()
        }
    }

    /// Simulate losing (or regaining) the network.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Mark an address confirmed. Returns false for unknown addresses.
    pub fn confirm_email(&self, email: &Email) -> bool {
        let mut state = self.state.write();
        state.accounts.get_mut(email).is_some_and(|account| {
            account.profile.email_confirmed = true;
            true
        })
    }

    /// Addresses a reset link was requested for, in order.
    #[must_use]
    pub fn password_reset_requests(&self) -> Vec<Email> {
        self.state.read().reset_requests.clone()
    }

    fn ensure_online(&self) -> Result<(), AuthError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthError::NetworkUnavailable {
                message: "auth provider unreachable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AuthProviderPort for InMemoryAuthProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.ensure_online()?;
        let mut state = self.state.write();

        let account = state
            .accounts
            .get(credentials.email())
            .filter(|account| account.password == credentials.password())
            .ok_or(AuthError::InvalidCredentials)?;
        if !account.profile.email_confirmed {
            return Err(AuthError::EmailNotConfirmed);
        }

        let session = Session {
            user: account.profile.clone(),
            access_token: Uuid::new_v4().simple().to_string(),
            expires_at: Utc::now() + Duration::hours(SESSION_TTL_HOURS),
        };
        state.session = Some(session.clone());
        drop(state);

        info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        display_name: Option<&str>,
    ) -> Result<UserProfile, AuthError> {
        self.ensure_online()?;
        credentials.ensure_strong_enough()?;

        let mut state = self.state.write();
        if state.accounts.contains_key(credentials.email()) {
            return Err(AuthError::AlreadyRegistered {
                email: credentials.email().to_string(),
            });
        }

        let now = Utc::now();
        let profile = UserProfile {
            id: UserId::new(),
            email: credentials.email().clone(),
            display_name: display_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            email_confirmed: !self.require_confirmation,
            created_at: now,
            updated_at: now,
        };
        state.accounts.insert(
            credentials.email().clone(),
            Account {
                profile: profile.clone(),
                password: credentials.password().to_string(),
            },
        );
        drop(state);

        info!(user_id = %profile.id, "Account registered");
        Ok(profile)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.ensure_online()?;
        self.state.write().session = None;
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        self.ensure_online()?;
        let mut state = self.state.write();
        if state
            .session
            .as_ref()
            .is_some_and(|session| session.is_expired(Utc::now()))
        {
            state.session = None;
        }
        Ok(state.session.clone())
    }

    async fn reset_password(&self, email: &Email) -> Result<(), AuthError> {
        self.ensure_online()?;
        let mut state = self.state.write();
        if state.accounts.contains_key(email) {
            state.reset_requests.push(email.clone());
        }
        Ok(())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, AuthError> {
        self.ensure_online()?;
        let mut state = self.state.write();
        let state = &mut *state;

        let session = state.session.as_mut().ok_or(AuthError::NotSignedIn)?;
        let account = state
            .accounts
            .get_mut(&session.user.email)
            .ok_or(AuthError::NotSignedIn)?;

        update.apply_to(&mut account.profile, Utc::now());
        session.user = account.profile.clone();
        Ok(account.profile.clone())
    }

    async fn get_profile(&self, user_id: UserId) -> Result<UserProfile, AuthError> {
        self.ensure_online()?;
        self.state
            .read()
            .accounts
            .values()
            .find(|account| account.profile.id == user_id)
            .map(|account| account.profile.clone())
            .ok_or_else(|| AuthError::InvalidInput {
                message: format!("unknown user {user_id}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials::new(Email::parse(email).unwrap(), password)
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let auth = InMemoryAuthProvider::new();
        let profile = auth
            .sign_up(&creds("buyer@example.com", "correct-horse"), Some(" Sam "))
            .await
            .unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Sam"));

        let session = auth
            .sign_in(&creds("BUYER@example.com", "correct-horse"))
            .await
            .unwrap();
        assert_eq!(session.user.id, profile.id);
        assert_eq!(
            auth.current_session().await.unwrap().map(|s| s.user.id),
            Some(profile.id)
        );
    }

    #[tokio::test]
    async fn duplicate_sign_up_rejected() {
        let auth = InMemoryAuthProvider::new();
        let c = creds("buyer@example.com", "correct-horse");
        auth.sign_up(&c, None).await.unwrap();
        assert!(matches!(
            auth.sign_up(&c, None).await,
            Err(AuthError::AlreadyRegistered { .. })
        ));
    }

    #[tokio::test]
    async fn weak_password_rejected() {
        let auth = InMemoryAuthProvider::new();
        assert!(matches!(
            auth.sign_up(&creds("a@b.io", "short"), None).await,
            Err(AuthError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user() {
        let auth = InMemoryAuthProvider::new();
        auth.sign_up(&creds("a@b.io", "correct-horse"), None)
            .await
            .unwrap();

        assert_eq!(
            auth.sign_in(&creds("a@b.io", "wrong-horse")).await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            auth.sign_in(&creds("c@d.io", "correct-horse")).await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn unconfirmed_email_blocks_sign_in() {
        let auth = InMemoryAuthProvider::requiring_confirmation();
        let c = creds("a@b.io", "correct-horse");
        auth.sign_up(&c, None).await.unwrap();

        assert_eq!(auth.sign_in(&c).await, Err(AuthError::EmailNotConfirmed));
        assert!(auth.confirm_email(c.email()));
        assert!(auth.sign_in(&c).await.is_ok());
    }

    #[tokio::test]
    async fn update_profile_requires_session() {
        let auth = InMemoryAuthProvider::new();
        let update = ProfileUpdate {
            display_name: Some("Alex".to_string()),
        };
        assert_eq!(
            auth.update_profile(&update).await,
            Err(AuthError::NotSignedIn)
        );

        let c = creds("a@b.io", "correct-horse");
        auth.sign_up(&c, None).await.unwrap();
        auth.sign_in(&c).await.unwrap();
        let profile = auth.update_profile(&update).await.unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Alex"));

        let session = auth.current_session().await.unwrap().unwrap();
        assert_eq!(session.user.display_name.as_deref(), Some("Alex"));
        assert_eq!(auth.get_profile(profile.id).await.unwrap(), profile);
    }

    #[tokio::test]
    async fn sign_out_clears_session() {
        let auth = InMemoryAuthProvider::new();
        let c = creds("a@b.io", "correct-horse");
        auth.sign_up(&c, None).await.unwrap();
        auth.sign_in(&c).await.unwrap();
        auth.sign_out().await.unwrap();
        assert!(auth.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reset_only_recorded_for_known_accounts() {
        let auth = InMemoryAuthProvider::new();
        let c = creds("a@b.io", "correct-horse");
        auth.sign_up(&c, None).await.unwrap();

        auth.reset_password(c.email()).await.unwrap();
        auth.reset_password(&Email::parse("x@y.io").unwrap())
            .await
            .unwrap();
        assert_eq!(auth.password_reset_requests(), vec![c.email().clone()]);
    }

    #[tokio::test]
    async fn offline_provider_reports_network_unavailable() {
        let auth = InMemoryAuthProvider::new();
        auth.set_offline(true);
        assert!(matches!(
            auth.current_session().await,
            Err(AuthError::NetworkUnavailable { .. })
        ));
        auth.set_offline(false);
        assert!(auth.current_session().await.unwrap().is_none());
    }
}
