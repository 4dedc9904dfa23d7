//! Profile-caching decorator for an auth provider.

use std::num::NonZeroUsize;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::lru::LruCache;
use crate::application::ports::{AuthError, AuthProviderPort};
use crate::domain::identity::{Credentials, Email, ProfileUpdate, Session, UserId, UserProfile};
use crate::infrastructure::metrics::record_profile_cache;

/// Wraps an [`AuthProviderPort`] and memoizes `get_profile`.
///
/// Profiles are refreshed by `update_profile` and `sign_in`, and the whole
/// cache is dropped on `sign_out`.
#[derive(Debug)]
pub struct CachedAuthProvider<P> {
    inner: P,
    profiles: Mutex<LruCache<UserId, UserProfile>>,
}

impl<P: AuthProviderPort> CachedAuthProvider<P> {
    /// Wrap a provider with a profile cache of the given size.
    #[must_use]
    pub fn new(inner: P, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            profiles: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// The wrapped provider.
    #[must_use]
    pub const fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached profiles.
    #[must_use]
    pub fn cached_profiles(&self) -> usize {
        self.profiles.lock().len()
    }

    fn remember(&self, profile: &UserProfile) {
        self.profiles.lock().insert(profile.id, profile.clone());
    }
}

#[async_trait]
impl<P: AuthProviderPort> AuthProviderPort for CachedAuthProvider<P> {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let session = self.inner.sign_in(credentials).await?;
        self.remember(&session.user);
        Ok(session)
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        display_name: Option<&str>,
    ) -> Result<UserProfile, AuthError> {
        self.inner.sign_up(credentials, display_name).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.inner.sign_out().await?;
        self.profiles.lock().clear();
        debug!("Profile cache cleared on sign-out");
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        self.inner.current_session().await
    }

    async fn reset_password(&self, email: &Email) -> Result<(), AuthError> {
        self.inner.reset_password(email).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, AuthError> {
        let profile = self.inner.update_profile(update).await?;
        self.remember(&profile);
        Ok(profile)
    }

    async fn get_profile(&self, user_id: UserId) -> Result<UserProfile, AuthError> {
        let cached = self.profiles.lock().get(&user_id);
        record_profile_cache(cached.is_some());
        if let Some(profile) = cached {
            return Ok(profile);
        }

        let profile = self.inner.get_profile(user_id).await?;
        self.remember(&profile);
        Ok(profile)
    }
}
