//! Identity
//!
//! Who is signed in. Accounts live with an external auth provider; these
//! types are what the rest of the application sees of them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::shared::DomainError;

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Opaque account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Allocate a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing identifier.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A syntactically plausible email address, lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parse and normalize an address.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` unless the input has exactly one
    /// `@` with a non-empty local part and a dotted domain.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();
        let valid = match normalized.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !normalized.contains(char::is_whitespace)
            }
            None => false,
        };

        if valid {
            Ok(Self(normalized))
        } else {
            Err(DomainError::invalid("email", "not a valid email address"))
        }
    }

    /// The normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Email and password pair. The password never appears in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    email: Email,
    password: String,
}

impl Credentials {
    /// Bundle an address with a password.
    #[must_use]
    pub fn new(email: Email, password: impl Into<String>) -> Self {
        Self {
            email,
            password: password.into(),
        }
    }

    /// Account email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Plain-text password, for handing to the provider only.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Reject passwords shorter than [`MIN_PASSWORD_LENGTH`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` for a short password.
    pub fn ensure_strong_enough(&self) -> Result<(), DomainError> {
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::invalid(
                "password",
                format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Account profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account id.
    pub id: UserId,
    /// Sign-in address.
    pub email: Email,
    /// Name shown in the header.
    pub display_name: Option<String>,
    /// Whether the address has been confirmed.
    pub email_confirmed: bool,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
    /// Last profile change.
    pub updated_at: DateTime<Utc>,
}

/// Partial profile change. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    /// New display name; an empty string clears it.
    pub display_name: Option<String>,
}

impl ProfileUpdate {
    /// Returns true if the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none()
    }

    /// Apply to a profile, stamping `updated_at`.
    pub fn apply_to(&self, profile: &mut UserProfile, now: DateTime<Utc>) {
        if let Some(name) = &self.display_name {
            let trimmed = name.trim();
            profile.display_name = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        profile.updated_at = now;
    }
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Signed-in user.
    pub user: UserProfile,
    /// Bearer token issued by the provider.
    pub access_token: String,
    /// Expiry of `access_token`.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns true if the token has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
