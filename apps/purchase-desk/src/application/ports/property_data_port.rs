//! Property Data Port (Driven Port)
//!
//! Interface to an external property data provider.

use async_trait::async_trait;

use crate::domain::property::PropertyRecord;

/// Property lookup error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyLookupError {
    /// Provider has no record for the address.
    #[error("No property found for '{address}'")]
    NotFound {
        /// Address as queried.
        address: String,
    },

    /// Provider answered with an error status.
    #[error("Property provider error ({status}): {message}")]
    Provider {
        /// HTTP status.
        status: u16,
        /// Error details.
        message: String,
    },

    /// Request never completed (connect, timeout, malformed body).
    #[error("Property provider transport error: {message}")]
    Transport {
        /// Error details.
        message: String,
    },

    /// Address is blank or too long to look up.
    #[error("Invalid address: {message}")]
    InvalidAddress {
        /// Error details.
        message: String,
    },

    /// Caller cancelled the lookup.
    #[error("Property lookup cancelled")]
    Cancelled,
}

impl PropertyLookupError {
    /// Returns true if the same request may succeed later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Provider { status, .. } => *status == 429 || *status >= 500,
            Self::NotFound { .. } | Self::InvalidAddress { .. } | Self::Cancelled => false,
        }
    }
}

/// Port for property data retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyDataPort: Send + Sync {
    /// Look up a property by its single-line address.
    async fn lookup_by_address(&self, address: &str)
    -> Result<PropertyRecord, PropertyLookupError>;
}
