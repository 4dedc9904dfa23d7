//! Domain errors for the purchase desk.

use std::fmt;

/// Domain-level errors that can occur in business logic.
///
/// The calculation engine itself is infallible for well-formed inputs; these
/// errors are raised by the validating constructors that sit in front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Business rule violation spanning more than one field.
    BusinessRuleViolation {
        /// Rule name or code.
        rule: String,
        /// Description of the violation.
        message: String,
    },
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidValue`].
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for [`DomainError::BusinessRuleViolation`].
    pub fn rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::BusinessRuleViolation { rule, message } => {
                write!(f, "Business rule '{rule}' violated: {message}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
