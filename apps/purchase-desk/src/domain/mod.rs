//! Domain Layer - Purchase calculations and core records.
//!
//! Pure types and functions with no I/O. Everything here is deterministic
//! and safe to call from any thread.

/// Signed-in users and sessions.
pub mod identity;

/// Payment, amortization, closing cost and budget calculators.
pub mod mortgage;

/// Property records returned by data providers.
pub mod property;

/// Money, rates and domain errors.
pub mod shared;
