//! Auth Adapters
//!
//! Local stand-in for the hosted account service.

mod in_memory;

pub use in_memory::InMemoryAuthProvider;
