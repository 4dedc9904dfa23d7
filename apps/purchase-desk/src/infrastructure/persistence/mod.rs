//! Persistence Adapters
//!
//! Key-value store implementations. The in-memory store lives next to its
//! port in the application layer.

mod json_file;

pub use json_file::JsonFileKeyValueStore;
