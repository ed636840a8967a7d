//! In-memory state storage modules.
//!
//! Stores manage runtime state that doesn't belong in a database:
//! - `BuildSessionStore` - one live character build per player

pub mod build_sessions;

// Re-export store types
pub use build_sessions::{BuildSessionStore, BuildStoreError};
