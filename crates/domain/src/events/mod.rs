//! Domain Events
//!
//! ## Aggregate Mutation Events
//!
//! The `build_events` submodule contains the inbound [`BuildEvent`] and the
//! return types from build session mutations, communicating what happened
//! when state was modified.

pub mod build_events;

pub use build_events::*;
