//! CharBldr Engine library.
//!
//! Hosts character build sessions and hands finished builds to a finalizer.
//!
//! ## Structure
//!
//! - `stores/` - Live build sessions, one task per player
//! - `use_cases/` - User story orchestration over the session store
//! - `infrastructure/` - Configuration, content adapters and port implementations
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// Shared helpers for unit tests.
#[cfg(test)]
mod test_fixtures;

pub use app::App;
