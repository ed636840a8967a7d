//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Content lookups (catalog and tag registry, defined by the domain)
//! - Character finalization (could swap in-memory -> persistent sheet store)
//! - Clock (for testing)

mod error;
mod external;
mod testing;

pub use error::FinalizeError;
pub use external::CharacterFinalizer;
pub use testing::ClockPort;

// Content lookups live in the domain so sessions can hold them directly
pub use charbldr_domain::catalog::{ContentCatalog, TagRegistry};

#[cfg(test)]
pub use external::MockCharacterFinalizer;
#[cfg(test)]
pub use testing::MockClockPort;
