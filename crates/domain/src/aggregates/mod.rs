//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through methods, not public fields
//! - Returns outcome enums from mutations
//!
//! # Rustic DDD Principles
//!
//! | Java DDD Pattern | Rustic Equivalent |
//! |------------------|-------------------|
//! | Private fields + getters | Accessors over private fields |
//! | Aggregate root guards | Ownership (borrow checker enforces) |
//! | Factory pattern | `::new()` + builder pattern |
//! | Domain Events | Return enums from mutations |

pub mod build_session;

pub use build_session::BuildSession;
