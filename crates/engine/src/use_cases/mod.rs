//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.

pub mod character_build;

// Re-export main types
pub use character_build::{
    ApplyResult, CharacterBuildError, CharacterBuildUseCases, FinalizedCharacter,
};
