//! Error types for port operations.

/// Errors a [`CharacterFinalizer`](super::CharacterFinalizer) can report.
#[derive(Debug, thiserror::Error)]
pub enum FinalizeError {
    /// The collaborator refused the build (e.g. it failed its own checks).
    #[error("Character rejected: {0}")]
    Rejected(String),

    /// The collaborator could not be reached or failed internally.
    #[error("Finalizer unavailable: {0}")]
    Unavailable(String),
}

impl FinalizeError {
    pub fn rejected(message: impl ToString) -> Self {
        Self::Rejected(message.to_string())
    }

    pub fn unavailable(message: impl ToString) -> Self {
        Self::Unavailable(message.to_string())
    }
}
