//! Character build operation errors.

use charbldr_domain::CompletionIssue;

use crate::infrastructure::ports::FinalizeError;
use crate::stores::BuildStoreError;

/// Errors that can occur during character build operations.
#[derive(Debug, thiserror::Error)]
pub enum CharacterBuildError {
    #[error("Session error: {0}")]
    Store(#[from] BuildStoreError),

    #[error("Build is incomplete: {} unmet requirement(s)", .issues.len())]
    Incomplete { issues: Vec<CompletionIssue> },

    #[error("Finalization failed: {0}")]
    Finalize(#[from] FinalizeError),
}
