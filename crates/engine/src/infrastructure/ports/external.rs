//! External collaborator ports.

use async_trait::async_trait;
use charbldr_domain::{BuildSession, CharacterSheetId};

use super::error::FinalizeError;

// =============================================================================
// Character Finalization
// =============================================================================

/// Turns a complete build into a persisted character.
///
/// Called with a snapshot of the session; the live session is only dropped
/// once this succeeds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterFinalizer: Send + Sync {
    async fn create_from_session(
        &self,
        session: &BuildSession,
    ) -> Result<CharacterSheetId, FinalizeError>;
}
