//! In-memory character finalizer.

use async_trait::async_trait;
use dashmap::DashMap;

use charbldr_domain::{BuildSession, BuildSummary, CharacterSheetId};

use crate::infrastructure::ports::{CharacterFinalizer, FinalizeError};

/// Keeps finalized builds in memory, keyed by the new character id.
#[derive(Default)]
pub struct InMemoryCharacterFinalizer {
    characters: DashMap<CharacterSheetId, BuildSummary>,
}

impl InMemoryCharacterFinalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: CharacterSheetId) -> Option<BuildSummary> {
        self.characters.get(&id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

#[async_trait]
impl CharacterFinalizer for InMemoryCharacterFinalizer {
    async fn create_from_session(
        &self,
        session: &BuildSession,
    ) -> Result<CharacterSheetId, FinalizeError> {
        let summary = session.summary();
        if !summary.complete {
            return Err(FinalizeError::rejected(format!(
                "build {} has {} unmet requirement(s)",
                summary.session_id,
                summary.issues.len()
            )));
        }

        let id = CharacterSheetId::new();
        tracing::info!(
            character_id = %id,
            session_id = %summary.session_id,
            player_id = %summary.player_id,
            "Stored finalized character"
        );
        self.characters.insert(id, summary);
        Ok(id)
    }
}
