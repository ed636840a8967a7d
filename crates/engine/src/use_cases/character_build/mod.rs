//! Character build use cases.
//!
//! Drives a player's build session through the session store:
//! - Starting and cancelling a build
//! - Applying build events and returning the refreshed summary
//! - Finalizing a complete build into a character

mod error;

pub use error::CharacterBuildError;

use std::sync::Arc;

use serde::Serialize;

use charbldr_domain::{
    BuildEvent, BuildEventOutcome, BuildSession, BuildSessionId, BuildSummary, CharacterSheetId,
    ContentCatalog, MergedChoice, TagRegistry, DEFAULT_ABILITY_SCORE,
};

use crate::infrastructure::ports::{CharacterFinalizer, ClockPort};
use crate::stores::BuildSessionStore;

/// What a single build event did, plus the state to render next.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResult {
    pub outcome: BuildEventOutcome,
    pub summary: BuildSummary,
}

/// A build turned into a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedCharacter {
    pub player_id: String,
    pub session_id: BuildSessionId,
    pub character_id: CharacterSheetId,
}

/// Container for character build use cases.
pub struct CharacterBuildUseCases {
    store: Arc<BuildSessionStore>,
    catalog: Arc<dyn ContentCatalog>,
    tags: Arc<dyn TagRegistry>,
    finalizer: Arc<dyn CharacterFinalizer>,
    clock: Arc<dyn ClockPort>,
    default_ability_score: u8,
}

impl CharacterBuildUseCases {
    pub fn new(
        store: Arc<BuildSessionStore>,
        catalog: Arc<dyn ContentCatalog>,
        tags: Arc<dyn TagRegistry>,
        finalizer: Arc<dyn CharacterFinalizer>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            store,
            catalog,
            tags,
            finalizer,
            clock,
            default_ability_score: DEFAULT_ABILITY_SCORE,
        }
    }

    pub fn with_default_ability_score(mut self, score: u8) -> Self {
        self.default_ability_score = score;
        self
    }

    /// Begin a fresh build, discarding any build the player already had open.
    pub async fn start(&self, player_id: &str) -> Result<BuildSummary, CharacterBuildError> {
        let session = BuildSession::new(
            player_id,
            Arc::clone(&self.catalog),
            Arc::clone(&self.tags),
            self.clock.now(),
        )
        .with_default_ability_score(self.default_ability_score);

        self.store.insert(session)?;
        self.summary(player_id).await
    }

    /// Apply one event to the player's build.
    pub async fn apply(
        &self,
        player_id: &str,
        event: BuildEvent,
    ) -> Result<ApplyResult, CharacterBuildError> {
        tracing::debug!(player_id = %player_id, event = ?event, "Applying build event");
        let result = self
            .store
            .with_session(player_id, move |session| {
                let outcome = session.apply(event);
                ApplyResult {
                    outcome,
                    summary: session.summary(),
                }
            })
            .await?;

        if !result.outcome.changed() {
            tracing::debug!(
                player_id = %player_id,
                outcome = ?result.outcome,
                "Build event left the session unchanged"
            );
        }
        Ok(result)
    }

    pub async fn summary(&self, player_id: &str) -> Result<BuildSummary, CharacterBuildError> {
        Ok(self
            .store
            .with_session(player_id, |session| session.summary())
            .await?)
    }

    pub async fn merged_choices(
        &self,
        player_id: &str,
    ) -> Result<Vec<MergedChoice>, CharacterBuildError> {
        Ok(self
            .store
            .with_session(player_id, |session| session.merged_choices())
            .await?)
    }

    pub async fn is_complete(&self, player_id: &str) -> Result<bool, CharacterBuildError> {
        Ok(self
            .store
            .with_session(player_id, |session| session.is_build_complete())
            .await?)
    }

    /// Abandon the player's build. Returns whether one was open.
    pub fn cancel(&self, player_id: &str) -> bool {
        self.store.remove(player_id)
    }

    /// Hand a complete build to the finalizer and close the session.
    ///
    /// The session stays open if the build is incomplete or the finalizer fails.
    pub async fn finalize(
        &self,
        player_id: &str,
    ) -> Result<FinalizedCharacter, CharacterBuildError> {
        let snapshot = self
            .store
            .with_session(player_id, |session| {
                let issues = session.completion_issues();
                if issues.is_empty() {
                    Ok(session.clone())
                } else {
                    Err(issues)
                }
            })
            .await?;

        let session = match snapshot {
            Ok(session) => session,
            Err(issues) => {
                tracing::info!(
                    player_id = %player_id,
                    issues = issues.len(),
                    "Refusing to finalize incomplete build"
                );
                return Err(CharacterBuildError::Incomplete { issues });
            }
        };

        let character_id = self
            .finalizer
            .create_from_session(&session)
            .await
            .map_err(|e| {
                tracing::warn!(player_id = %player_id, error = %e, "Finalizer failed");
                e
            })?;

        self.store.remove_if_session(player_id, session.id());
        tracing::info!(
            player_id = %player_id,
            session_id = %session.id(),
            character_id = %character_id,
            "Finalized character build"
        );

        Ok(FinalizedCharacter {
            player_id: player_id.to_string(),
            session_id: session.id(),
            character_id,
        })
    }
}
