//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    config::EngineConfig,
    ports::{CharacterFinalizer, ClockPort, ContentCatalog, TagRegistry},
};
use crate::stores::BuildSessionStore;
use crate::use_cases;

/// Main application state.
///
/// Holds the session store and use cases. Shared behind an `Arc` by whatever
/// surface drives the builds.
pub struct App {
    pub config: EngineConfig,
    pub sessions: Arc<BuildSessionStore>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub character_build: use_cases::CharacterBuildUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        config: EngineConfig,
        catalog: Arc<dyn ContentCatalog>,
        tags: Arc<dyn TagRegistry>,
        finalizer: Arc<dyn CharacterFinalizer>,
    ) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        Self::with_clock(config, catalog, tags, finalizer, clock)
    }

    pub fn with_clock(
        config: EngineConfig,
        catalog: Arc<dyn ContentCatalog>,
        tags: Arc<dyn TagRegistry>,
        finalizer: Arc<dyn CharacterFinalizer>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let sessions = Arc::new(BuildSessionStore::from_config(&config));

        let character_build = use_cases::CharacterBuildUseCases::new(
            sessions.clone(),
            catalog,
            tags,
            finalizer,
            clock,
        )
        .with_default_ability_score(config.default_ability_score);

        Self {
            config,
            sessions,
            use_cases: UseCases { character_build },
        }
    }
}
