//! Engine configuration loaded from the environment.
//!
//! Supported environment variables:
//! - `CHARBLDR_MAILBOX_CAPACITY`: bounded mailbox size per build session (default 32, must be > 0)
//! - `CHARBLDR_MAX_SESSIONS`: live build sessions before new players are refused (default 1024, must be > 0)
//! - `CHARBLDR_DEFAULT_ABILITY_SCORE`: starting score for every ability (default 10, clamped to 1-20)

use anyhow::{ensure, Context};
use charbldr_domain::{DEFAULT_ABILITY_SCORE, MAX_ABILITY_SCORE, MIN_ABILITY_SCORE};

pub const MAILBOX_CAPACITY_VAR: &str = "CHARBLDR_MAILBOX_CAPACITY";
pub const MAX_SESSIONS_VAR: &str = "CHARBLDR_MAX_SESSIONS";
pub const DEFAULT_ABILITY_SCORE_VAR: &str = "CHARBLDR_DEFAULT_ABILITY_SCORE";

const DEFAULT_MAILBOX_CAPACITY: usize = 32;
const DEFAULT_MAX_SESSIONS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub mailbox_capacity: usize,
    pub max_sessions: usize,
    pub default_ability_score: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            max_sessions: DEFAULT_MAX_SESSIONS,
            default_ability_score: DEFAULT_ABILITY_SCORE,
        }
    }
}

impl EngineConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(val) = lookup(MAILBOX_CAPACITY_VAR) {
            config.mailbox_capacity = val
                .trim()
                .parse()
                .with_context(|| format!("{MAILBOX_CAPACITY_VAR} is not a valid number: {val:?}"))?;
            ensure!(
                config.mailbox_capacity > 0,
                "{MAILBOX_CAPACITY_VAR} must be greater than zero"
            );
        }

        if let Some(val) = lookup(MAX_SESSIONS_VAR) {
            config.max_sessions = val
                .trim()
                .parse()
                .with_context(|| format!("{MAX_SESSIONS_VAR} is not a valid number: {val:?}"))?;
            ensure!(
                config.max_sessions > 0,
                "{MAX_SESSIONS_VAR} must be greater than zero"
            );
        }

        if let Some(val) = lookup(DEFAULT_ABILITY_SCORE_VAR) {
            let score: u8 = val.trim().parse().with_context(|| {
                format!("{DEFAULT_ABILITY_SCORE_VAR} is not a valid score: {val:?}")
            })?;
            let clamped = score.clamp(MIN_ABILITY_SCORE, MAX_ABILITY_SCORE);
            if clamped != score {
                tracing::warn!(
                    score,
                    clamped,
                    "{DEFAULT_ABILITY_SCORE_VAR} out of range [{MIN_ABILITY_SCORE}, {MAX_ABILITY_SCORE}], clamping"
                );
            }
            config.default_ability_score = clamped;
        }

        Ok(config)
    }
}
