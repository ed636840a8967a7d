//! CharBldr Engine - Main entry point.
//!
//! Hosts the built-in content and walks one scripted build from an empty
//! session to a finalized character, printing the final summary as JSON.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use charbldr_domain::{
    Ability, BuildEvent, BuildSummary, ChoiceCategory, ContentKey, MergedChoice,
    RacialBonusDistribution,
};
use charbldr_engine::infrastructure::{
    config::EngineConfig,
    finalizer::InMemoryCharacterFinalizer,
    srd::{srd_catalog, srd_tags},
};
use charbldr_engine::use_cases::CharacterBuildUseCases;
use charbldr_engine::App;

const DEMO_PLAYER: &str = "demo-player";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charbldr_engine=debug,charbldr_domain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CharBldr Engine");

    let config = EngineConfig::from_env().context("Invalid engine configuration")?;
    tracing::info!(
        mailbox_capacity = config.mailbox_capacity,
        max_sessions = config.max_sessions,
        default_ability_score = config.default_ability_score,
        "Loaded configuration"
    );

    let catalog = Arc::new(srd_catalog().context("Built-in content failed validation")?);
    let tags = Arc::new(srd_tags());
    let finalizer = Arc::new(InMemoryCharacterFinalizer::new());

    let app = App::new(config, catalog, tags, finalizer.clone());
    let builds = &app.use_cases.character_build;

    builds.start(DEMO_PLAYER).await?;
    for event in [
        BuildEvent::SetCharacterName {
            name: Some("Thorin Stonehelm".into()),
        },
        BuildEvent::SelectRace {
            key: Some(ContentKey::new("dwarf")),
        },
        BuildEvent::SelectSubrace {
            key: Some(ContentKey::new("hill_dwarf")),
        },
        BuildEvent::SelectClass {
            key: Some(ContentKey::new("fighter")),
        },
        BuildEvent::SelectBackground {
            key: Some(ContentKey::new("acolyte")),
        },
        BuildEvent::SetRacialBonusDistribution {
            distribution: Some(RacialBonusDistribution::PlusTwoPlusOne),
        },
        BuildEvent::ToggleRacialBonus {
            ability: Ability::Con,
            magnitude: Some(2),
        },
        BuildEvent::ToggleRacialBonus {
            ability: Ability::Str,
            magnitude: Some(1),
        },
    ] {
        builds.apply(DEMO_PLAYER, event).await?;
    }

    for merged in builds.merged_choices(DEMO_PLAYER).await? {
        fill_choice(builds, &merged).await?;
    }

    let summary = builds.summary(DEMO_PLAYER).await?;
    if !summary.complete {
        for issue in &summary.issues {
            tracing::warn!(issue = %issue, "Demo build left a requirement open");
        }
    }

    let finalized = builds.finalize(DEMO_PLAYER).await?;
    let character = finalizer
        .get(finalized.character_id)
        .context("Finalized character missing from the in-memory store")?;

    println!("{}", serde_json::to_string_pretty(&character)?);
    tracing::info!(character_id = %finalized.character_id, "Demo build finalized");

    Ok(())
}

/// Pick the first available options of `merged` until it is satisfied.
async fn fill_choice(
    builds: &CharacterBuildUseCases,
    merged: &MergedChoice,
) -> anyhow::Result<()> {
    if merged.category == ChoiceCategory::Equipment {
        let Some(choice_id) = merged.constituent_ids.first() else {
            return Ok(());
        };
        for option_index in 0..merged.options.len() {
            let mut result = builds
                .apply(
                    DEMO_PLAYER,
                    BuildEvent::SelectEquipmentOption {
                        choice_id: choice_id.clone(),
                        option_index,
                    },
                )
                .await?;

            while let Some(item_id) = result
                .summary
                .drilldown
                .as_ref()
                .and_then(|drilldown| drilldown.items.first().cloned())
            {
                result = builds
                    .apply(DEMO_PLAYER, BuildEvent::ResolveDrilldown { item_id })
                    .await?;
            }
            if result.summary.drilldown.is_some() {
                // Nothing to pick from; try the next alternative
                builds.apply(DEMO_PLAYER, BuildEvent::CancelDrilldown).await?;
                continue;
            }
            if is_satisfied(&result.summary, choice_id) {
                return Ok(());
            }
        }
        return Ok(());
    }

    let mut chosen = merged.chosen_count();
    for option in merged.options.iter().filter(|o| !o.is_selected()) {
        if chosen >= usize::from(merged.choose) {
            break;
        }
        let result = builds
            .apply(
                DEMO_PLAYER,
                BuildEvent::ToggleMergedOption {
                    category: merged.category,
                    option: option.key.clone(),
                },
            )
            .await?;
        if result.outcome.changed() {
            chosen += 1;
        }
    }
    Ok(())
}

fn is_satisfied(summary: &BuildSummary, choice_id: &str) -> bool {
    summary
        .merged_choices
        .iter()
        .filter(|merged| merged.constituent_ids.iter().any(|id| id == choice_id))
        .all(MergedChoice::is_satisfied)
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
