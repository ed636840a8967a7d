//! Build resolution - the pieces a [`BuildSession`](crate::aggregates::BuildSession)
//! orchestrates.
//!
//! - `pending`: per-source choices derived from the selected content
//! - `merge`: same-category choices combined for the player
//! - `equipment`: wildcard tags, bundles and drilldown
//! - `invalidation`: what each upstream selection clears
//! - `completion`: the finalization gate
//! - `summary`: render snapshot

mod completion;
mod equipment;
mod invalidation;
mod merge;
mod pending;
mod summary;

pub use completion::{completion_issues, is_build_complete, CompletionIssue};
pub use equipment::{extract_tag, replace_first_tag, resolve_tag, Drilldown};
pub use invalidation::{cleared_by, DependentState, SelectionField, INVALIDATION_TABLE};
pub use merge::{merge_choices, MergedChoice, OptionSelection};
pub use pending::{
    derive_pending_choices, ChoiceSource, KnownGrants, PendingChoice, SourceContribution,
};
pub use summary::{AbilitySummary, BuildSummary};
