//! Deterministic artifact naming.
//!
//! Names are pure functions of scope and run label, so re-running an
//! identical request produces identical names and overwrites rather than
//! accumulates.

use shiftscope_shared::{BucketKey, TeamScope};

/// Label fragment for a single-conversation run, used in place of a window
/// label.
pub fn single_conversation_label(id: &str) -> String {
    format!("conversation_{id}")
}

/// `{team}_{area}_conversations_{label}.csv`
pub fn conversations_name(key: &BucketKey, label: &str) -> String {
    format!(
        "{}_{}_conversations_{label}.csv",
        key.team.slug(),
        key.area.slug()
    )
}

/// `{team}_{area}_insights_{label}.txt`
pub fn insights_name(key: &BucketKey, label: &str) -> String {
    format!(
        "{}_{}_insights_{label}.txt",
        key.team.slug(),
        key.area.slug()
    )
}

/// `{team}_end_of_shift_{label}.txt`
pub fn end_of_shift_name(team: &TeamScope, label: &str) -> String {
    format!("{}_end_of_shift_{label}.txt", team.slug())
}
