//! Deterministic team/area classification.
//!
//! A conversation is attributed to at most one team and at most one area by
//! ordered first-match rules over its custom attributes. The same input and
//! settings always produce the same result; nothing here does I/O.

pub mod area;
pub mod roster;

use std::collections::BTreeMap;

use tracing::debug;

use shiftscope_shared::{
    AreaKey, AttrValue, ClassifyPolicyConfig, Conversation, TeamKey, UnknownAreaPolicy,
};

pub use crate::area::parse_area;
pub use crate::roster::{Roster, TeamAreas, TeamSpec};

/// Classification result for one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub team: TeamKey,
    /// `None` means unassigned: the conversation appears only in ALL-area
    /// buckets.
    pub area: Option<AreaKey>,
}

/// Immutable classifier settings, built once per run.
#[derive(Debug, Clone)]
pub struct ClassifySettings {
    pub area_attribute: String,
    pub team_attribute: String,
    pub unknown_area_policy: UnknownAreaPolicy,
    pub roster: Roster,
    /// Remote team directory (assignee id → team name), used when the team
    /// attribute is absent.
    pub team_directory: BTreeMap<i64, String>,
}

impl ClassifySettings {
    pub fn from_policy(
        policy: &ClassifyPolicyConfig,
        team_directory: BTreeMap<i64, String>,
    ) -> Self {
        Self {
            area_attribute: policy.area_attribute.clone(),
            team_attribute: policy.team_attribute.clone(),
            unknown_area_policy: policy.unknown_area_policy,
            roster: Roster::default(),
            team_directory,
        }
    }
}

/// Classify one conversation.
///
/// Team rules, first match wins:
/// 1. the team attribute, resolved through the roster (unknown names land
///    in `Unclassified` rather than falling through),
/// 2. the assignee id via the team directory,
/// 3. `Unclassified`.
///
/// Area: the area attribute parsed with synonym folding; a present but
/// unrecognized value follows the unknown-area policy, an absent attribute
/// is always unassigned.
pub fn classify(conversation: &Conversation, settings: &ClassifySettings) -> Classification {
    let team = classify_team(conversation, settings);
    let area = classify_area(conversation, settings);
    Classification { team, area }
}

fn classify_team(conversation: &Conversation, settings: &ClassifySettings) -> TeamKey {
    if let Some(AttrValue::Text(name)) = conversation.attributes.get(&settings.team_attribute) {
        if !name.trim().is_empty() {
            return settings.roster.resolve(name);
        }
    }

    if let Some(id) = conversation.team_assignee_id
        && let Some(name) = settings.team_directory.get(&id)
    {
        return settings.roster.resolve(name);
    }

    TeamKey::unclassified()
}

fn classify_area(conversation: &Conversation, settings: &ClassifySettings) -> Option<AreaKey> {
    let value = conversation
        .attributes
        .get(&settings.area_attribute)?
        .as_text()?;
    if value.trim().is_empty() {
        return None;
    }

    match parse_area(value) {
        Some(area) => Some(area),
        None => {
            debug!(id = %conversation.id, value, "unrecognized area value");
            match settings.unknown_area_policy {
                UnknownAreaPolicy::Unassigned => None,
                UnknownAreaPolicy::Other => Some(AreaKey::Other),
            }
        }
    }
}

/// Classify a batch in fetch order.
pub fn classify_all(
    conversations: &[Conversation],
    settings: &ClassifySettings,
) -> Vec<Classification> {
    conversations
        .iter()
        .map(|c| classify(c, settings))
        .collect()
}
