//! Declarative team roster and team/area eligibility matrix.
//!
//! Each roster entry is either dedicated to a single area or general with a
//! list of excluded areas. Adding a team is a one-line roster change; no
//! classification code needs to know about individual teams.

use serde::{Deserialize, Serialize};

use shiftscope_shared::{AreaKey, AreaScope, Result, ShiftscopeError, TeamKey};

/// Which areas a team may be reported against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamAreas {
    /// Exactly one eligible area.
    Dedicated(AreaKey),
    /// Every standard area except the listed ones.
    General { excluded: Vec<AreaKey> },
}

/// One roster entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSpec {
    pub name: TeamKey,
    pub areas: TeamAreas,
}

impl TeamSpec {
    pub fn dedicated(name: &str, area: AreaKey) -> Self {
        Self {
            name: TeamKey::new(name),
            areas: TeamAreas::Dedicated(area),
        }
    }

    pub fn general(name: &str, excluded: &[AreaKey]) -> Self {
        Self {
            name: TeamKey::new(name),
            areas: TeamAreas::General {
                excluded: excluded.to_vec(),
            },
        }
    }

    /// Whether this team may be reported against `area`.
    pub fn eligible(&self, area: AreaKey) -> bool {
        match &self.areas {
            TeamAreas::Dedicated(a) => *a == area,
            TeamAreas::General { excluded } => {
                AreaKey::STANDARD.contains(&area) && !excluded.contains(&area)
            }
        }
    }

    /// Eligible areas in render order.
    pub fn eligible_areas(&self) -> Vec<AreaKey> {
        AreaKey::STANDARD
            .iter()
            .copied()
            .filter(|a| self.eligible(*a))
            .collect()
    }

    /// Default area substituted when a team-scoped run names no area:
    /// the sole eligible area if there is exactly one, otherwise ALL.
    pub fn default_area_scope(&self) -> AreaScope {
        match self.eligible_areas().as_slice() {
            [only] => AreaScope::Area(*only),
            _ => AreaScope::All,
        }
    }

    /// Areas a run scoped to this team renders: the requested area after an
    /// eligibility check, or the default substitution when none is named.
    pub fn scoped_areas(&self, requested: Option<AreaKey>) -> Result<Vec<AreaKey>> {
        match requested {
            Some(area) if self.eligible(area) => Ok(vec![area]),
            Some(area) => Err(ShiftscopeError::config(format!(
                "team {} is not eligible for area {}",
                self.name, area
            ))),
            None => match self.default_area_scope() {
                AreaScope::Area(area) => Ok(vec![area]),
                AreaScope::All => Ok(self.eligible_areas()),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// The full team roster. Lookup is case-insensitive; names not in the
/// roster resolve to the `Unclassified` bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub teams: Vec<TeamSpec>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            teams: vec![
                TeamSpec::dedicated("Card", AreaKey::Card),
                TeamSpec::general("Tier 1", &[AreaKey::Card]),
                TeamSpec::general("Tier 2", &[AreaKey::Card]),
                TeamSpec::general("Unclassified", &[]),
            ],
        }
    }
}

impl Roster {
    pub fn find(&self, name: &str) -> Option<&TeamSpec> {
        let trimmed = name.trim();
        self.teams
            .iter()
            .find(|t| t.name.as_str().eq_ignore_ascii_case(trimmed))
    }

    /// Resolve a raw team name to a roster key, falling back to
    /// `Unclassified`.
    pub fn resolve(&self, name: &str) -> TeamKey {
        self.find(name)
            .map(|t| t.name.clone())
            .unwrap_or_else(TeamKey::unclassified)
    }

    /// Roster entry for a resolved key. `Unclassified` is always present.
    pub fn spec(&self, team: &TeamKey) -> Option<&TeamSpec> {
        self.find(team.as_str())
    }
}
