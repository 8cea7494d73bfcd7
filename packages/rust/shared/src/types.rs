//! Core domain types for shiftscope reporting runs.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiftscopeError};

// ---------------------------------------------------------------------------
// AreaKey
// ---------------------------------------------------------------------------

/// Product areas a conversation can be attributed to.
///
/// `Other` is a catch-all that only exists when the unknown-area policy
/// coerces unrecognized values; it is not part of the standard sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaKey {
    Card,
    Dashboard,
    Ramps,
    Sdk,
    Security,
    Snaps,
    Staking,
    Swaps,
    Wallet,
    WalletApi,
    Other,
}

impl AreaKey {
    /// The standard areas covered by a full sweep, in render order.
    pub const STANDARD: [AreaKey; 10] = [
        AreaKey::Card,
        AreaKey::Dashboard,
        AreaKey::Ramps,
        AreaKey::Sdk,
        AreaKey::Security,
        AreaKey::Snaps,
        AreaKey::Staking,
        AreaKey::Swaps,
        AreaKey::Wallet,
        AreaKey::WalletApi,
    ];

    /// Human-readable label used in report headings.
    pub fn label(&self) -> &'static str {
        match self {
            AreaKey::Card => "Card",
            AreaKey::Dashboard => "Dashboard",
            AreaKey::Ramps => "Ramps",
            AreaKey::Sdk => "SDK",
            AreaKey::Security => "Security",
            AreaKey::Snaps => "Snaps",
            AreaKey::Staking => "Staking",
            AreaKey::Swaps => "Swaps",
            AreaKey::Wallet => "Wallet",
            AreaKey::WalletApi => "Wallet API",
            AreaKey::Other => "Other",
        }
    }

    /// Filename-safe slug.
    pub fn slug(&self) -> &'static str {
        match self {
            AreaKey::Card => "card",
            AreaKey::Dashboard => "dashboard",
            AreaKey::Ramps => "ramps",
            AreaKey::Sdk => "sdk",
            AreaKey::Security => "security",
            AreaKey::Snaps => "snaps",
            AreaKey::Staking => "staking",
            AreaKey::Swaps => "swaps",
            AreaKey::Wallet => "wallet",
            AreaKey::WalletApi => "wallet_api",
            AreaKey::Other => "other",
        }
    }
}

impl std::fmt::Display for AreaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for AreaKey {
    type Err = ShiftscopeError;

    /// Parse a canonical area label (case-insensitive). Synonym folding for
    /// raw attribute values lives in the classifier, not here.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        AreaKey::STANDARD
            .iter()
            .chain(std::iter::once(&AreaKey::Other))
            .find(|a| a.label().eq_ignore_ascii_case(&normalized) || a.slug() == normalized)
            .copied()
            .ok_or_else(|| ShiftscopeError::validation(format!("unknown area: {s}")))
    }
}

// ---------------------------------------------------------------------------
// TeamKey
// ---------------------------------------------------------------------------

/// A team name as registered in the roster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamKey(pub String);

impl TeamKey {
    /// Bucket for conversations whose team attribution matches no roster entry.
    pub const UNCLASSIFIED: &'static str = "Unclassified";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn unclassified() -> Self {
        Self(Self::UNCLASSIFIED.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filename-safe slug: lowercase, non-alphanumerics collapsed to `_`.
    pub fn slug(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        let mut last_sep = true;
        for ch in self.0.chars() {
            if ch.is_ascii_alphanumeric() {
                out.push(ch.to_ascii_lowercase());
                last_sep = false;
            } else if !last_sep {
                out.push('_');
                last_sep = true;
            }
        }
        while out.ends_with('_') {
            out.pop();
        }
        out
    }
}

impl std::fmt::Display for TeamKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// AttrValue
// ---------------------------------------------------------------------------

/// A custom-attribute value as received from the remote API.
///
/// Attribute keys are free-form and pass through the pipeline verbatim;
/// values are constrained to this scalar union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl AttrValue {
    /// Convert a raw JSON scalar; `null`, arrays, and objects yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(AttrValue::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(AttrValue::Number),
            serde_json::Value::Bool(b) => Some(AttrValue::Bool(*b)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            AttrValue::Number(n) => write!(f, "{n}"),
            AttrValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// One utterance from a conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Author role as reported by the API (`user`, `admin`, `bot`, ...).
    pub speaker: String,
    /// Markup-stripped message text.
    pub text: String,
}

/// A normalized support conversation, the unit flowing through
/// classification and aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Remote conversation identifier.
    pub id: String,
    /// Position in fetch order; used for deterministic tie-breaks and
    /// example selection.
    pub fetch_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// When the conversation was last closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Markup-stripped agent summary, if one was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Ordered comment parts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transcript: Vec<TranscriptEntry>,
    /// Custom attributes, verbatim from the API.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttrValue>,
    /// Assigned team id from the API, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_assignee_id: Option<i64>,
}

impl Conversation {
    /// Flattened transcript in `speaker: text` form, one line per entry.
    pub fn transcript_text(&self) -> String {
        self.transcript
            .iter()
            .map(|e| format!("{}: {}", e.speaker, e.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ---------------------------------------------------------------------------
// Bucket scopes
// ---------------------------------------------------------------------------

/// Team axis of a report bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TeamScope {
    All,
    Team(TeamKey),
}

impl TeamScope {
    pub fn slug(&self) -> String {
        match self {
            TeamScope::All => "all_teams".into(),
            TeamScope::Team(t) => t.slug(),
        }
    }
}

impl std::fmt::Display for TeamScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamScope::All => f.write_str("All Teams"),
            TeamScope::Team(t) => f.write_str(t.as_str()),
        }
    }
}

/// Area axis of a report bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AreaScope {
    All,
    Area(AreaKey),
}

impl AreaScope {
    pub fn slug(&self) -> String {
        match self {
            AreaScope::All => "all_areas".into(),
            AreaScope::Area(a) => a.slug().into(),
        }
    }
}

impl std::fmt::Display for AreaScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AreaScope::All => f.write_str("All Areas"),
            AreaScope::Area(a) => f.write_str(a.label()),
        }
    }
}

/// One cell of the cross-tabulation: a (team, area) pair where either axis
/// may be the ALL wildcard.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BucketKey {
    pub team: TeamScope,
    pub area: AreaScope,
}

impl BucketKey {
    pub fn new(team: TeamScope, area: AreaScope) -> Self {
        Self { team, area }
    }
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.team, self.area)
    }
}

// ---------------------------------------------------------------------------
// ReportWindow
// ---------------------------------------------------------------------------

/// An inclusive day range resolved to timezone-aware fetch bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    /// First instant of `start_day` in the reference timezone, as UTC.
    pub start: DateTime<Utc>,
    /// Last second of `end_day` in the reference timezone, as UTC.
    pub end: DateTime<Utc>,
    pub start_day: NaiveDate,
    pub end_day: NaiveDate,
}

impl ReportWindow {
    /// Resolve a day range in `tz` to concrete UTC bounds
    /// (00:00:00 on the first day through 23:59:59 on the last).
    pub fn from_days(tz: Tz, start_day: NaiveDate, end_day: NaiveDate) -> Result<Self> {
        if end_day < start_day {
            return Err(ShiftscopeError::validation(format!(
                "end date {end_day} precedes start date {start_day}"
            )));
        }
        let start = local_midnight(tz, start_day)?;
        let end_time = end_day
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| ShiftscopeError::validation("invalid end-of-day time"))?;
        let end = tz
            .from_local_datetime(&end_time)
            .earliest()
            .ok_or_else(|| {
                ShiftscopeError::validation(format!("no valid local time for {end_time} in {tz}"))
            })?
            .with_timezone(&Utc);
        Ok(Self {
            start,
            end,
            start_day,
            end_day,
        })
    }

    /// Filename fragment: `YYYYMMDD_to_YYYYMMDD`.
    pub fn file_label(&self) -> String {
        format!(
            "{}_to_{}",
            self.start_day.format("%Y%m%d"),
            self.end_day.format("%Y%m%d")
        )
    }

    /// Heading fragment: `YYYY-MM-DD to YYYY-MM-DD`.
    pub fn human_label(&self) -> String {
        format!("{} to {}", self.start_day, self.end_day)
    }

    /// Epoch-second bounds for the remote search filter.
    pub fn epoch_bounds(&self) -> (i64, i64) {
        (self.start.timestamp(), self.end.timestamp())
    }
}

fn local_midnight(tz: Tz, day: NaiveDate) -> Result<DateTime<Utc>> {
    let naive = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ShiftscopeError::validation("invalid midnight time"))?;
    Ok(tz
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| {
            ShiftscopeError::validation(format!("no valid local time for {naive} in {tz}"))
        })?
        .with_timezone(&Utc))
}

// ---------------------------------------------------------------------------
// Run outcome & artifacts
// ---------------------------------------------------------------------------

/// Terminal status of a reporting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Artifacts were produced.
    Success,
    /// The window matched no conversations; nothing to report.
    NoData,
    /// Conversations existed but none survived the requested team/area narrowing.
    NoFilesForTarget,
    /// Fetching failed after retries, or the targeted conversation does not exist.
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Success => "success",
            RunStatus::NoData => "no_data",
            RunStatus::NoFilesForTarget => "no_files_for_target",
            RunStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// The kind of rendered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Conversations,
    Insights,
    EndOfShift,
}

/// A rendered artifact held in memory; delivery (disk, upload, ...) is the
/// caller's concern.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
}
