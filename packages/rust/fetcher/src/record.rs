//! Wire-format records for the remote conversation API.
//!
//! Deserialization is deliberately lenient: every field is optional so a
//! single malformed record degrades to a normalizer skip instead of failing
//! the whole page.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A conversation as returned by the search or single-fetch endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub team_assignee_id: Option<i64>,
    #[serde(default)]
    pub custom_attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub statistics: Option<RawStatistics>,
    #[serde(default)]
    pub conversation_parts: Option<RawPartList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatistics {
    #[serde(default)]
    pub last_close_at: Option<i64>,
}

/// The nested `conversation_parts.conversation_parts` container.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPartList {
    #[serde(default)]
    pub conversation_parts: Vec<RawPart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPart {
    #[serde(default)]
    pub part_type: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: Option<RawAuthor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthor {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Response envelope for `POST /conversations/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub conversations: Vec<RawRecord>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub pages: Option<SearchPages>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPages {
    #[serde(default)]
    pub next: Option<SearchCursor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchCursor {
    #[serde(default)]
    pub starting_after: Option<String>,
}

/// Response envelope for `GET /teams`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamsResponse {
    #[serde(default)]
    pub teams: Vec<RawTeam>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeam {
    /// The API reports team ids as strings in the directory but numbers on
    /// conversations; accept either.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
}

impl RawTeam {
    pub fn id_as_i64(&self) -> Option<i64> {
        match self.id.as_ref()? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}
