//! Record normalization: wire-format conversations into [`Conversation`]s.
//!
//! The summary is taken from the first `conversation_summary` part, the
//! transcript from `comment` parts in order, and custom attributes pass
//! through verbatim. Records without an id are logged and skipped; a
//! malformed record never fails the run.

pub mod text;

use std::collections::BTreeMap;

use chrono::DateTime;
use tracing::{debug, info, warn};

use shiftscope_fetcher::record::{RawPart, RawRecord};
use shiftscope_shared::{AttrValue, Conversation, TranscriptEntry};

use crate::text::clean_fragment;

/// Part type carrying the agent-recorded summary.
const PART_SUMMARY: &str = "conversation_summary";
/// Part type carrying a transcript message.
const PART_COMMENT: &str = "comment";

/// Speaker label when the API omits the author role.
const UNKNOWN_SPEAKER: &str = "unknown";

/// Normalize one raw record. Returns `None` (and logs) when the record has
/// no id; everything else degrades to absent fields.
pub fn normalize(raw: &RawRecord, fetch_index: usize) -> Option<Conversation> {
    let Some(id) = raw.id.clone().filter(|s| !s.is_empty()) else {
        warn!(fetch_index, "record missing id, skipped");
        return None;
    };

    let parts: &[RawPart] = raw
        .conversation_parts
        .as_ref()
        .map(|p| p.conversation_parts.as_slice())
        .unwrap_or_default();

    let summary = parts
        .iter()
        .find(|p| p.part_type.as_deref() == Some(PART_SUMMARY))
        .and_then(|p| p.body.as_deref())
        .map(clean_fragment)
        .filter(|s| !s.is_empty());

    let transcript = parts
        .iter()
        .filter(|p| p.part_type.as_deref() == Some(PART_COMMENT))
        .filter_map(|p| {
            let body = clean_fragment(p.body.as_deref()?);
            if body.is_empty() {
                return None;
            }
            let speaker = p
                .author
                .as_ref()
                .and_then(|a| a.kind.clone())
                .unwrap_or_else(|| UNKNOWN_SPEAKER.into());
            Some(TranscriptEntry {
                speaker,
                text: body,
            })
        })
        .collect();

    let mut attributes = BTreeMap::new();
    for (key, value) in &raw.custom_attributes {
        match AttrValue::from_json(value) {
            Some(v) => {
                attributes.insert(key.clone(), v);
            }
            None => debug!(id, key, "non-scalar attribute value, dropped"),
        }
    }

    Some(Conversation {
        id,
        fetch_index,
        created_at: raw.created_at.and_then(|t| DateTime::from_timestamp(t, 0)),
        updated_at: raw.updated_at.and_then(|t| DateTime::from_timestamp(t, 0)),
        closed_at: raw
            .statistics
            .as_ref()
            .and_then(|s| s.last_close_at)
            .and_then(|t| DateTime::from_timestamp(t, 0)),
        state: raw.state.clone(),
        summary,
        transcript,
        attributes,
        team_assignee_id: raw.team_assignee_id,
    })
}

/// Normalize a fetched batch, preserving fetch order. Skips are counted,
/// never fatal.
pub fn normalize_all(records: &[RawRecord]) -> Vec<Conversation> {
    let mut out = Vec::with_capacity(records.len());
    for (index, raw) in records.iter().enumerate() {
        if let Some(conversation) = normalize(raw, index) {
            out.push(conversation);
        }
    }
    let skipped = records.len() - out.len();
    if skipped > 0 {
        info!(total = records.len(), skipped, "normalization dropped malformed records");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_from_json(json: &str) -> RawRecord {
        serde_json::from_str(json).expect("raw record")
    }

    #[test]
    fn extracts_summary_and_transcript() {
        let raw = raw_from_json(
            r#"{
                "id": "42",
                "state": "closed",
                "created_at": 1741000000,
                "statistics": {"last_close_at": 1741100000},
                "conversation_parts": {"conversation_parts": [
                    {"part_type": "comment", "body": "<p>my swap is stuck</p>", "author": {"type": "user"}},
                    {"part_type": "note", "body": "internal note"},
                    {"part_type": "conversation_summary", "body": "<b>Swap stuck pending</b>"},
                    {"part_type": "comment", "body": "looking into it", "author": {"type": "admin"}}
                ]}
            }"#,
        );

        let conv = normalize(&raw, 0).expect("conversation");
        assert_eq!(conv.summary.as_deref(), Some("Swap stuck pending"));
        assert_eq!(conv.transcript.len(), 2);
        assert_eq!(conv.transcript[0].speaker, "user");
        assert_eq!(conv.transcript[0].text, "my swap is stuck");
        assert_eq!(conv.transcript[1].speaker, "admin");
        assert!(conv.closed_at.is_some());
    }

    #[test]
    fn first_summary_part_wins() {
        let raw = raw_from_json(
            r#"{
                "id": "1",
                "conversation_parts": {"conversation_parts": [
                    {"part_type": "conversation_summary", "body": "first"},
                    {"part_type": "conversation_summary", "body": "second"}
                ]}
            }"#,
        );
        let conv = normalize(&raw, 0).expect("conversation");
        assert_eq!(conv.summary.as_deref(), Some("first"));
    }

    #[test]
    fn missing_summary_is_absent_not_empty() {
        let raw = raw_from_json(r#"{"id": "1"}"#);
        let conv = normalize(&raw, 0).expect("conversation");
        assert_eq!(conv.summary, None);
        assert!(conv.transcript.is_empty());
    }

    #[test]
    fn missing_id_skips_record() {
        let raw = raw_from_json(r#"{"state": "closed"}"#);
        assert!(normalize(&raw, 0).is_none());
        let raw = raw_from_json(r#"{"id": ""}"#);
        assert!(normalize(&raw, 0).is_none());
    }

    #[test]
    fn comment_without_author_gets_unknown_speaker() {
        let raw = raw_from_json(
            r#"{
                "id": "1",
                "conversation_parts": {"conversation_parts": [
                    {"part_type": "comment", "body": "hello"}
                ]}
            }"#,
        );
        let conv = normalize(&raw, 0).expect("conversation");
        assert_eq!(conv.transcript[0].speaker, "unknown");
    }

    #[test]
    fn attributes_pass_through_scalars_verbatim() {
        let raw = raw_from_json(
            r#"{
                "id": "1",
                "custom_attributes": {
                    "MetaMask area": "Swaps",
                    "Priority": 2,
                    "Escalated": false,
                    "Labels": ["a", "b"],
                    "Empty": null
                }
            }"#,
        );
        let conv = normalize(&raw, 0).expect("conversation");
        assert_eq!(conv.attributes.len(), 3);
        assert_eq!(
            conv.attributes.get("MetaMask area"),
            Some(&AttrValue::Text("Swaps".into()))
        );
        assert_eq!(
            conv.attributes.get("Priority"),
            Some(&AttrValue::Number(2.0))
        );
        assert_eq!(
            conv.attributes.get("Escalated"),
            Some(&AttrValue::Bool(false))
        );
    }

    #[test]
    fn normalize_all_preserves_order_and_counts_skips() {
        let records = vec![
            raw_from_json(r#"{"id": "a"}"#),
            raw_from_json(r#"{"state": "closed"}"#),
            raw_from_json(r#"{"id": "b"}"#),
        ];
        let conversations = normalize_all(&records);
        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[0].id, "a");
        assert_eq!(conversations[0].fetch_index, 0);
        assert_eq!(conversations[1].id, "b");
        assert_eq!(conversations[1].fetch_index, 2);
    }
}
