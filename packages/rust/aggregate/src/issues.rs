//! Issue extraction and breakdown tables.
//!
//! Each area designates the custom attributes that carry its issue type;
//! the first non-empty one wins. ALL-area buckets consult the union in
//! area render order.

use serde::Serialize;

use shiftscope_shared::{AreaKey, AreaScope, AttrValue, Conversation};

/// Label used when no issue attribute is populated, so breakdown
/// percentages always cover the whole bucket.
pub const UNSPECIFIED_ISSUE: &str = "Unspecified";

/// Issue source attributes per area, checked in order.
const ISSUE_SOURCES: &[(AreaKey, &[&str])] = &[
    (AreaKey::Card, &["MM Card Issue", "MM Card Partner issue"]),
    (AreaKey::Dashboard, &["Dashboard issue"]),
    (AreaKey::Ramps, &["Buy issue", "Sell issue", "Buy or Sell"]),
    (AreaKey::Sdk, &["SDK issue"]),
    (
        AreaKey::Security,
        &[
            "SRP/PK compromised",
            "User error",
            "Unintended contract interaction",
        ],
    ),
    (AreaKey::Snaps, &["Snaps Category"]),
    (
        AreaKey::Staking,
        &[
            "Staking Feature",
            "Validator Staking Issue",
            "Pooled Staking Issue",
        ],
    ),
    (AreaKey::Swaps, &["Swaps issue", "Native Swaps issue"]),
    (
        AreaKey::Wallet,
        &["Wallet issue", "User training", "Transaction issue"],
    ),
    (AreaKey::WalletApi, &["Wallet API issue"]),
];

/// Generic fallback checked after area-specific sources.
const GENERIC_SOURCES: &[&str] = &["Issue type"];

fn sources_for(scope: AreaScope) -> Vec<&'static str> {
    let mut sources: Vec<&'static str> = Vec::new();
    match scope {
        AreaScope::Area(area) => {
            if let Some((_, attrs)) = ISSUE_SOURCES.iter().find(|(a, _)| *a == area) {
                sources.extend(attrs.iter());
            }
        }
        AreaScope::All => {
            for (_, attrs) in ISSUE_SOURCES {
                sources.extend(attrs.iter());
            }
        }
    }
    sources.extend(GENERIC_SOURCES.iter());
    sources
}

/// The issue label for a conversation viewed through an area scope.
pub fn issue_label(conversation: &Conversation, scope: AreaScope) -> String {
    for source in sources_for(scope) {
        if let Some(AttrValue::Text(value)) = conversation.attributes.get(source) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    UNSPECIFIED_ISSUE.to_string()
}

// ---------------------------------------------------------------------------
// Breakdown
// ---------------------------------------------------------------------------

/// One row of an issue breakdown table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueRow {
    pub label: String,
    pub count: usize,
    /// Share of the bucket, rounded to two decimals.
    pub percent: f64,
}

/// Count issue labels (given in fetch order) into a breakdown sorted by
/// descending count, ties broken by first appearance.
pub fn build_breakdown(labels: &[String]) -> Vec<IssueRow> {
    let total = labels.len();
    if total == 0 {
        return Vec::new();
    }

    let mut order: Vec<String> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    for label in labels {
        match order.iter().position(|l| l == label) {
            Some(i) => counts[i] += 1,
            None => {
                order.push(label.clone());
                counts.push(1);
            }
        }
    }

    let mut indexed: Vec<usize> = (0..order.len()).collect();
    indexed.sort_by(|&a, &b| counts[b].cmp(&counts[a]).then(a.cmp(&b)));

    indexed
        .into_iter()
        .map(|i| IssueRow {
            label: order[i].clone(),
            count: counts[i],
            percent: round2(counts[i] as f64 / total as f64 * 100.0),
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn conversation(attrs: &[(&str, &str)]) -> Conversation {
        let attributes: BTreeMap<String, AttrValue> = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), AttrValue::Text(v.to_string())))
            .collect();
        Conversation {
            id: "1".into(),
            fetch_index: 0,
            created_at: None,
            updated_at: None,
            closed_at: None,
            state: None,
            summary: None,
            transcript: Vec::new(),
            attributes,
            team_assignee_id: None,
        }
    }

    #[test]
    fn first_populated_source_wins() {
        let conv = conversation(&[
            ("Swaps issue", ""),
            ("Native Swaps issue", "Failed Transaction"),
        ]);
        assert_eq!(
            issue_label(&conv, AreaScope::Area(AreaKey::Swaps)),
            "Failed Transaction"
        );
    }

    #[test]
    fn all_scope_consults_union() {
        let conv = conversation(&[("Staking Feature", "Rewards missing")]);
        assert_eq!(issue_label(&conv, AreaScope::All), "Rewards missing");
        // A Swaps-scoped view does not see staking attributes.
        assert_eq!(
            issue_label(&conv, AreaScope::Area(AreaKey::Swaps)),
            UNSPECIFIED_ISSUE
        );
    }

    #[test]
    fn generic_fallback_applies_last() {
        let conv = conversation(&[("Issue type", "General question")]);
        assert_eq!(
            issue_label(&conv, AreaScope::Area(AreaKey::Wallet)),
            "General question"
        );
    }

    #[test]
    fn breakdown_counts_and_percentages() {
        let labels: Vec<String> = ["Failed Transaction", "Failed Transaction", "Slippage",
            "Failed Transaction", "Slippage"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = build_breakdown(&labels);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "Failed Transaction");
        assert_eq!(rows[0].count, 3);
        assert!((rows[0].percent - 60.0).abs() < 1e-9);
        assert_eq!(rows[1].label, "Slippage");
        assert!((rows[1].percent - 40.0).abs() < 1e-9);
    }

    #[test]
    fn breakdown_percentages_round_to_two_decimals() {
        let labels: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let rows = build_breakdown(&labels);
        for row in &rows {
            assert!((row.percent - 33.33).abs() < 1e-9);
        }
    }

    #[test]
    fn breakdown_tie_breaks_by_first_appearance() {
        let labels: Vec<String> = ["b-label", "a-label"].iter().map(|s| s.to_string()).collect();
        let rows = build_breakdown(&labels);
        assert_eq!(rows[0].label, "b-label");
        assert_eq!(rows[1].label, "a-label");
    }

    #[test]
    fn empty_labels_yield_empty_breakdown() {
        assert!(build_breakdown(&[]).is_empty());
    }
}
