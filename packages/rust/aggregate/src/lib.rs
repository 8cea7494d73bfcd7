//! Bucket routing and per-bucket aggregation.
//!
//! Every classified conversation fans out to its (team, area) cell plus the
//! ALL roll-ups; unassigned-area conversations reach only the ALL-area
//! buckets. All tables are computed in fetch order so equal runs over equal
//! data render byte-identical artifacts.

pub mod issues;
pub mod keywords;
pub mod sentiment;
pub mod stopwords;

use std::collections::BTreeMap;

use tracing::debug;

use shiftscope_classify::Classification;
use shiftscope_shared::{AreaScope, BucketKey, Conversation, TeamScope};

pub use crate::issues::{IssueRow, UNSPECIFIED_ISSUE, build_breakdown, issue_label};
pub use crate::keywords::{KeywordRow, top_keywords};
pub use crate::sentiment::mean_sentiment;
pub use crate::stopwords::StopWords;

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// The bucket keys one classified conversation contributes to.
pub fn route(classification: &Classification) -> Vec<BucketKey> {
    let team = TeamScope::Team(classification.team.clone());
    let mut keys = Vec::with_capacity(4);
    if let Some(area) = classification.area {
        keys.push(BucketKey::new(team.clone(), AreaScope::Area(area)));
        keys.push(BucketKey::new(TeamScope::All, AreaScope::Area(area)));
    }
    keys.push(BucketKey::new(team, AreaScope::All));
    keys.push(BucketKey::new(TeamScope::All, AreaScope::All));
    keys
}

/// Group conversations by bucket. Values are indexes into the conversation
/// slice, ascending in fetch order.
pub fn group(
    conversations: &[Conversation],
    classifications: &[Classification],
) -> BTreeMap<BucketKey, Vec<usize>> {
    debug_assert_eq!(conversations.len(), classifications.len());
    let mut buckets: BTreeMap<BucketKey, Vec<usize>> = BTreeMap::new();
    for (index, classification) in classifications.iter().enumerate() {
        for key in route(classification) {
            buckets.entry(key).or_default().push(index);
        }
    }
    debug!(buckets = buckets.len(), "grouped conversations");
    buckets
}

// ---------------------------------------------------------------------------
// Bucket summaries
// ---------------------------------------------------------------------------

/// Everything the renderer needs for one bucket.
#[derive(Debug, Clone)]
pub struct BucketSummary {
    pub key: BucketKey,
    /// Member indexes into the run's conversation slice, in fetch order.
    pub members: Vec<usize>,
    pub issues: Vec<IssueRow>,
    pub keywords: Vec<KeywordRow>,
    pub mean_sentiment: Option<f64>,
}

impl BucketSummary {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn top_issue(&self) -> Option<&IssueRow> {
        self.issues.first()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Summarize one bucket. An empty member list yields an empty summary, which
/// still renders as a "no data" artifact.
pub fn summarize(
    key: BucketKey,
    members: Vec<usize>,
    conversations: &[Conversation],
    stop: &StopWords,
    keyword_limit: usize,
) -> BucketSummary {
    let labels: Vec<String> = members
        .iter()
        .map(|&i| issue_label(&conversations[i], key.area))
        .collect();
    let issues = build_breakdown(&labels);

    let summaries: Vec<&str> = members
        .iter()
        .filter_map(|&i| conversations[i].summary.as_deref())
        .collect();
    let keywords = top_keywords(summaries.iter().copied(), stop, keyword_limit);
    let mean_sentiment = mean_sentiment(summaries.iter().copied());

    BucketSummary {
        key,
        members,
        issues,
        keywords,
        mean_sentiment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use shiftscope_shared::{AreaKey, AttrValue, TeamKey};

    fn conversation(index: usize, attrs: &[(&str, &str)], summary: Option<&str>) -> Conversation {
        Conversation {
            id: format!("c{index}"),
            fetch_index: index,
            created_at: None,
            updated_at: None,
            closed_at: None,
            state: None,
            summary: summary.map(String::from),
            transcript: Vec::new(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), AttrValue::Text(v.to_string())))
                .collect(),
            team_assignee_id: None,
        }
    }

    fn classified(team: &str, area: Option<AreaKey>) -> Classification {
        Classification {
            team: TeamKey::new(team),
            area,
        }
    }

    #[test]
    fn classified_conversation_routes_to_four_buckets() {
        let keys = route(&classified("Tier 1", Some(AreaKey::Swaps)));
        assert_eq!(keys.len(), 4);
        assert!(keys.contains(&BucketKey::new(
            TeamScope::Team(TeamKey::new("Tier 1")),
            AreaScope::Area(AreaKey::Swaps)
        )));
        assert!(keys.contains(&BucketKey::new(TeamScope::All, AreaScope::All)));
    }

    #[test]
    fn unassigned_area_routes_only_to_all_area_buckets() {
        let keys = route(&classified("Tier 1", None));
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().all(|k| k.area == AreaScope::All));
    }

    #[test]
    fn grouping_preserves_fetch_order() {
        let conversations = vec![
            conversation(0, &[], None),
            conversation(1, &[], None),
            conversation(2, &[], None),
        ];
        let classifications = vec![
            classified("Tier 1", Some(AreaKey::Swaps)),
            classified("Tier 2", Some(AreaKey::Swaps)),
            classified("Tier 1", Some(AreaKey::Swaps)),
        ];
        let buckets = group(&conversations, &classifications);

        let all_swaps = &buckets[&BucketKey::new(TeamScope::All, AreaScope::Area(AreaKey::Swaps))];
        assert_eq!(all_swaps, &vec![0, 1, 2]);

        let tier1_swaps = &buckets[&BucketKey::new(
            TeamScope::Team(TeamKey::new("Tier 1")),
            AreaScope::Area(AreaKey::Swaps),
        )];
        assert_eq!(tier1_swaps, &vec![0, 2]);
    }

    #[test]
    fn every_conversation_lands_in_the_global_bucket() {
        let conversations = vec![conversation(0, &[], None), conversation(1, &[], None)];
        let classifications = vec![
            classified("Tier 1", Some(AreaKey::Wallet)),
            classified("Unclassified", None),
        ];
        let buckets = group(&conversations, &classifications);
        let global = &buckets[&BucketKey::new(TeamScope::All, AreaScope::All)];
        assert_eq!(global.len(), 2);
    }

    #[test]
    fn summarize_builds_issue_and_keyword_tables() {
        let conversations: Vec<Conversation> = (0..5)
            .map(|i| {
                let issue = if i < 3 { "Failed Transaction" } else { "Slippage" };
                conversation(
                    i,
                    &[("Swaps issue", issue)],
                    Some(if i < 3 { "swap failed on mainnet" } else { "slippage too high" }),
                )
            })
            .collect();

        let summary = summarize(
            BucketKey::new(TeamScope::All, AreaScope::Area(AreaKey::Swaps)),
            (0..5).collect(),
            &conversations,
            &StopWords::default(),
            10,
        );

        assert_eq!(summary.count(), 5);
        let top = summary.top_issue().expect("top issue");
        assert_eq!(top.label, "Failed Transaction");
        assert_eq!(top.count, 3);
        assert!((top.percent - 60.0).abs() < 1e-9);
        assert!((summary.issues[1].percent - 40.0).abs() < 1e-9);
        assert!(summary.keywords.iter().any(|k| k.word == "swap"));
        // "failed" scores negatively.
        assert!(summary.mean_sentiment.expect("sentiment") < 0.0);
    }

    #[test]
    fn empty_bucket_summarizes_to_empty_tables() {
        let summary = summarize(
            BucketKey::new(TeamScope::All, AreaScope::Area(AreaKey::Snaps)),
            Vec::new(),
            &[],
            &StopWords::default(),
            10,
        );
        assert!(summary.is_empty());
        assert!(summary.issues.is_empty());
        assert!(summary.keywords.is_empty());
        assert_eq!(summary.mean_sentiment, None);
    }
}
