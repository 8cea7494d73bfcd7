//! Insight document rendering.
//!
//! Plain-text documents assembled section by section: header, most frequent
//! issue, full breakdown, example summaries, keywords, sentiment.

use shiftscope_aggregate::BucketSummary;
use shiftscope_shared::Conversation;

/// Render one bucket's insight document.
pub fn render_insights(
    summary: &BucketSummary,
    conversations: &[Conversation],
    period: &str,
    example_limit: usize,
) -> String {
    let mut doc = String::new();

    doc.push_str(&format!("Support Insights: {}\n", summary.key));
    doc.push_str(&format!("Period: {period}\n"));
    doc.push_str(&format!("Total Conversations: {}\n\n", summary.count()));

    if summary.is_empty() {
        doc.push_str("No conversations found for this scope and period.\n");
        return doc;
    }

    if let Some(top) = summary.top_issue() {
        doc.push_str(&format!(
            "Most Frequent Issue: {} (Count: {})\n\n",
            top.label, top.count
        ));
    }

    doc.push_str("Full Breakdown of Issues:\n");
    for row in &summary.issues {
        doc.push_str(&format!(
            "- {}: {} ({:.2}%)\n",
            row.label, row.count, row.percent
        ));
    }
    doc.push('\n');

    if !summary.keywords.is_empty() {
        doc.push_str("Top Keywords:\n");
        for keyword in &summary.keywords {
            doc.push_str(&format!("- {} ({})\n", keyword.word, keyword.count));
        }
        doc.push('\n');
    }

    if let Some(sentiment) = summary.mean_sentiment {
        doc.push_str(&format!("Mean Sentiment: {sentiment:.2}\n\n"));
    }

    let examples: Vec<&str> = summary
        .members
        .iter()
        .filter_map(|&i| conversations[i].summary.as_deref())
        .take(example_limit)
        .collect();
    if !examples.is_empty() {
        doc.push_str("Example Summaries:\n");
        for (n, example) in examples.iter().enumerate() {
            doc.push_str(&format!("{}. {example}\n", n + 1));
        }
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use shiftscope_aggregate::{StopWords, summarize};
    use shiftscope_shared::{AreaKey, AreaScope, AttrValue, BucketKey, TeamScope};

    fn swaps_fixture() -> Vec<Conversation> {
        (0..5)
            .map(|i| {
                let issue = if i < 3 { "Failed Transaction" } else { "Slippage" };
                Conversation {
                    id: format!("c{i}"),
                    fetch_index: i,
                    created_at: None,
                    updated_at: None,
                    closed_at: None,
                    state: Some("closed".into()),
                    summary: Some(format!("swap problem number {i}")),
                    transcript: Vec::new(),
                    attributes: BTreeMap::from([(
                        "Swaps issue".to_string(),
                        AttrValue::Text(issue.to_string()),
                    )]),
                    team_assignee_id: None,
                }
            })
            .collect()
    }

    #[test]
    fn document_carries_breakdown_with_two_decimal_percentages() {
        let conversations = swaps_fixture();
        let summary = summarize(
            BucketKey::new(TeamScope::All, AreaScope::Area(AreaKey::Swaps)),
            (0..5).collect(),
            &conversations,
            &StopWords::default(),
            10,
        );
        let doc = render_insights(&summary, &conversations, "2025-03-03 to 2025-03-09", 5);

        assert!(doc.contains("Support Insights: All Teams / Swaps"));
        assert!(doc.contains("Total Conversations: 5"));
        assert!(doc.contains("Most Frequent Issue: Failed Transaction (Count: 3)"));
        assert!(doc.contains("- Failed Transaction: 3 (60.00%)"));
        assert!(doc.contains("- Slippage: 2 (40.00%)"));
    }

    #[test]
    fn example_summaries_are_first_n_in_fetch_order() {
        let conversations = swaps_fixture();
        let summary = summarize(
            BucketKey::new(TeamScope::All, AreaScope::Area(AreaKey::Swaps)),
            (0..5).collect(),
            &conversations,
            &StopWords::default(),
            10,
        );
        let doc = render_insights(&summary, &conversations, "period", 2);

        assert!(doc.contains("1. swap problem number 0"));
        assert!(doc.contains("2. swap problem number 1"));
        assert!(!doc.contains("swap problem number 2"));
    }

    #[test]
    fn empty_bucket_renders_no_data_document() {
        let summary = summarize(
            BucketKey::new(TeamScope::All, AreaScope::Area(AreaKey::Snaps)),
            Vec::new(),
            &[],
            &StopWords::default(),
            10,
        );
        let doc = render_insights(&summary, &[], "period", 5);

        assert!(doc.contains("Total Conversations: 0"));
        assert!(doc.contains("No conversations found"));
        assert!(!doc.contains("Most Frequent Issue"));
    }
}
