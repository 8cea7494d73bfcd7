//! End-of-shift roll-up rendering.
//!
//! One document per team scope: total volume, the top issue per area, and
//! the overall top issues from the team's ALL-area bucket.

use shiftscope_aggregate::BucketSummary;
use shiftscope_shared::{AreaScope, TeamScope};

/// How many overall issues the roll-up lists.
const TOP_ISSUE_LIMIT: usize = 10;

/// Render the end-of-shift roll-up for one team scope.
///
/// `area_summaries` are the team's per-area buckets in render order;
/// `total` is the team's ALL-area bucket.
pub fn render_end_of_shift(
    team: &TeamScope,
    area_summaries: &[&BucketSummary],
    total: &BucketSummary,
    period: &str,
) -> String {
    let mut doc = String::new();

    doc.push_str(&format!("End of Shift Report: {team}\n"));
    doc.push_str(&format!("Period: {period}\n"));
    doc.push_str(&format!("Total Conversations: {}\n\n", total.count()));

    doc.push_str("Per-Area Top Issues:\n");
    for summary in area_summaries {
        let area = match summary.key.area {
            AreaScope::Area(a) => a.label(),
            AreaScope::All => continue,
        };
        match summary.top_issue() {
            Some(top) => doc.push_str(&format!(
                "- {area}: {} ({} of {})\n",
                top.label,
                top.count,
                summary.count()
            )),
            None => doc.push_str(&format!("- {area}: no conversations\n")),
        }
    }
    doc.push('\n');

    if !total.issues.is_empty() {
        doc.push_str("Top Issues Overall:\n");
        for row in total.issues.iter().take(TOP_ISSUE_LIMIT) {
            doc.push_str(&format!("- {}: {} ({:.2}%)\n", row.label, row.count, row.percent));
        }
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use shiftscope_aggregate::{StopWords, summarize};
    use shiftscope_shared::{AreaKey, AttrValue, BucketKey, Conversation, TeamKey};

    fn conversation(index: usize, attr: (&str, &str)) -> Conversation {
        Conversation {
            id: format!("c{index}"),
            fetch_index: index,
            created_at: None,
            updated_at: None,
            closed_at: None,
            state: None,
            summary: None,
            transcript: Vec::new(),
            attributes: BTreeMap::from([(
                attr.0.to_string(),
                AttrValue::Text(attr.1.to_string()),
            )]),
            team_assignee_id: None,
        }
    }

    #[test]
    fn rollup_lists_per_area_and_overall_issues() {
        let team = TeamScope::Team(TeamKey::new("Tier 1"));
        let conversations = vec![
            conversation(0, ("Swaps issue", "Failed Transaction")),
            conversation(1, ("Swaps issue", "Failed Transaction")),
            conversation(2, ("Wallet issue", "Sync problem")),
        ];
        let stop = StopWords::default();

        let swaps = summarize(
            BucketKey::new(team.clone(), AreaScope::Area(AreaKey::Swaps)),
            vec![0, 1],
            &conversations,
            &stop,
            10,
        );
        let wallet = summarize(
            BucketKey::new(team.clone(), AreaScope::Area(AreaKey::Wallet)),
            vec![2],
            &conversations,
            &stop,
            10,
        );
        let snaps = summarize(
            BucketKey::new(team.clone(), AreaScope::Area(AreaKey::Snaps)),
            Vec::new(),
            &conversations,
            &stop,
            10,
        );
        let total = summarize(
            BucketKey::new(team.clone(), AreaScope::All),
            vec![0, 1, 2],
            &conversations,
            &stop,
            10,
        );

        let doc = render_end_of_shift(&team, &[&swaps, &wallet, &snaps], &total, "period");

        assert!(doc.contains("End of Shift Report: Tier 1"));
        assert!(doc.contains("Total Conversations: 3"));
        assert!(doc.contains("- Swaps: Failed Transaction (2 of 2)"));
        assert!(doc.contains("- Wallet: Sync problem (1 of 1)"));
        assert!(doc.contains("- Snaps: no conversations"));
        assert!(doc.contains("Top Issues Overall:"));
        assert!(doc.contains("- Failed Transaction: 2"));
    }
}
