//! Artifact rendering for shiftscope.
//!
//! Turns bucket summaries into in-memory [`Artifact`]s: CSV conversation
//! exports, insight documents, and end-of-shift roll-ups. Nothing here
//! touches the filesystem; delivery belongs to the caller.

pub mod insights;
pub mod naming;
pub mod shift;
pub mod tabular;

use tracing::debug;

use shiftscope_aggregate::BucketSummary;
use shiftscope_shared::{Artifact, ArtifactKind, Conversation, Result, TeamScope};

pub use crate::insights::render_insights;
pub use crate::naming::{
    conversations_name, end_of_shift_name, insights_name, single_conversation_label,
};
pub use crate::shift::render_end_of_shift;
pub use crate::tabular::render_conversations_csv;

/// Render the CSV export and insight document for one bucket.
pub fn render_bucket_artifacts(
    summary: &BucketSummary,
    conversations: &[Conversation],
    label: &str,
    period: &str,
    example_limit: usize,
) -> Result<Vec<Artifact>> {
    let csv_bytes = render_conversations_csv(&summary.members, conversations)?;
    let insight_doc = render_insights(summary, conversations, period, example_limit);

    debug!(bucket = %summary.key, count = summary.count(), "rendered bucket artifacts");

    Ok(vec![
        Artifact {
            name: conversations_name(&summary.key, label),
            kind: ArtifactKind::Conversations,
            bytes: csv_bytes,
        },
        Artifact {
            name: insights_name(&summary.key, label),
            kind: ArtifactKind::Insights,
            bytes: insight_doc.into_bytes(),
        },
    ])
}

/// Render the end-of-shift roll-up for one team scope.
pub fn render_shift_artifact(
    team: &TeamScope,
    area_summaries: &[&BucketSummary],
    total: &BucketSummary,
    label: &str,
    period: &str,
) -> Artifact {
    let doc = render_end_of_shift(team, area_summaries, total, period);
    Artifact {
        name: end_of_shift_name(team, label),
        kind: ArtifactKind::EndOfShift,
        bytes: doc.into_bytes(),
    }
}
