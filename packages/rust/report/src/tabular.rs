//! Per-conversation CSV export.
//!
//! Fixed lead columns, then the union of custom-attribute keys observed in
//! the bucket. Column order is first-observed across fetch order, so the
//! same bucket always renders the same header. Missing values are blank.

use chrono::{DateTime, Utc};

use shiftscope_shared::{Conversation, Result, ShiftscopeError};

/// Lead columns present in every export.
const LEAD_COLUMNS: [&str; 7] = [
    "conversation_id",
    "created_at",
    "updated_at",
    "closed_at",
    "state",
    "summary",
    "transcript",
];

/// Union of attribute keys across the bucket, first-observed order.
pub fn gather_attribute_columns(members: &[usize], conversations: &[Conversation]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for &index in members {
        for key in conversations[index].attributes.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn format_time(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Render a bucket's conversations to CSV bytes. An empty bucket renders
/// just the lead-column header.
pub fn render_conversations_csv(
    members: &[usize],
    conversations: &[Conversation],
) -> Result<Vec<u8>> {
    let attribute_columns = gather_attribute_columns(members, conversations);

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = LEAD_COLUMNS.to_vec();
    header.extend(attribute_columns.iter().map(String::as_str));
    writer
        .write_record(&header)
        .map_err(|e| ShiftscopeError::render(format!("csv header: {e}")))?;

    for &index in members {
        let conv = &conversations[index];
        let mut row: Vec<String> = vec![
            conv.id.clone(),
            format_time(conv.created_at),
            format_time(conv.updated_at),
            format_time(conv.closed_at),
            conv.state.clone().unwrap_or_default(),
            conv.summary.clone().unwrap_or_default(),
            conv.transcript_text(),
        ];
        for column in &attribute_columns {
            row.push(
                conv.attributes
                    .get(column)
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
        }
        writer
            .write_record(&row)
            .map_err(|e| ShiftscopeError::render(format!("csv row {}: {e}", conv.id)))?;
    }

    writer
        .into_inner()
        .map_err(|e| ShiftscopeError::render(format!("csv flush: {e}")))
}
