//! Keyword frequency extraction over bucket summaries.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::stopwords::StopWords;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("valid regex"));

/// One keyword with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordRow {
    pub word: String,
    pub count: usize,
}

/// Lowercased alphanumeric tokens of `text`, stop words and single
/// characters removed.
pub fn tokenize(text: &str, stop: &StopWords) -> Vec<String> {
    let lowered = text.to_ascii_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| t.len() > 1 && !stop.contains(t))
        .collect()
}

/// Top `limit` keywords across `texts` in fetch order.
///
/// Sorted by descending count; equal counts break by first occurrence
/// across the concatenated text stream, so output is stable for a given
/// input order.
pub fn top_keywords<'a, I>(texts: I, stop: &StopWords, limit: usize) -> Vec<KeywordRow>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut position = 0usize;

    for text in texts {
        for token in tokenize(text, stop) {
            *counts.entry(token.clone()).or_insert(0) += 1;
            first_seen.entry(token).or_insert(position);
            position += 1;
        }
    }

    let mut rows: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, count)| {
            let seen = first_seen[&word];
            (word, count, seen)
        })
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    rows.truncate(limit);

    rows.into_iter()
        .map(|(word, count, _)| KeywordRow { word, count })
        .collect()
}
