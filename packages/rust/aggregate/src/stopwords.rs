//! Stop words for keyword extraction.

use std::collections::HashSet;

/// Built-in stop words: English function words plus domain terms that
/// dominate every summary without carrying signal.
const BUILTIN: &[&str] = &[
    // function words
    "the", "and", "of", "to", "a", "in", "is", "it", "that", "for", "on", "with", "as", "was",
    "at", "by", "an", "be", "this", "are", "or", "from", "has", "had", "have", "not", "but",
    "they", "their", "them", "there", "then", "than", "will", "would", "can", "could", "should",
    "about", "into", "out", "up", "down", "so", "if", "no", "yes", "we", "i", "you", "he", "she",
    "his", "her", "my", "our", "your", "its", "were", "been", "being", "do", "does", "did",
    "also", "after", "before", "when", "while", "which", "who", "what", "how", "all", "any",
    "some", "more", "other", "such", "only", "over", "under", "again", "further", "once",
    // domain noise
    "meta", "mask", "metamask", "customer", "user", "agent", "summary", "question", "issue",
    "available", "amp", "nbsp",
];

/// Immutable stop-word set, built once per run from the built-in list plus
/// any configured extras.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn new(extra: &[String]) -> Self {
        let mut words: HashSet<String> = BUILTIN.iter().map(|w| w.to_string()).collect();
        words.extend(extra.iter().map(|w| w.trim().to_ascii_lowercase()));
        Self { words }
    }

    /// Check a lowercased token.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_words_filtered() {
        let stop = StopWords::default();
        assert!(stop.contains("the"));
        assert!(stop.contains("metamask"));
        assert!(stop.contains("amp"));
        assert!(!stop.contains("swap"));
    }

    #[test]
    fn extras_are_normalized() {
        let stop = StopWords::new(&["  Wallet ".to_string()]);
        assert!(stop.contains("wallet"));
    }
}
