//! Lexicon-based sentiment scoring.
//!
//! Each scored word carries a polarity in [-1, 1]; a text's score is the
//! mean polarity of its scored words, and a bucket's sentiment is the mean
//! over texts that scored at all. Texts with no scored words contribute
//! nothing rather than zero.

use std::sync::LazyLock;

use regex::Regex;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z']+").expect("valid regex"));

/// Polarity lexicon. Deliberately small and skewed toward support-ticket
/// vocabulary.
const LEXICON: &[(&str, f64)] = &[
    ("great", 0.8),
    ("good", 0.7),
    ("excellent", 1.0),
    ("amazing", 0.9),
    ("helpful", 0.7),
    ("thanks", 0.5),
    ("thank", 0.5),
    ("resolved", 0.6),
    ("fixed", 0.6),
    ("works", 0.5),
    ("working", 0.4),
    ("happy", 0.8),
    ("perfect", 0.9),
    ("appreciate", 0.6),
    ("easy", 0.4),
    ("fast", 0.4),
    ("smooth", 0.5),
    ("love", 0.8),
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -0.9),
    ("horrible", -0.9),
    ("broken", -0.6),
    ("failed", -0.5),
    ("failing", -0.5),
    ("error", -0.4),
    ("stuck", -0.5),
    ("lost", -0.7),
    ("missing", -0.5),
    ("scam", -0.8),
    ("scammed", -0.9),
    ("fraud", -0.8),
    ("stolen", -0.9),
    ("hacked", -0.8),
    ("compromised", -0.7),
    ("angry", -0.8),
    ("frustrated", -0.7),
    ("frustrating", -0.7),
    ("upset", -0.6),
    ("slow", -0.4),
    ("unable", -0.4),
    ("cannot", -0.3),
    ("can't", -0.3),
    ("never", -0.3),
    ("worst", -1.0),
    ("useless", -0.8),
    ("unresponsive", -0.6),
    ("disappointed", -0.7),
    ("refund", -0.3),
    ("complaint", -0.5),
];

fn polarity(word: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, p)| *p)
}

/// Mean polarity of the scored words in `text`; `None` if nothing scored.
pub fn score(text: &str) -> Option<f64> {
    let lowered = text.to_ascii_lowercase();
    let scores: Vec<f64> = WORD_RE
        .find_iter(&lowered)
        .filter_map(|m| polarity(m.as_str()))
        .collect();
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

/// Mean over texts that produced a score; `None` when none did.
pub fn mean_sentiment<'a, I>(texts: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a str>,
{
    let scores: Vec<f64> = texts.into_iter().filter_map(score).collect();
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_and_negative_texts() {
        assert!(score("great support, very helpful").unwrap() > 0.0);
        assert!(score("swap failed and funds are stuck").unwrap() < 0.0);
    }

    #[test]
    fn unscorable_text_is_none() {
        assert_eq!(score("the transaction went through yesterday"), None);
        assert_eq!(score(""), None);
    }

    #[test]
    fn mean_skips_unscorable_texts() {
        let texts = ["great help", "neutral words only", "terrible experience"];
        let mean = mean_sentiment(texts).expect("score");
        // (0.8 + -1.0) / 2
        assert!((mean - (-0.1)).abs() < 1e-9);
    }

    #[test]
    fn all_unscorable_is_none() {
        assert_eq!(mean_sentiment(["plain words", "more words"]), None);
    }
}
