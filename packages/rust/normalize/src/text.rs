//! Text cleanup passes for conversation bodies.
//!
//! Message bodies arrive as HTML fragments. Cleanup is a small pass
//! pipeline over `&str -> String`: strip tags, drop zero-width characters,
//! collapse whitespace. Entities are left as-is.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Characters that render as nothing but break equality and tokenization.
const ZERO_WIDTH: [char; 4] = ['\u{200b}', '\u{200c}', '\u{200d}', '\u{feff}'];

/// Remove markup tags, leaving inner text.
pub fn strip_markup(input: &str) -> String {
    TAG_RE.replace_all(input, " ").into_owned()
}

/// Drop zero-width characters.
pub fn drop_zero_width(input: &str) -> String {
    input.chars().filter(|c| !ZERO_WIDTH.contains(c)).collect()
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(input: &str) -> String {
    WHITESPACE_RE.replace_all(input, " ").trim().to_string()
}

/// Full cleanup pipeline for a message body fragment.
pub fn clean_fragment(input: &str) -> String {
    let stripped = strip_markup(input);
    let visible = drop_zero_width(&stripped);
    collapse_whitespace(&visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_simple_tags() {
        assert_eq!(clean_fragment("<p>hello world</p>"), "hello world");
        assert_eq!(
            clean_fragment("<div class=\"x\"><b>bold</b> and plain</div>"),
            "bold and plain"
        );
    }

    #[test]
    fn tags_become_word_boundaries() {
        assert_eq!(clean_fragment("<p>one</p><p>two</p>"), "one two");
    }

    #[test]
    fn leaves_entities_alone() {
        assert_eq!(clean_fragment("<p>fish &amp; chips</p>"), "fish &amp; chips");
    }

    #[test]
    fn removes_zero_width_characters() {
        assert_eq!(clean_fragment("swap\u{200b} failed\u{feff}"), "swap failed");
    }

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(clean_fragment("  a \n\n  b\t c  "), "a b c");
    }

    #[test]
    fn empty_and_tag_only_input() {
        assert_eq!(clean_fragment(""), "");
        assert_eq!(clean_fragment("<br/><img src=\"x.png\"/>"), "");
    }

    #[test]
    fn unclosed_angle_bracket_is_not_a_tag() {
        // A lone `<` with no closing `>` stays put.
        assert_eq!(clean_fragment("5 < 10"), "5 < 10");
    }
}
