//! Plain-text recovery for speech synthesis.
//!
//! Synthesis voices read markup and entities aloud, so rendered HTML is
//! flattened back to the words a reader would see before it is sent out.

use std::sync::LazyLock;

use regex::Regex;

/// Upper bound the synthesis endpoint accepts, in characters.
pub const MAX_SYNTHESIS_CHARS: usize = 10_000;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Flatten an HTML fragment into the text payload sent for synthesis.
///
/// Tags become spaces, whitespace runs collapse to one space, the three
/// entities the renderer can produce are decoded, and the result is trimmed.
/// `&amp;` is decoded last so `&amp;lt;` yields `&lt;`, not `<`.
#[must_use]
pub fn speech_text(html: &str) -> String {
    let untagged = TAG.replace_all(html, " ");
    let collapsed = WHITESPACE.replace_all(&untagged, " ");
    collapsed
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Cap `text` at `max_chars` characters without splitting a code point.
#[must_use]
pub fn truncate_for_synthesis(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_restores_entities() {
        assert_eq!(speech_text("<strong>Hi</strong> &amp; bye"), "Hi & bye");
    }

    #[test]
    fn collapses_whitespace_left_by_tags() {
        assert_eq!(
            speech_text("<p>one<br>two</p><p>\n  three</p>"),
            "one two three"
        );
    }

    #[test]
    fn decodes_escaped_angle_brackets() {
        assert_eq!(speech_text("<p>a &lt;b&gt; c</p>"), "a <b> c");
    }

    #[test]
    fn double_escaped_ampersand_decodes_once() {
        assert_eq!(speech_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn empty_and_tag_only_inputs() {
        assert_eq!(speech_text(""), "");
        assert_eq!(speech_text("<hr><br>"), "");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_for_synthesis("héllo", 2), "hé");
        assert_eq!(truncate_for_synthesis("short", 100), "short");
        assert_eq!(truncate_for_synthesis("abc", 0), "");
    }
}
