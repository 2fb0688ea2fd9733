//! Span-level passes: escaping, inline code, emphasis and links.

use std::sync::LazyLock;

use regex::Regex;

use super::slots::CodeSlots;

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid inline code regex"));
static BOLD_STARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));
static BOLD_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__(.+?)__").expect("valid bold regex"));
static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("valid italic regex"));
static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(.+?)_").expect("valid italic regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));

/// Pass 1. Must run first: every tag emitted later is produced after this,
/// so only the model's own angle brackets get escaped.
pub(super) fn escape(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Pass 3. Runs after fenced blocks are stashed, so triple backticks are gone.
pub(super) fn inline_code(text: &str, code: &mut CodeSlots) -> String {
    INLINE_CODE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            code.stash(format!("<code>{}</code>", &caps[1]))
        })
        .into_owned()
}

/// Pass 6. `**x**` and `__x__`.
pub(super) fn bold(text: &str) -> String {
    map_emphasis_lines(text, |span| {
        let span = BOLD_STARS.replace_all(span, "<strong>${1}</strong>");
        BOLD_UNDERSCORES
            .replace_all(&span, "<strong>${1}</strong>")
            .into_owned()
    })
}

/// Pass 7. `*x*` and `_x_`. Bold markers were consumed by pass 6, so a
/// leftover single marker really is italic.
pub(super) fn italic(text: &str) -> String {
    map_emphasis_lines(text, |span| {
        let span = ITALIC_STAR.replace_all(span, "<em>${1}</em>");
        ITALIC_UNDERSCORE
            .replace_all(&span, "<em>${1}</em>")
            .into_owned()
    })
}

/// Pass 9. Targets are copied verbatim; no scheme filtering.
pub(super) fn links(text: &str) -> String {
    LINK.replace_all(
        text,
        r#"<a href="${2}" target="_blank" rel="noopener noreferrer">${1}</a>"#,
    )
    .into_owned()
}

/// Apply an emphasis rewrite line by line.
///
/// A `***` rule line is left for the rules pass, and a leading `* ` bullet
/// marker is kept out of the rewrite so it cannot pair with a later `*`.
fn map_emphasis_lines(text: &str, rewrite: impl Fn(&str) -> String) -> String {
    text.split('\n')
        .map(|line| {
            if line == "***" {
                return line.to_string();
            }
            match line.strip_prefix("* ") {
                Some(rest) => format!("* {}", rewrite(rest)),
                None => rewrite(line),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
