//! Line- and block-level passes.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::slots::CodeSlots;

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(\w+)?\n((?s:.*?))```").expect("valid fenced code regex")
});
static TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\|.+\|)\n(\|[-:\s|]+\|)\n((?:\|.+\|\n?)+)").expect("valid table regex")
});
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,3}) (.*)$").expect("valid heading regex"));
static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\. (.+)$").expect("valid ordered item regex"));
static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:---|\*\*\*)$").expect("valid rule regex"));
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^&gt; (.+)$").expect("valid blockquote regex"));
static EMPTY_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>\s*</p>").expect("valid empty paragraph regex"));

/// Pass 2. The body was escaped by pass 1 and is trimmed but otherwise
/// kept as-is; the finished block is stashed so later passes skip it.
pub(super) fn fenced_code(text: &str, code: &mut CodeSlots) -> String {
    FENCED_CODE
        .replace_all(text, |caps: &Captures<'_>| {
            let class = caps
                .get(1)
                .map(|lang| format!(r#" class="language-{}""#, lang.as_str()))
                .unwrap_or_default();
            code.stash(format!("<pre><code{class}>{}</code></pre>", caps[2].trim()))
        })
        .into_owned()
}

/// Pass 4. Header row, separator row of `-:|` and whitespace, then data rows.
pub(super) fn tables(text: &str) -> String {
    TABLE
        .replace_all(text, |caps: &Captures<'_>| {
            let header = row_html(&caps[1], "th");
            let body: String = caps[3]
                .trim()
                .lines()
                .map(|line| row_html(line, "td"))
                .collect();
            // The row group swallows the last row's newline; give it back so a
            // following blank line still splits paragraphs.
            let trailing = if caps[3].ends_with('\n') { "\n" } else { "" };
            format!(
                r#"<table class="markdown-table"><thead>{header}</thead><tbody>{body}</tbody></table>{trailing}"#
            )
        })
        .into_owned()
}

fn row_html(line: &str, cell_tag: &str) -> String {
    let mut row = String::from("<tr>");
    for cell in table_cells(line) {
        let _ = write!(row, "<{cell_tag}>{cell}</{cell_tag}>");
    }
    row.push_str("</tr>");
    row
}

/// Split a `|a|b|` row into trimmed cells, dropping the outer pipe artifacts.
fn table_cells(line: &str) -> Vec<&str> {
    let line = line.trim();
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim).collect()
}

/// Pass 5. `### ` before `## ` before `# `: one match per line, so a
/// deeper heading can never also match a shallower rule.
pub(super) fn headings(text: &str) -> String {
    HEADING
        .replace_all(text, |caps: &Captures<'_>| {
            let level = caps[1].len();
            format!("<h{level}>{}</h{level}>", &caps[2])
        })
        .into_owned()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    const fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    if let Some(rest) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
        return (!rest.is_empty()).then_some((ListKind::Unordered, rest));
    }
    ORDERED_ITEM
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|item| (ListKind::Ordered, item.as_str()))
}

/// Pass 8. `* ` / `- ` lines and `1. ` lines become `<li>`; each maximal run
/// of the same kind is wrapped in one `<ul>` or `<ol>` on a single line.
pub(super) fn lists(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut run: Option<(ListKind, String)> = None;

    for line in text.split('\n') {
        match list_item(line) {
            Some((kind, item)) => match run.as_mut() {
                Some((open, items)) if *open == kind => {
                    let _ = write!(items, "<li>{item}</li>");
                }
                _ => {
                    if let Some(done) = run.replace((kind, format!("<li>{item}</li>"))) {
                        lines.push(close_list(done));
                    }
                }
            },
            None => {
                if let Some(done) = run.take() {
                    lines.push(close_list(done));
                }
                lines.push(line.to_string());
            }
        }
    }
    if let Some(done) = run.take() {
        lines.push(close_list(done));
    }

    lines.join("\n")
}

fn close_list((kind, items): (ListKind, String)) -> String {
    let tag = kind.tag();
    format!("<{tag}>{items}</{tag}>")
}

/// Pass 10. A line that is exactly `---` or `***`.
pub(super) fn rules(text: &str) -> String {
    RULE.replace_all(text, "<hr>").into_owned()
}

/// Pass 11. The `>` was escaped by pass 1, so the marker is `&gt; `.
pub(super) fn blockquotes(text: &str) -> String {
    BLOCKQUOTE
        .replace_all(text, "<blockquote>${1}</blockquote>")
        .into_owned()
}

/// Pass 12. Blank lines split paragraphs, single newlines become `<br>`.
pub(super) fn paragraphs(text: &str) -> String {
    let body = text.replace("\n\n", "</p><p>").replace('\n', "<br>");
    format!("<p>{body}</p>")
}

/// Pass 13. Drop paragraphs that ended up empty or whitespace-only.
pub(super) fn cleanup(text: &str) -> String {
    EMPTY_PARAGRAPH.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_code_with_language() {
        let mut code = CodeSlots::default();
        let out = fenced_code("```js\nconst x=1;\n```", &mut code);
        assert_eq!(
            code.restore(&out),
            r#"<pre><code class="language-js">const x=1;</code></pre>"#
        );
    }

    #[test]
    fn fenced_code_without_language_trims_body() {
        let mut code = CodeSlots::default();
        let out = fenced_code("```\n\n  x = 1  \n\n```", &mut code);
        assert_eq!(code.restore(&out), "<pre><code>x = 1</code></pre>");
    }

    #[test]
    fn unterminated_fence_is_left_alone() {
        let mut code = CodeSlots::default();
        assert_eq!(fenced_code("```rs\nfn main()", &mut code), "```rs\nfn main()");
        assert!(code.is_empty());
    }

    #[test]
    fn table_with_header_and_rows() {
        let out = tables("|A|B|\n|-|-|\n|1|2|\n|3|4|");
        assert_eq!(
            out,
            "<table class=\"markdown-table\"><thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr></tbody></table>"
        );
    }

    #[test]
    fn table_keeps_interior_empty_cells() {
        assert_eq!(table_cells("| a |  | c |"), ["a", "", "c"]);
    }

    #[test]
    fn table_without_separator_is_not_a_table() {
        let text = "|A|B|\n|1|2|";
        assert_eq!(tables(text), text);
    }

    #[test]
    fn heading_levels() {
        assert_eq!(headings("# a\n## b\n### c"), "<h1>a</h1>\n<h2>b</h2>\n<h3>c</h3>");
    }

    #[test]
    fn heading_needs_space_and_at_most_three_marks() {
        assert_eq!(headings("#tag"), "#tag");
        assert_eq!(headings("#### deep"), "#### deep");
    }

    #[test]
    fn unordered_run_wrapped_once() {
        assert_eq!(
            lists("intro\n- a\n* b\nafter"),
            "intro\n<ul><li>a</li><li>b</li></ul>\nafter"
        );
    }

    #[test]
    fn ordered_run_wrapped_in_ol() {
        assert_eq!(
            lists("1. one\n2. two\n- dash"),
            "<ol><li>one</li><li>two</li></ol>\n<ul><li>dash</li></ul>"
        );
    }

    #[test]
    fn bare_marker_is_not_an_item() {
        assert_eq!(lists("- \n-x\n---"), "- \n-x\n---");
    }

    #[test]
    fn rules_need_whole_line() {
        assert_eq!(rules("---\n***\n----\na---"), "<hr>\n<hr>\n----\na---");
    }

    #[test]
    fn blockquote_uses_escaped_marker() {
        assert_eq!(blockquotes("&gt; wise"), "<blockquote>wise</blockquote>");
        assert_eq!(blockquotes("> raw"), "> raw");
    }

    #[test]
    fn paragraphs_and_breaks() {
        assert_eq!(paragraphs("a\nb\n\nc"), "<p>a<br>b</p><p>c</p>");
    }

    #[test]
    fn cleanup_removes_blank_paragraphs() {
        assert_eq!(cleanup("<p></p><p>x</p><p> \t</p>"), "<p>x</p>");
    }
}
