//! Assistant message renderer: a small, fixed subset of markdown to HTML.
//!
//! The renderer is a pure function over untrusted model output. It is built
//! as an ordered list of passes; each pass is a plain `&str -> String`
//! transform that relies on what the earlier passes already did:
//!
//! ```text
//!   escape → fenced code → inline code → tables → headings → bold → italic
//!          → lists → links → rules → blockquotes → paragraphs → cleanup
//! ```
//!
//! Code produced by the two code passes is moved into [`CodeSlots`] and only
//! put back after cleanup, so nothing downstream rewrites code content.
//!
//! No input is rejected. Unbalanced or malformed markup is left as literal
//! text.

mod block;
mod inline;
mod slots;

pub use slots::CodeSlots;

/// A named step of the rendering pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Escape,
    FencedCode,
    InlineCode,
    Tables,
    Headings,
    Bold,
    Italic,
    Lists,
    Links,
    Rules,
    Blockquotes,
    Paragraphs,
    Cleanup,
}

impl Pass {
    /// Every pass, in the order [`render`] applies them.
    pub const ALL: [Self; 13] = [
        Self::Escape,
        Self::FencedCode,
        Self::InlineCode,
        Self::Tables,
        Self::Headings,
        Self::Bold,
        Self::Italic,
        Self::Lists,
        Self::Links,
        Self::Rules,
        Self::Blockquotes,
        Self::Paragraphs,
        Self::Cleanup,
    ];

    /// Apply this single pass to `text`.
    ///
    /// The code passes stash their output in `code`; the others never touch it.
    pub fn apply(self, text: &str, code: &mut CodeSlots) -> String {
        match self {
            Self::Escape => inline::escape(text),
            Self::FencedCode => block::fenced_code(text, code),
            Self::InlineCode => inline::inline_code(text, code),
            Self::Tables => block::tables(text),
            Self::Headings => block::headings(text),
            Self::Bold => inline::bold(text),
            Self::Italic => inline::italic(text),
            Self::Lists => block::lists(text),
            Self::Links => inline::links(text),
            Self::Rules => block::rules(text),
            Self::Blockquotes => block::blockquotes(text),
            Self::Paragraphs => block::paragraphs(text),
            Self::Cleanup => block::cleanup(text),
        }
    }
}

/// Render raw assistant text into an HTML fragment.
///
/// Deterministic and side-effect free; any input (including the empty
/// string) produces some output.
#[must_use]
pub fn render(text: &str) -> String {
    let mut code = CodeSlots::default();
    let body = Pass::ALL
        .iter()
        .fold(text.to_string(), |acc, pass| pass.apply(&acc, &mut code));
    let html = code.restore(&body);

    tracing::trace!(
        input_len = text.len(),
        output_len = html.len(),
        code_spans = code.len(),
        "Rendered message"
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_renders_to_empty_string() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn plain_line_is_wrapped_in_paragraph() {
        assert_eq!(render("hello world"), "<p>hello world</p>");
    }

    #[test]
    fn passes_are_listed_in_pipeline_order() {
        assert_eq!(Pass::ALL.first(), Some(&Pass::Escape));
        assert_eq!(Pass::ALL.last(), Some(&Pass::Cleanup));
    }

    #[test]
    fn applying_passes_by_hand_matches_render() {
        let input = "# Title\n\nSome **bold** and `code`.";
        let mut code = CodeSlots::default();
        let mut text = input.to_string();
        for pass in Pass::ALL {
            text = pass.apply(&text, &mut code);
        }
        assert_eq!(code.restore(&text), render(input));
    }

    #[test]
    fn mixed_document() {
        let input = "## Plan\n\n- first *step*\n- second step\n\nSee [docs](https://x.dev).";
        assert_eq!(
            render(input),
            "<p><h2>Plan</h2></p><p><ul><li>first <em>step</em></li><li>second step</li></ul></p>\
             <p>See <a href=\"https://x.dev\" target=\"_blank\" rel=\"noopener noreferrer\">docs</a>.</p>"
        );
    }

    #[test]
    fn code_is_not_reformatted_by_later_passes() {
        let html = render("use `a_b_c` and `**kw**`");
        assert_eq!(html, "<p>use <code>a_b_c</code> and <code>**kw**</code></p>");
    }

    #[test]
    fn fenced_block_keeps_its_newlines() {
        let html = render("```\nline one\n- not a list\n```");
        assert_eq!(html, "<p><pre><code>line one\n- not a list</code></pre></p>");
    }
}
