//! Placeholder storage for rendered code.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static SLOT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--code:(\d+)-->").expect("valid slot marker regex"));

/// Finished `<pre>`/`<code>` HTML held out of the later passes.
///
/// Markers start with `<`, which the escape pass has already removed from the
/// input, so a marker in the text can only have come from [`CodeSlots::stash`].
#[derive(Debug, Default)]
pub struct CodeSlots {
    slots: Vec<String>,
}

impl CodeSlots {
    /// Store `html` and return the marker to put in its place.
    pub fn stash(&mut self, html: String) -> String {
        let marker = format!("<!--code:{}-->", self.slots.len());
        self.slots.push(html);
        marker
    }

    /// Replace every marker in `text` with the HTML it stands for.
    #[must_use]
    pub fn restore(&self, text: &str) -> String {
        if self.slots.is_empty() {
            return text.to_string();
        }
        SLOT_MARKER
            .replace_all(text, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| self.slots.get(idx))
                    .map_or_else(|| caps[0].to_string(), String::clone)
            })
            .into_owned()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stash_then_restore() {
        let mut slots = CodeSlots::default();
        let a = slots.stash("<code>a</code>".into());
        let b = slots.stash("<code>b</code>".into());
        let text = format!("x {a} y {b}");
        assert_eq!(slots.restore(&text), "x <code>a</code> y <code>b</code>");
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn unknown_marker_is_left_alone() {
        let mut slots = CodeSlots::default();
        slots.stash("<code>a</code>".into());
        assert_eq!(slots.restore("<!--code:7-->"), "<!--code:7-->");
    }
}
