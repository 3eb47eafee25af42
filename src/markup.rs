//! Inline markup parsing: one line of generated HTML-ish markup into styled text runs.
//!
//! Recognised inline tags:
//! - `<strong>` / `<b>` and their closers toggle bold,
//! - `<i>` / `</i>` toggle italic,
//! - any opening tag whose attributes mention a background (e.g.
//!   `<span style="background-color: #fef08a">`) or a `<mark>` turns highlighting on,
//!   `</span>` / `</mark>` turn it off again when it is on.
//!
//! Every other tag is dropped. Formatting state is modal rather than nested: each
//! attribute is a single on/off flag, so a stray closer just clears a flag that may
//! already be clear. Mismatched or overlapping tags therefore yield best-effort
//! formatting, never an error. State never carries over between calls.

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern compiles"));

/// Formatting flags active for a run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatState {
    pub bold: bool,
    pub italic: bool,
    pub highlighted: bool,
}

impl FormatState {
    pub const PLAIN: FormatState = FormatState {
        bold: false,
        italic: false,
        highlighted: false,
    };

    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }
}

/// A contiguous run of visible text and the formatting it was encountered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSpan {
    pub text: String,
    pub format: FormatState,
}

impl MarkupSpan {
    pub fn new(text: impl Into<String>, format: FormatState) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, FormatState::PLAIN)
    }
}

/// Splits `line` into styled runs. Concatenating the runs' text yields the line with
/// all tags removed.
pub fn parse_line(line: &str) -> Vec<MarkupSpan> {
    let mut spans = Vec::new();
    let mut state = FormatState::default();
    let mut cursor = 0;

    for tag in TAG.find_iter(line) {
        push_text(&mut spans, &line[cursor..tag.start()], state);
        apply_tag(&mut state, tag.as_str());
        cursor = tag.end();
    }
    push_text(&mut spans, &line[cursor..], state);
    spans
}

/// Removes every `<...>` tag, keeping the text in between untouched.
pub fn strip_tags(markup: &str) -> String {
    TAG.replace_all(markup, "").into_owned()
}

/// Concatenated text of a sequence of runs.
pub fn visible_text(spans: &[MarkupSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

fn push_text(spans: &mut Vec<MarkupSpan>, text: &str, state: FormatState) {
    if !text.is_empty() {
        spans.push(MarkupSpan::new(text, state));
    }
}

fn apply_tag(state: &mut FormatState, token: &str) {
    let inner = token[1..token.len() - 1].trim();
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, inner),
    };
    let name_end = inner
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();
    let attributes = &inner[name_end..];

    match (closing, name.as_str()) {
        (false, "strong" | "b") => state.bold = true,
        (true, "strong" | "b") => state.bold = false,
        (false, "i") => state.italic = true,
        (true, "i") => state.italic = false,
        (false, "mark") => state.highlighted = true,
        (true, "span" | "mark") if state.highlighted => state.highlighted = false,
        (false, _) if attributes.to_ascii_lowercase().contains("background") => {
            state.highlighted = true
        }
        _ => {}
    }
}
