//! Block-level conversion of generated markup into a [`RenderedDocument`].
//!
//! Each non-blank line becomes at most one block:
//! - `<h2>` lines and lines starting with `# ` become section headings,
//! - `<li>` lines and lines starting with `- ` become bulleted paragraphs,
//! - anything else with visible text becomes a plain paragraph.
//!
//! The document title is always the first block.

use crate::markup::{self, MarkupSpan};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h2[\s>]").expect("heading pattern compiles"));
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li[\s>]").expect("list pattern compiles"));

/// Style level of the synthetic document title.
pub const TITLE_LEVEL: u8 = 0;
/// Style level of headings found in the body.
pub const SECTION_LEVEL: u8 = 1;
/// Line spacing applied to every paragraph and bullet.
pub const LINE_SPACING: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    None,
    Bullet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { text: String, level: u8 },
    Paragraph {
        spans: Vec<MarkupSpan>,
        list: ListMarker,
    },
}

impl Block {
    pub fn is_title(&self) -> bool {
        matches!(self, Block::Heading { level, .. } if *level == TITLE_LEVEL)
    }
}

/// An ordered list of blocks, title first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub blocks: Vec<Block>,
}

impl RenderedDocument {
    pub fn title(&self) -> Option<&str> {
        match self.blocks.first() {
            Some(Block::Heading { text, level }) if *level == TITLE_LEVEL => Some(text),
            _ => None,
        }
    }

    /// Blocks after the synthetic title.
    pub fn body(&self) -> &[Block] {
        match self.blocks.first() {
            Some(block) if block.is_title() => &self.blocks[1..],
            _ => &self.blocks,
        }
    }
}

/// Builds the document for one node: `title` as the title block, then one block per
/// meaningful line of `markup`.
pub fn render(title: &str, markup: &str) -> RenderedDocument {
    let mut blocks = vec![Block::Heading {
        text: title.to_string(),
        level: TITLE_LEVEL,
    }];
    blocks.extend(markup.split('\n').filter_map(classify_line));
    debug!(title, blocks = blocks.len(), "[RENDER] Rendered document");
    RenderedDocument { blocks }
}

/// Classifies a single line. Blank lines, and lines made only of tags, yield `None`.
pub fn classify_line(raw: &str) -> Option<Block> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    if HEADING_MARKER.is_match(line) || line.starts_with("# ") {
        let stripped = markup::strip_tags(line);
        let text = stripped.trim();
        let text = text.strip_prefix("# ").unwrap_or(text).trim();
        if text.is_empty() {
            return None;
        }
        return Some(Block::Heading {
            text: text.to_string(),
            level: SECTION_LEVEL,
        });
    }

    if LIST_MARKER.is_match(line) || line.starts_with("- ") {
        let item = line.strip_prefix("- ").unwrap_or(line);
        let spans = markup::parse_line(item);
        if markup::visible_text(&spans).trim().is_empty() {
            return None;
        }
        return Some(Block::Paragraph {
            spans,
            list: ListMarker::Bullet,
        });
    }

    if markup::strip_tags(line).trim().is_empty() {
        return None;
    }
    Some(Block::Paragraph {
        spans: markup::parse_line(line),
        list: ListMarker::None,
    })
}
