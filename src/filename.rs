//! Collision-free, filesystem-safe document names within one request.

use std::collections::HashSet;
use tracing::debug;

pub const DOCX_EXTENSION: &str = ".docx";
/// Used when a label sanitises to nothing (e.g. a title written entirely in CJK).
pub const PLACEHOLDER_LABEL: &str = "article";
/// Used when a scope prefix sanitises to nothing.
pub const PLACEHOLDER_SCOPE: &str = "guide";
/// Longest sanitised label. Scope, label, suffix and extension together stay well
/// under the common 255-byte file name limit.
pub const MAX_LABEL_BYTES: usize = 100;

/// Keeps ASCII letters and digits, spaces, `.`, `_` and `-`; everything else is
/// dropped. The result is cut to [`MAX_LABEL_BYTES`] and trimmed of surrounding
/// whitespace.
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-'))
        .take(MAX_LABEL_BYTES)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Names already handed out during one traversal.
///
/// Never shared between requests: build a fresh registry per traversal.
#[derive(Debug, Clone)]
pub struct FilenameRegistry {
    extension: String,
    used: HashSet<String>,
}

impl FilenameRegistry {
    pub fn new() -> Self {
        Self::with_extension(DOCX_EXTENSION)
    }

    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            used: HashSet::new(),
        }
    }

    /// Returns `<scope>_<label><ext>`, or `<scope>_<label>_<n><ext>` with the smallest
    /// `n >= 1` not yet taken, and records the result.
    pub fn allocate(&mut self, label: &str, scope_prefix: &str) -> String {
        let label = non_empty_or(sanitize_label(label), PLACEHOLDER_LABEL);
        let scope = non_empty_or(sanitize_label(scope_prefix), PLACEHOLDER_SCOPE);
        let base = format!("{scope}_{label}");

        let mut candidate = format!("{base}{}", self.extension);
        let mut counter = 1;
        while self.used.contains(&candidate) {
            candidate = format!("{base}_{counter}{}", self.extension);
            counter += 1;
        }

        debug!(filename = %candidate, collisions = counter - 1, "Allocated filename");
        self.used.insert(candidate.clone());
        candidate
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.used.contains(filename)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

impl Default for FilenameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
