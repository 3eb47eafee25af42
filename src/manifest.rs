//! Per-request accumulators: the node → download manifest and the combined HTML view.

use quick_xml::escape::escape;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Class list on every node container; `scroll-mt-4` keeps scroll targets clear of
/// a sticky header.
pub const NODE_CONTAINER_CLASS: &str = "mb-8 scroll-mt-4";

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub node_id: String,
    pub locator: String,
}

/// Node id → download locator, kept in insertion order.
///
/// Serialises as a JSON object whose keys follow traversal order. Each node id
/// appears once: recording an id again replaces its locator, keeping its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `locator` for `node_id`, returning the locator it replaced, if any.
    pub fn insert(
        &mut self,
        node_id: impl Into<String>,
        locator: impl Into<String>,
    ) -> Option<String> {
        let node_id = node_id.into();
        let locator = locator.into();
        match self.entries.iter_mut().find(|e| e.node_id == node_id) {
            Some(existing) => Some(std::mem::replace(&mut existing.locator, locator)),
            None => {
                self.entries.push(ManifestEntry { node_id, locator });
                None
            }
        }
    }

    pub fn get(&self, node_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.node_id == node_id)
            .map(|e| e.locator.as_str())
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.node_id, &entry.locator)?;
        }
        map.end()
    }
}

/// Joins a download prefix (e.g. `/outputs`) and a file name into a locator.
pub fn download_locator(prefix: &str, file_name: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), file_name)
}

/// Append-only HTML buffer; each node's content sits in a `<div id="node-<id>">`
/// so the client can scroll to it.
#[derive(Debug, Clone, Default)]
pub struct HtmlFragment {
    buffer: String,
    nodes: usize,
}

impl HtmlFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_node(&mut self, node_id: &str, content: &str) {
        self.buffer.push_str(&node_container(node_id, content));
        self.nodes += 1;
    }

    pub fn node_count(&self) -> usize {
        self.nodes
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

/// Wraps one node's markup in its scroll-target container.
pub fn node_container(node_id: &str, content: &str) -> String {
    format!(
        "<div id=\"node-{}\" class=\"{NODE_CONTAINER_CLASS}\">\n{content}\n</div>\n",
        escape(node_id)
    )
}
