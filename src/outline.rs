//! Outline data model: the hierarchical section tree a guide is generated from.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One section of a guide outline.
///
/// `level` is informational (1 = section, 2 = subsection, 3 = sub-subsection) and is
/// not checked against the parent's level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub id: String,
    pub title: String,
    pub level: u8,
    #[serde(default)]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            level,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<OutlineNode>) -> Self {
        self.children = children;
        self
    }
}

/// Request for a freshly generated outline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutlineRequest {
    pub location: String,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub budget: Option<String>,
}

/// Size and depth summary of an outline forest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForestShape {
    pub node_count: usize,
    /// Depth of the deepest node; roots are at depth 1. Zero for an empty forest.
    pub max_depth: usize,
    /// Ids seen more than once, in first-repeat order.
    pub duplicate_ids: Vec<String>,
}

/// Measures a forest without recursion.
pub fn measure_forest(roots: &[OutlineNode]) -> ForestShape {
    let mut shape = ForestShape::default();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut stack: Vec<(&OutlineNode, usize)> = roots.iter().rev().map(|n| (n, 1)).collect();

    while let Some((node, depth)) = stack.pop() {
        shape.node_count += 1;
        shape.max_depth = shape.max_depth.max(depth);
        if !seen.insert(node.id.as_str()) && !shape.duplicate_ids.contains(&node.id) {
            shape.duplicate_ids.push(node.id.clone());
        }
        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }
    shape
}

/// Finds a node by id anywhere in the forest, in pre-order.
pub fn find_node<'a>(roots: &'a [OutlineNode], id: &str) -> Option<&'a OutlineNode> {
    let mut stack: Vec<&OutlineNode> = roots.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        stack.extend(node.children.iter().rev());
    }
    None
}
