//! Outline traversal: generates, renders and persists every node of a forest.
//!
//! Nodes are visited in pre-order (a node, then its children in order, then its next
//! sibling), one at a time. For each node the traversal
//!   1. asks the [`ContentGenerator`] for markup,
//!   2. renders it into a document titled with the node's title,
//!   3. allocates a unique file name scoped by the location and persists the document,
//!   4. appends the node's container to the HTML fragment, records its manifest entry
//!      and remembers the written path.
//!
//! # Limits
//! The forest is measured before the first generation call. A forest deeper than
//! `max_depth` or larger than `max_nodes` is rejected with [`GuideError::Structure`].
//! The walk uses an explicit stack, never recursion.
//!
//! # Failures
//! Persistence failures always abort. Generation failures follow the configured
//! [`FailurePolicy`]: `AllOrNothing` aborts and deletes the documents this traversal
//! already wrote; `Partial` records a [`NodeOutcome::Failed`] and moves on.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::config::{FailurePolicy, GuideConfig, TraversalLimits};
use crate::contract::ContentGenerator;
use crate::docx;
use crate::error::{GuideError, Result};
use crate::filename::FilenameRegistry;
use crate::manifest::{download_locator, HtmlFragment, Manifest};
use crate::outline::{measure_forest, OutlineNode};
use crate::render;

/// A document produced for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeArtifact {
    pub node_id: String,
    pub title: String,
    pub file_name: String,
    pub path: PathBuf,
    pub locator: String,
}

/// What happened to one visited node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome {
    Rendered(NodeArtifact),
    Failed {
        node_id: String,
        title: String,
        reason: String,
    },
}

impl NodeOutcome {
    pub fn node_id(&self) -> &str {
        match self {
            NodeOutcome::Rendered(artifact) => &artifact.node_id,
            NodeOutcome::Failed { node_id, .. } => node_id,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, NodeOutcome::Failed { .. })
    }
}

/// Everything a traversal produced, in visiting order.
#[derive(Debug, Clone, Default)]
pub struct Traversal {
    pub html_fragment: String,
    pub manifest: Manifest,
    pub files: Vec<PathBuf>,
    pub outcomes: Vec<NodeOutcome>,
}

impl Traversal {
    pub fn failures(&self) -> impl Iterator<Item = &NodeOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &NodeArtifact> {
        self.outcomes.iter().filter_map(|o| match o {
            NodeOutcome::Rendered(artifact) => Some(artifact),
            NodeOutcome::Failed { .. } => None,
        })
    }
}

/// Rejects forests exceeding `limits`.
pub fn check_limits(roots: &[OutlineNode], limits: &TraversalLimits) -> Result<()> {
    let shape = measure_forest(roots);
    if shape.max_depth > limits.max_depth {
        return Err(GuideError::Structure(format!(
            "outline depth {} exceeds the limit of {}",
            shape.max_depth, limits.max_depth
        )));
    }
    if shape.node_count > limits.max_nodes {
        return Err(GuideError::Structure(format!(
            "outline has {} nodes, more than the limit of {}",
            shape.node_count, limits.max_nodes
        )));
    }
    if !shape.duplicate_ids.is_empty() {
        warn!(duplicates = ?shape.duplicate_ids, "[TRAVERSE] Outline contains duplicate node ids");
    }
    debug!(nodes = shape.node_count, depth = shape.max_depth, "[TRAVERSE] Outline within limits");
    Ok(())
}

/// Walks `roots` in pre-order and produces one document per node.
pub async fn traverse<G>(
    roots: &[OutlineNode],
    location: &str,
    generator: &G,
    config: &GuideConfig,
) -> Result<Traversal>
where
    G: ContentGenerator + ?Sized,
{
    check_limits(roots, &config.limits)?;
    info!(location, roots = roots.len(), policy = ?config.failure_policy, "[TRAVERSE] Starting traversal");

    let mut registry = FilenameRegistry::new();
    let mut html = HtmlFragment::new();
    let mut manifest = Manifest::new();
    let mut files: Vec<PathBuf> = Vec::new();
    let mut outcomes: Vec<NodeOutcome> = Vec::new();

    let mut stack: Vec<&OutlineNode> = roots.iter().rev().collect();
    while let Some(node) = stack.pop() {
        stack.extend(node.children.iter().rev());

        info!(node_id = %node.id, title = %node.title, "[TRAVERSE] Generating content for node");
        let markup = match generate(generator, location, node).await {
            Ok(markup) => markup,
            Err(e) => match config.failure_policy {
                FailurePolicy::AllOrNothing => {
                    error!(node_id = %node.id, error = %e, "[TRAVERSE][ERROR] Generation failed, aborting traversal");
                    discard_files(&files);
                    return Err(e);
                }
                FailurePolicy::Partial => {
                    warn!(node_id = %node.id, error = %e, "[TRAVERSE] Generation failed, continuing with remaining nodes");
                    outcomes.push(NodeOutcome::Failed {
                        node_id: node.id.clone(),
                        title: node.title.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            },
        };

        let document = render::render(&node.title, &markup);
        let file_name = registry.allocate(&node.title, location);
        let path = match docx::persist(&document, &config.output_dir, &file_name) {
            Ok(path) => path,
            Err(e) => {
                error!(node_id = %node.id, error = %e, "[TRAVERSE][ERROR] Persisting document failed, aborting traversal");
                if config.failure_policy == FailurePolicy::AllOrNothing {
                    discard_files(&files);
                }
                return Err(e);
            }
        };

        let locator = download_locator(&config.download_prefix, &file_name);
        html.push_node(&node.id, &markup);
        if let Some(previous) = manifest.insert(node.id.clone(), locator.clone()) {
            warn!(node_id = %node.id, replaced = %previous, "[TRAVERSE] Duplicate node id, manifest keeps the later document");
        }
        files.push(path.clone());
        outcomes.push(NodeOutcome::Rendered(NodeArtifact {
            node_id: node.id.clone(),
            title: node.title.clone(),
            file_name,
            path,
            locator,
        }));
    }

    info!(
        documents = files.len(),
        failures = outcomes.iter().filter(|o| o.is_failed()).count(),
        "[TRAVERSE] Traversal complete"
    );
    Ok(Traversal {
        html_fragment: html.into_string(),
        manifest,
        files,
        outcomes,
    })
}

async fn generate<G>(generator: &G, location: &str, node: &OutlineNode) -> Result<String>
where
    G: ContentGenerator + ?Sized,
{
    generator
        .generate_article(location, node)
        .await
        .map_err(|e| GuideError::Generation {
            node_id: node.id.clone(),
            message: e.to_string(),
        })
}

/// Best-effort removal of documents written by an aborted traversal.
fn discard_files(files: &[PathBuf]) {
    for path in files {
        match fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "[TRAVERSE] Removed document from aborted traversal"),
            Err(e) => warn!(path = %path.display(), error = ?e, "[TRAVERSE] Could not remove document from aborted traversal"),
        }
    }
}
