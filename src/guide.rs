//! Request-level entry points: a whole guide, or a single node of it.
//!
//! [`build_guide`] walks the full outline, writes one DOCX per node and bundles them
//! into `<location>_guide.zip`. [`build_single_node`] renders exactly one node (its
//! children are not visited) and produces no archive; callers use it to retry or
//! fetch sections individually.
//!
//! Both return a [`GuideBundle`] shaped like the response the presentation layer
//! consumes: the combined HTML, the primary download locator and the per-node
//! manifest.
//!
//! # Error Handling
//! Errors from traversal or archive assembly are returned unchanged; nothing is
//! retried.

use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

use crate::archive;
use crate::config::{FailurePolicy, GuideConfig};
use crate::contract::ContentGenerator;
use crate::error::{GuideError, Result};
use crate::filename::{sanitize_label, PLACEHOLDER_SCOPE};
use crate::manifest::{download_locator, Manifest};
use crate::outline::OutlineNode;
use crate::traverse::{traverse, NodeOutcome, Traversal};

/// Result of a guide or single-node build.
#[derive(Debug, Clone, Serialize)]
pub struct GuideBundle {
    /// Concatenated node containers, in traversal order.
    pub html_content: String,
    /// Archive locator for a full guide, document locator for a single node.
    pub download_url: String,
    /// Written archive, absent for single-node builds.
    pub archive_path: Option<PathBuf>,
    pub node_downloads: Manifest,
    /// Nodes skipped under [`FailurePolicy::Partial`].
    pub failures: Vec<NodeFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeFailure {
    pub node_id: String,
    pub title: String,
    pub reason: String,
}

/// `<location>_guide.zip`, with the location sanitised like document names.
pub fn archive_file_name(location: &str) -> String {
    let mut scope = sanitize_label(location);
    if scope.is_empty() {
        scope = PLACEHOLDER_SCOPE.to_string();
    }
    format!("{scope}_guide.zip")
}

/// Generates every node of `outline` and bundles the documents.
pub async fn build_guide<G>(
    location: &str,
    outline: &[OutlineNode],
    generator: &G,
    config: &GuideConfig,
) -> Result<GuideBundle>
where
    G: ContentGenerator + ?Sized,
{
    info!(location, "[GUIDE] Building guide");
    let traversal = traverse(outline, location, generator, config).await?;

    let archive_name = archive_file_name(location);
    let archive_path = archive::assemble(&traversal.files, &config.output_dir, &archive_name)
        .map_err(|e| {
            error!(error = %e, "[GUIDE][ERROR] Archive assembly failed");
            e
        })?;

    let download_url = download_locator(&config.download_prefix, &archive_name);
    info!(
        location,
        documents = traversal.files.len(),
        archive = %archive_path.display(),
        "[GUIDE] Guide complete"
    );
    Ok(into_bundle(traversal, download_url, Some(archive_path)))
}

/// Generates `node` alone, ignoring its children. Always all-or-nothing.
pub async fn build_single_node<G>(
    location: &str,
    node: &OutlineNode,
    generator: &G,
    config: &GuideConfig,
) -> Result<GuideBundle>
where
    G: ContentGenerator + ?Sized,
{
    info!(location, node_id = %node.id, "[GUIDE] Building single node");
    let leaf = OutlineNode {
        children: Vec::new(),
        ..node.clone()
    };
    let config = GuideConfig {
        failure_policy: FailurePolicy::AllOrNothing,
        ..config.clone()
    };

    let traversal = traverse(std::slice::from_ref(&leaf), location, generator, &config).await?;
    let download_url = traversal
        .manifest
        .get(&leaf.id)
        .map(str::to_string)
        .ok_or_else(|| GuideError::Generation {
            node_id: leaf.id.clone(),
            message: "no document was produced".to_string(),
        })?;

    Ok(into_bundle(traversal, download_url, None))
}

fn into_bundle(
    traversal: Traversal,
    download_url: String,
    archive_path: Option<PathBuf>,
) -> GuideBundle {
    let failures = traversal
        .outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            NodeOutcome::Failed {
                node_id,
                title,
                reason,
            } => Some(NodeFailure {
                node_id: node_id.clone(),
                title: title.clone(),
                reason: reason.clone(),
            }),
            NodeOutcome::Rendered(_) => None,
        })
        .collect();

    GuideBundle {
        html_content: traversal.html_fragment,
        download_url,
        archive_path,
        node_downloads: traversal.manifest,
        failures,
    }
}
