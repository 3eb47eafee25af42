//! Error taxonomy for the guide pipeline.
//!
//! Every failure inside the core maps onto one [`GuideError`] variant and is surfaced
//! to the caller with its [`category`](GuideError::category) and message. Only
//! generation failures under `FailurePolicy::Partial` are absorbed, as per-node outcomes.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GuideError>;

#[derive(Error, Debug)]
pub enum GuideError {
    /// The content-generation collaborator failed for a node.
    #[error("content generation failed for node '{node_id}': {message}")]
    Generation { node_id: String, message: String },

    /// A rendered document could not be written.
    #[error("failed to persist document {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive could not be assembled from the produced documents.
    #[error("failed to assemble archive {}: {message}", path.display())]
    Archive { path: PathBuf, message: String },

    /// The outline exceeds the configured traversal limits.
    #[error("outline rejected: {0}")]
    Structure(String),

    /// The outline-generation collaborator failed.
    #[error("outline generation failed: {0}")]
    Outline(String),
}

impl GuideError {
    /// Stable, lowercase name of the error category.
    pub fn category(&self) -> &'static str {
        match self {
            GuideError::Generation { .. } => "generation",
            GuideError::Persistence { .. } => "persistence",
            GuideError::Archive { .. } => "archive",
            GuideError::Structure(_) => "structure",
            GuideError::Outline(_) => "outline",
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GuideError::Persistence {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        GuideError::Archive {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
