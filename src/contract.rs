//! # contract: collaborator interfaces of the guide pipeline
//!
//! The pipeline never talks to a text-generation backend directly. It is handed
//! implementations of the traits below, which keeps the backend swappable per
//! request and lets tests substitute deterministic doubles.
//!
//! ## Interface
//! - [`ContentGenerator`] produces the markup for one outline node.
//! - [`OutlineGenerator`] produces an outline forest for a destination.
//!
//! Both are async and report failures as a boxed error; the pipeline does not
//! inspect the error beyond its message.
//!
//! ## Mocking & Testing
//! - The traits are annotated for `mockall`; `MockContentGenerator` and
//!   `MockOutlineGenerator` are exported with the `test-export-mocks` feature.
//! - [`crate::demo::DemoGenerator`] is a ready-made offline implementation of both.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::outline::{OutlineNode, OutlineRequest};

/// Error type returned by generation collaborators.
pub type GenerateError = Box<dyn std::error::Error + Send + Sync>;

/// Produces the markup body for a single outline node.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate the article for `node` of the guide to `location`.
    ///
    /// The returned markup should stay within the recognised subset (headings,
    /// bullets, bold/italic/highlight); anything else renders as plain text.
    async fn generate_article(
        &self,
        location: &str,
        node: &OutlineNode,
    ) -> Result<String, GenerateError>;
}

/// Produces a guide outline.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait OutlineGenerator: Send + Sync {
    async fn generate_outline(
        &self,
        request: &OutlineRequest,
    ) -> Result<Vec<OutlineNode>, GenerateError>;
}
