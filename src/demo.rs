//! Offline stand-in for the text-generation backend.
//!
//! Used when no API key is configured, so the whole pipeline can be exercised
//! without network access.

use async_trait::async_trait;
use tracing::info;

use crate::contract::{ContentGenerator, GenerateError, OutlineGenerator};
use crate::outline::{OutlineNode, OutlineRequest};

#[derive(Debug, Clone, Copy, Default)]
pub struct DemoGenerator;

impl DemoGenerator {
    pub fn new() -> Self {
        Self
    }

    /// The fixed outline returned for every destination.
    pub fn outline() -> Vec<OutlineNode> {
        vec![
            OutlineNode::new("1", "Destination Overview and Highlights", 1).with_children(vec![
                OutlineNode::new("1-1", "Geography and Climate", 2),
                OutlineNode::new("1-2", "History and Culture", 2),
                OutlineNode::new("1-3", "Three Experiences Not to Miss", 2),
            ]),
            OutlineNode::new("2", "Food and Restaurants", 1).with_children(vec![
                OutlineNode::new("2-1", "Local Dishes to Try", 2),
                OutlineNode::new("2-2", "Good-Value Restaurants", 2),
            ]),
            OutlineNode::new("3", "Where to Stay", 1).with_children(vec![
                OutlineNode::new("3-1", "Choosing a Neighbourhood", 2),
                OutlineNode::new("3-2", "Popular Hotels and Guesthouses", 2),
            ]),
        ]
    }

    /// The placeholder article for `node`.
    pub fn article(location: &str, node: &OutlineNode) -> String {
        format!(
            "<h2>{title}</h2>\n\
             <p>[Demo mode: no API key configured] Highlights of <strong>{location}</strong> - <strong>{title}</strong> will appear here.</p>\n\
             <p>Set <i>TEXT_API_KEY</i> to generate real content.</p>",
            title = node.title,
        )
    }
}

#[async_trait]
impl ContentGenerator for DemoGenerator {
    async fn generate_article(
        &self,
        location: &str,
        node: &OutlineNode,
    ) -> Result<String, GenerateError> {
        info!(location, node_id = %node.id, "Generating demo article");
        Ok(Self::article(location, node))
    }
}

#[async_trait]
impl OutlineGenerator for DemoGenerator {
    async fn generate_outline(
        &self,
        request: &OutlineRequest,
    ) -> Result<Vec<OutlineNode>, GenerateError> {
        info!(location = %request.location, "Generating demo outline");
        Ok(Self::outline())
    }
}
