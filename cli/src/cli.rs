///
/// This module implements the CLI interface for guidepress: command parsing, config
/// and outline loading, generator selection and user-visible output.
///
/// All pipeline logic (rendering, naming, traversal, archiving) lives in the
/// [`guidepress`] crate. This module is glue.
///
/// ## Commands
/// - `outline`: generate an outline and print it as JSON.
/// - `build`: generate a full guide from an outline file.
/// - `node`: generate one section of an outline file.
///
/// Machine-readable results go to stdout as JSON; logs go to stderr.
///
/// ## Generator selection
/// With `TEXT_API_KEY` (or `OPENAI_API_KEY`) set, a [`TextClient`] is used; otherwise
/// the offline [`DemoGenerator`].
use crate::generate::TextClient;
use crate::load_config::{load_config_or_default, CliConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use guidepress::config::FailurePolicy;
use guidepress::contract::{ContentGenerator, OutlineGenerator};
use guidepress::demo::DemoGenerator;
use guidepress::guide::{build_guide, build_single_node};
use guidepress::outline::{find_node, OutlineNode, OutlineRequest};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI for guidepress: turn travel-guide outlines into documents.
#[derive(Parser)]
#[clap(
    name = "guidepress",
    version,
    about = "Generate travel-guide outlines, HTML previews, DOCX sections and zip bundles"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an outline for a destination and print it as JSON
    Outline {
        #[clap(long)]
        location: String,
        #[clap(long)]
        days: Option<u32>,
        #[clap(long)]
        budget: Option<String>,
        /// Optional YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Generate every section of an outline and bundle the documents
    Build {
        #[clap(long)]
        location: String,
        /// Path to the outline JSON (an array of nodes or {"outline": [...]})
        #[clap(long)]
        outline: PathBuf,
        #[clap(long)]
        config: Option<PathBuf>,
        /// Write the combined HTML fragment to this file
        #[clap(long)]
        html: Option<PathBuf>,
        /// Override the configured failure policy
        #[clap(long, value_enum)]
        failure_policy: Option<PolicyArg>,
    },
    /// Generate a single section of an outline, without its children
    Node {
        #[clap(long)]
        location: String,
        #[clap(long)]
        outline: PathBuf,
        #[clap(long)]
        node_id: String,
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// `--failure-policy` values, spelled as in the YAML config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    #[value(name = "all_or_nothing")]
    AllOrNothing,
    #[value(name = "partial")]
    Partial,
}

impl From<PolicyArg> for FailurePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::AllOrNothing => FailurePolicy::AllOrNothing,
            PolicyArg::Partial => FailurePolicy::Partial,
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Outline {
            location,
            days,
            budget,
            config,
        } => {
            let config = load_config_or_default(config.as_deref())?;
            let request = OutlineRequest {
                location,
                days,
                budget,
            };
            tracing::info!(command = "outline", location = %request.location, "[CLI] Generating outline");
            let outline = match TextClient::from_env(&config.generator) {
                Some(client) => generate_outline(&client, &request).await?,
                None => generate_outline(&DemoGenerator::new(), &request).await?,
            };
            println!("{}", serde_json::to_string_pretty(&outline)?);
            Ok(())
        }
        Commands::Build {
            location,
            outline,
            config,
            html,
            failure_policy,
        } => {
            let mut config = load_config_or_default(config.as_deref())?;
            if let Some(policy) = failure_policy {
                config.guide.failure_policy = policy.into();
            }
            let outline = read_outline(&outline)?;
            tracing::info!(command = "build", %location, roots = outline.len(), "[CLI] Building guide");

            let generator = select_generator(&config);
            let bundle = build_guide(&location, &outline, generator.as_ref(), &config.guide)
                .await
                .map_err(|e| {
                    tracing::error!(command = "build", category = e.category(), error = %e, "[CLI] Guide build failed");
                    anyhow::Error::new(e)
                })?;

            if let Some(html_path) = html {
                fs::write(&html_path, &bundle.html_content).with_context(|| {
                    format!("Failed to write HTML fragment to {}", html_path.display())
                })?;
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "download_url": bundle.download_url,
                    "archive_path": bundle.archive_path,
                    "node_downloads": bundle.node_downloads,
                    "failures": bundle.failures,
                }))?
            );
            Ok(())
        }
        Commands::Node {
            location,
            outline,
            node_id,
            config,
        } => {
            let config = load_config_or_default(config.as_deref())?;
            let outline = read_outline(&outline)?;
            let node = find_node(&outline, &node_id)
                .with_context(|| format!("No node with id {node_id:?} in the outline"))?;
            tracing::info!(command = "node", %location, node_id = %node.id, "[CLI] Building single node");

            let generator = select_generator(&config);
            let bundle = build_single_node(&location, node, generator.as_ref(), &config.guide)
                .await
                .map_err(|e| {
                    tracing::error!(command = "node", category = e.category(), error = %e, "[CLI] Node build failed");
                    anyhow::Error::new(e)
                })?;
            println!("{}", serde_json::to_string_pretty(&bundle)?);
            Ok(())
        }
    }
}

fn select_generator(config: &CliConfig) -> Box<dyn ContentGenerator> {
    match TextClient::from_env(&config.generator) {
        Some(client) => Box::new(client),
        None => {
            tracing::warn!("[CLI] No API key configured, using demo content");
            Box::new(DemoGenerator::new())
        }
    }
}

async fn generate_outline<G: OutlineGenerator>(
    generator: &G,
    request: &OutlineRequest,
) -> Result<Vec<OutlineNode>> {
    generator
        .generate_outline(request)
        .await
        .map_err(|e| anyhow::Error::new(guidepress::GuideError::Outline(e.to_string())))
}

/// Reads an outline file: either a JSON array of nodes or `{"outline": [...]}`.
pub fn read_outline(path: &Path) -> Result<Vec<OutlineNode>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read outline file {}", path.display()))?;
    crate::generate::parse_outline_payload(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse outline {}: {e}", path.display()))
}
