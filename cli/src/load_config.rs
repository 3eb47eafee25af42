/// `load_config` module: loads the optional YAML config file for the CLI.
///
/// The file carries only non-secret settings. API keys are read from the environment
/// by [`crate::generate::TextClient::from_env`], never from YAML.
///
/// # Accepted schema
/// ```yaml
/// guide:
///   output_dir: ./outputs
///   download_prefix: /outputs
///   failure_policy: all_or_nothing   # or: partial
///   limits:
///     max_depth: 8
///     max_nodes: 512
/// generator:
///   model: gpt-4o-mini
///   base_url: https://api.openai.com/v1
/// ```
/// Every key is optional.
///
/// # Errors
/// All errors use `anyhow::Error` with the offending path in the message, and are
/// surfaced at the CLI boundary.
use anyhow::Result;
use guidepress::config::GuideConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub guide: GuideConfig,
    pub generator: GeneratorSection,
}

/// Overrides for the text-generation backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// Reads and parses a YAML config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    // An empty file deserialises to `null`, which means "all defaults".
    if config_content.trim().is_empty() {
        info!(config_path = ?path_ref, "Config file is empty, using defaults");
        return Ok(CliConfig::default());
    }

    let config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    config.guide.trace_loaded();
    Ok(config)
}

/// Loads `path` when given, otherwise returns the defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<CliConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(CliConfig::default()),
    }
}
