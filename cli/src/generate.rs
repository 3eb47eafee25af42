#![doc = "Text-generation backend for the CLI: an OpenAI-compatible chat-completions client implementing the core's generator traits."]
//
//! # Generator Integration (CLI <-> Core)
//!
//! The core crate only knows the [`ContentGenerator`] and [`OutlineGenerator`] traits.
//! This module wires them to any OpenAI-compatible `chat/completions` endpoint.
//!
//! ## Client Usage
//!
//! - Construct [`TextClient`] with [`TextClient::from_env`]. It returns `None` when no
//!   API key is configured; the CLI then falls back to the demo generator.
//! - Environment: `TEXT_API_KEY` (or `OPENAI_API_KEY`), `TEXT_BASE_URL` (or
//!   `OPENAI_BASE_URL`), `TEXT_MODEL`.
//! - Model and base URL can be overridden from the YAML `generator:` section.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;

use guidepress::contract::{ContentGenerator, GenerateError, OutlineGenerator};
use guidepress::outline::{OutlineNode, OutlineRequest};

use crate::load_config::GeneratorSection;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const ARTICLE_SYSTEM_PROMPT: &str = "You are a travel expert writing guide sections in HTML.";
const OUTLINE_SYSTEM_PROMPT: &str = "You are a professional travel planner. Return ONLY JSON.";

pub struct TextClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl TextClient {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// Builds a client from the process environment, with `overrides` taking
    /// precedence over `TEXT_BASE_URL` / `TEXT_MODEL`. `None` when no API key is set.
    /// `.env` files are not read here; the binary loads them at startup.
    pub fn from_env(overrides: &GeneratorSection) -> Option<Self> {
        let api_key = first_env(&["TEXT_API_KEY", "OPENAI_API_KEY"])?;
        let base_url = overrides
            .base_url
            .clone()
            .or_else(|| first_env(&["TEXT_BASE_URL", "OPENAI_BASE_URL"]));
        let model = overrides.model.clone().or_else(|| first_env(&["TEXT_MODEL"]));

        let client = Self::new(api_key, base_url, model);
        tracing::info!(
            base_url = %client.base_url,
            model = %client.model,
            "Initialized TextClient from environment"
        );
        Some(client)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        json_mode: bool,
    ) -> Result<String, GenerateError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: json_mode.then(|| serde_json::json!({ "type": "json_object" })),
        };

        tracing::debug!(url = %url, model = %self.model, "Sending chat completion request");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            tracing::error!(status = %status, url = %url, "Chat completion API returned error");
            return Err(format!("chat completion failed with {status}: {text}").into());
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| "chat completion returned no content".into())
    }
}

#[async_trait]
impl ContentGenerator for TextClient {
    async fn generate_article(
        &self,
        location: &str,
        node: &OutlineNode,
    ) -> Result<String, GenerateError> {
        tracing::info!(location, node_id = %node.id, model = %self.model, "Requesting article");
        let prompt = article_prompt(location, node);
        self.complete(ARTICLE_SYSTEM_PROMPT, &prompt, false).await
    }
}

#[async_trait]
impl OutlineGenerator for TextClient {
    async fn generate_outline(
        &self,
        request: &OutlineRequest,
    ) -> Result<Vec<OutlineNode>, GenerateError> {
        tracing::info!(location = %request.location, model = %self.model, "Requesting outline");
        let prompt = outline_prompt(request);
        let payload = self.complete(OUTLINE_SYSTEM_PROMPT, &prompt, true).await?;
        parse_outline_payload(&payload)
    }
}

/// Accepts `{"outline": [...]}`, a bare array, or an object whose first value is an
/// array of nodes.
pub fn parse_outline_payload(payload: &str) -> Result<Vec<OutlineNode>, GenerateError> {
    let value: Value = serde_json::from_str(payload)?;
    let nodes = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove("outline") {
            Some(outline) => outline,
            None => map
                .into_iter()
                .map(|(_, v)| v)
                .next()
                .filter(Value::is_array)
                .ok_or("outline payload holds no node array")?,
        },
        _ => return Err("outline payload is neither an object nor an array".into()),
    };
    Ok(serde_json::from_value(nodes)?)
}

fn article_prompt(location: &str, node: &OutlineNode) -> String {
    format!(
        "Destination: {location}\n\
         Section title: {title}\n\n\
         Write only this section of the travel guide, in a lively, practical voice with emoji.\n\
         - Name concrete places, addresses, ratings out of 5 and prices with conversions.\n\
         - Output one element per line using only <h2>, <p>, <ul>/<li>, <strong>, <i> and \
         <span style=\"background-color: #fef08a\"> for highlights.\n\
         - Finish with a short insider tip.",
        title = node.title,
    )
}

fn outline_prompt(request: &OutlineRequest) -> String {
    let mut prompt = format!(
        "Create a travel guide outline for {}.\n",
        request.location
    );
    if let Some(days) = request.days {
        prompt.push_str(&format!("Duration: {days} days.\n"));
    }
    if let Some(budget) = &request.budget {
        prompt.push_str(&format!("Budget level: {budget}.\n"));
    }
    prompt.push_str(
        "Cover: overview and highlights, themed routes, local experiences, must-see sights, \
         transport, food and restaurants, where to stay, budget and seasons, etiquette and tips.\n\
         Each node has: id (unique string such as \"1\" or \"1-1\"), title, level \
         (1 for chapters, 2 for subsections) and children (list of nodes).\n\
         Return a JSON object with an \"outline\" key holding the array of nodes.",
    );
    prompt
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| env::var(key).ok())
        .find(|value| !value.trim().is_empty())
}
