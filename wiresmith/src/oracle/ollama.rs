//! Ollama-backed oracle
//!
//! Sends the draft diagram to a local Ollama server and tries to read a
//! complete diagram back out of the model's reply.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::OracleConfig;
use crate::diagram::{Diagram, Part};
use crate::oracle::prompts::build_enhance_prompt;
use crate::oracle::provider::{DiagramOracle, OracleError};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "codellama";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub struct OllamaOracle {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: i32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaOracle {
    pub fn new(base_url: Option<String>, model: Option<String>) -> Self {
        Self::with_timeout(base_url, model, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        base_url: Option<String>,
        model: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    pub fn from_config(config: &OracleConfig) -> Self {
        Self::with_timeout(
            config.url.clone(),
            config.model.clone(),
            config.timeout_secs,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaOptions {
                temperature: 0.2,
                num_predict: 4000,
                top_p: 0.9,
            },
        };

        tracing::debug!("Sending diagram request to Ollama ({})", self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(OracleError::RequestFailed)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(OracleError::ApiError { status, message });
        }

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| OracleError::ParseError(e.to_string()))?;

        Ok(body.response)
    }
}

impl Default for OllamaOracle {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[async_trait]
impl DiagramOracle for OllamaOracle {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn enhance(
        &self,
        initial: &Diagram,
        parts: &[Part],
    ) -> Result<Option<Diagram>, OracleError> {
        let prompt = build_enhance_prompt(initial, parts);
        let reply = self.generate(&prompt).await?;
        parse_diagram_reply(&reply)
    }
}

/// Pull the first complete JSON object out of a model reply.
///
/// A reply with no JSON at all is treated as "no suggestion" rather than an
/// error; JSON that is not a diagram is an error.
pub fn parse_diagram_reply(reply: &str) -> Result<Option<Diagram>, OracleError> {
    let Some(json) = extract_json_object(reply) else {
        tracing::debug!("Oracle reply contained no JSON object");
        return Ok(None);
    };
    serde_json::from_str::<Diagram>(&json)
        .map(Some)
        .map_err(|e| OracleError::ParseError(e.to_string()))
}

fn extract_json_object(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }

    None
}
