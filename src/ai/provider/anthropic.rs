//! Anthropic API Provider
//!
//! LLM provider using Anthropic's Messages API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{GenerateRequest, GenerateResponse, LlmProvider, ProviderConfig, TokenUsage};
use crate::config::QualityMode;
use crate::types::{ErrorCategory, Result, SiteError};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const STANDARD_MODEL: &str = "claude-3-5-haiku-latest";
const HIGH_QUALITY_MODEL: &str = "claude-sonnet-4-20250514";

/// Anthropic Messages API provider with secure API key handling
pub struct AnthropicProvider {
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                SiteError::Config(
                    "Anthropic API key not found. Set ANTHROPIC_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let model = config
            .model
            .unwrap_or_else(|| select_model(config.quality).to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SiteError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            model,
            client,
        })
    }
}

fn select_model(quality: QualityMode) -> &'static str {
    match quality {
        QualityMode::Standard => STANDARD_MODEL,
        QualityMode::High => HIGH_QUALITY_MODEL,
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate_text(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        info!(
            model = %self.model,
            task = %request.task,
            temperature = request.effective_temperature(),
            "Generating with Anthropic"
        );

        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: request.effective_max_tokens(),
            temperature: request.effective_temperature(),
            system: request.system.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
        };

        let url = format!("{}/v1/messages", self.api_base);
        debug!("Sending request to Anthropic API");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport_error("Anthropic", &e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(SiteError::provider(
                ErrorCategory::from_http_status(status),
                format!("Anthropic API error ({}): {}", status, text),
            ));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            SiteError::provider(
                ErrorCategory::Unknown,
                format!("Failed to parse Anthropic response: {}", e),
            )
        })?;

        let text = parsed
            .content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(SiteError::provider(
                ErrorCategory::Unknown,
                "No text content in Anthropic response",
            ));
        }

        let usage = parsed.usage.map(|u| TokenUsage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
        });

        Ok(GenerateResponse { text, usage })
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Map reqwest transport failures onto retryable categories
pub(super) fn classify_transport_error(provider: &str, err: &reqwest::Error) -> SiteError {
    let category = if err.is_timeout() || err.is_connect() {
        ErrorCategory::Network
    } else {
        ErrorCategory::Unknown
    };
    SiteError::provider(category, format!("{} request failed: {}", provider, err))
}

// Request/Response types

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: usize,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    input_tokens: u32,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_selection_by_quality() {
        assert_eq!(select_model(QualityMode::Standard), STANDARD_MODEL);
        assert_eq!(select_model(QualityMode::High), HIGH_QUALITY_MODEL);
    }
}
