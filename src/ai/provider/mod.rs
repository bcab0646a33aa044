//! LLM Provider Abstraction
//!
//! Defines the narrow `LlmProvider` port the pipeline depends on: one
//! text-generation call with task-keyed temperature defaults and optional
//! token usage. Concrete vendors live behind this port.
//!
//! ## Modules
//!
//! - `anthropic`: Anthropic Messages API
//! - `openai`: OpenAI Chat Completions API
//! - `google`: Google Generative Language API

mod anthropic;
mod google;
mod openai;

pub use anthropic::AnthropicProvider;
pub use google::GoogleProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{AiVendor, QualityMode};
use crate::constants::network as network_constants;
use crate::types::Result;

// =============================================================================
// Generation Tasks
// =============================================================================

/// The kind of generation being requested. Each task carries its own default
/// temperature: evaluation must be deterministic, content wants creativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Analysis,
    Design,
    Content,
    Evaluation,
    Improvement,
}

impl TaskKind {
    /// Task-keyed default temperature
    pub fn default_temperature(&self) -> f32 {
        match self {
            TaskKind::Analysis => 0.3,
            TaskKind::Design => 0.5,
            TaskKind::Content => 0.7,
            TaskKind::Evaluation => 0.0,
            TaskKind::Improvement => 0.7,
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::Analysis => write!(f, "analysis"),
            TaskKind::Design => write!(f, "design"),
            TaskKind::Content => write!(f, "content"),
            TaskKind::Evaluation => write!(f, "evaluation"),
            TaskKind::Improvement => write!(f, "improvement"),
        }
    }
}

// =============================================================================
// Request / Response
// =============================================================================

/// A single generation request against the provider port
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// User prompt
    pub prompt: String,
    /// Optional system prompt
    pub system: Option<String>,
    /// Task kind; selects the default temperature
    pub task: TaskKind,
    /// Temperature override; falls back to the task default
    pub temperature: Option<f32>,
    /// Output token cap
    pub max_output_tokens: Option<usize>,
}

impl GenerateRequest {
    pub fn new(task: TaskKind, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            task,
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Effective temperature: explicit override or task default
    pub fn effective_temperature(&self) -> f32 {
        self.temperature
            .unwrap_or_else(|| self.task.default_temperature())
    }

    /// Effective output token cap
    pub fn effective_max_tokens(&self) -> usize {
        self.max_output_tokens
            .unwrap_or(network_constants::DEFAULT_MAX_OUTPUT_TOKENS)
    }
}

/// Token usage metrics reported by the provider, when available
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Raw text response from a provider, before any validation
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

impl GenerateResponse {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }
}

/// Shared provider handle, reused across all pipeline stages. Providers are
/// stateless from the pipeline's perspective.
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for LLM providers
///
/// API keys are redacted in debug output and held as `SecretString` inside
/// each provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Vendor backing the port
    pub vendor: AiVendor,
    /// Quality mode; selects the per-vendor model
    pub quality: QualityMode,
    /// Model override (otherwise selected by quality mode)
    #[serde(default)]
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API key; never serialized to output
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for custom endpoints)
    #[serde(default)]
    pub api_base: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("vendor", &self.vendor)
            .field("quality", &self.quality)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            vendor: AiVendor::Anthropic,
            quality: QualityMode::Standard,
            model: None,
            timeout_secs: network_constants::DEFAULT_TIMEOUT_SECS,
            api_key: None,
            api_base: None,
        }
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// The AI provider port: one synchronous-per-call text generation operation.
/// The pipeline holds no connection or locking logic; reuse across stages is
/// the provider implementation's concern.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a request
    async fn generate_text(&self, request: &GenerateRequest) -> Result<GenerateResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.vendor {
        AiVendor::Anthropic => Ok(Arc::new(AnthropicProvider::new(config.clone())?)),
        AiVendor::OpenAi => Ok(Arc::new(OpenAiProvider::new(config.clone())?)),
        AiVendor::Google => Ok(Arc::new(GoogleProvider::new(config.clone())?)),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_temperatures() {
        assert_eq!(TaskKind::Analysis.default_temperature(), 0.3);
        assert_eq!(TaskKind::Design.default_temperature(), 0.5);
        assert_eq!(TaskKind::Content.default_temperature(), 0.7);
        assert_eq!(TaskKind::Evaluation.default_temperature(), 0.0);
    }

    #[test]
    fn test_temperature_override() {
        let req = GenerateRequest::new(TaskKind::Analysis, "prompt");
        assert_eq!(req.effective_temperature(), 0.3);

        let req = req.with_temperature(0.9);
        assert_eq!(req.effective_temperature(), 0.9);
    }

    #[test]
    fn test_provider_config_debug_redacts_key() {
        let config = ProviderConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
