//! Configuration Types
//!
//! Fully-defaulted, pre-resolved site configuration. Loading from disk or
//! environment is the caller's concern; every field here deserializes with
//! `#[serde(default)]` so partial sources resolve to a complete config.

use serde::{Deserialize, Serialize};

use crate::constants::prompt as prompt_constants;
use crate::constants::refine as refine_constants;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// AI provider and quality settings
    pub ai: AiConfig,

    /// Theme mode and toggle
    pub theme: ThemeConfig,

    /// User-supplied prompt customization
    pub prompts: PromptsConfig,

    /// SEO metadata
    pub seo: SeoConfig,

    /// Sitemap generation settings
    pub sitemap: SitemapConfig,

    /// robots.txt generation settings
    pub robots: RobotsConfig,

    /// Contributors page settings
    pub contributors: ContributorsConfig,
}

impl SiteConfig {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `SiteError::Config` on validation failure; soft limits only
    /// log a warning.
    pub fn validate(&self) -> crate::types::Result<()> {
        if !(0.0..=1.0).contains(&self.sitemap.priority) {
            return Err(crate::types::SiteError::Config(format!(
                "sitemap priority must be between 0.0 and 1.0, got {}",
                self.sitemap.priority
            )));
        }

        if self.ai.max_refine_iterations == 0 {
            return Err(crate::types::SiteError::Config(
                "max_refine_iterations must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=10.0).contains(&self.ai.refine_target_score) {
            return Err(crate::types::SiteError::Config(format!(
                "refine_target_score must be between 0.0 and 10.0, got {}",
                self.ai.refine_target_score
            )));
        }

        if let Some(instructions) = &self.prompts.site_instructions
            && instructions.len() > prompt_constants::SITE_INSTRUCTIONS_SOFT_LIMIT
        {
            tracing::warn!(
                length = instructions.len(),
                limit = prompt_constants::SITE_INSTRUCTIONS_SOFT_LIMIT,
                "Site instructions exceed the soft length limit; long instructions dilute prompts"
            );
        }

        if let Some(site_url) = &self.seo.site_url
            && url::Url::parse(site_url).is_err()
        {
            return Err(crate::types::SiteError::Config(format!(
                "seo.site_url is not a valid URL: {}",
                site_url
            )));
        }

        Ok(())
    }
}

// =============================================================================
// AI Configuration
// =============================================================================

/// Which vendor backs the AI provider port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiVendor {
    #[default]
    Anthropic,
    OpenAi,
    Google,
}

impl std::fmt::Display for AiVendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiVendor::Anthropic => write!(f, "anthropic"),
            AiVendor::OpenAi => write!(f, "openai"),
            AiVendor::Google => write!(f, "google"),
        }
    }
}

impl std::str::FromStr for AiVendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(AiVendor::Anthropic),
            "openai" => Ok(AiVendor::OpenAi),
            "google" => Ok(AiVendor::Google),
            _ => Err(format!(
                "Unknown AI provider: {}. Valid values: anthropic, openai, google",
                s
            )),
        }
    }
}

/// Quality mode: standard is a single pass per stage, high adds the
/// Self-Refine loop after content generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityMode {
    #[default]
    Standard,
    High,
}

impl std::fmt::Display for QualityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityMode::Standard => write!(f, "standard"),
            QualityMode::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for QualityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(QualityMode::Standard),
            "high" => Ok(QualityMode::High),
            _ => Err(format!(
                "Unknown quality mode: {}. Valid values: standard, high",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Provider vendor
    pub provider: AiVendor,

    /// Quality mode
    pub quality: QualityMode,

    /// Target score for the Self-Refine loop (0-10)
    pub refine_target_score: f64,

    /// Maximum improve cycles for the Self-Refine loop
    pub max_refine_iterations: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiVendor::Anthropic,
            quality: QualityMode::Standard,
            refine_target_score: refine_constants::DEFAULT_TARGET_SCORE,
            max_refine_iterations: refine_constants::DEFAULT_MAX_ITERATIONS,
        }
    }
}

// =============================================================================
// Theme Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    Auto,
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
            ThemeMode::Auto => write!(f, "auto"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Theme mode
    pub mode: ThemeMode,

    /// Whether to render a light/dark toggle
    pub toggle: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Auto,
            toggle: true,
        }
    }
}

// =============================================================================
// Prompts Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Free-form instructions appended to every stage prompt
    pub site_instructions: Option<String>,
}

// =============================================================================
// SEO Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    /// Canonical site URL; prerequisite for sitemap generation
    pub site_url: Option<String>,

    /// Meta description override
    pub description: Option<String>,

    /// Meta keywords
    pub keywords: Vec<String>,
}

// =============================================================================
// Sitemap Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    #[default]
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl std::fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeFreq::Always => write!(f, "always"),
            ChangeFreq::Hourly => write!(f, "hourly"),
            ChangeFreq::Daily => write!(f, "daily"),
            ChangeFreq::Weekly => write!(f, "weekly"),
            ChangeFreq::Monthly => write!(f, "monthly"),
            ChangeFreq::Yearly => write!(f, "yearly"),
            ChangeFreq::Never => write!(f, "never"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Whether to emit sitemap.xml
    pub enabled: bool,

    /// Change frequency hint per URL
    pub changefreq: ChangeFreq,

    /// Priority hint per URL (0.0-1.0)
    pub priority: f64,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            changefreq: ChangeFreq::Weekly,
            priority: 0.8,
        }
    }
}

// =============================================================================
// Robots Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    /// Whether to emit robots.txt
    pub enabled: bool,

    /// Extra rule lines appended verbatim (blank lines skipped)
    pub additional_rules: Vec<String>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            additional_rules: Vec::new(),
        }
    }
}

// =============================================================================
// Contributors Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorsConfig {
    /// Whether to render a contributors page
    pub enabled: bool,

    /// Maximum contributors shown
    pub max_contributors: usize,
}

impl Default for ContributorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_contributors: 20,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
