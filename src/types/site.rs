//! Site Domain Model
//!
//! Stage outputs of the generation pipeline. All entities are created fresh
//! per run and immutable once their producing stage returns; nothing here
//! persists beyond the call that yields the final [`GeneratedSite`].
//!
//! Enum fields on [`RepositoryAnalysis`] are always populated: unrecognized
//! values from the model are coerced to the documented default by the
//! validation layer, never left empty.

use serde::{Deserialize, Serialize};

// =============================================================================
// Repository Analysis (Analyze stage output)
// =============================================================================

/// What kind of project the repository is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Library,
    Application,
    Tool,
    Framework,
    Game,
    Website,
    #[default]
    Other,
}

impl std::str::FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "library" => Ok(Self::Library),
            "application" => Ok(Self::Application),
            "tool" => Ok(Self::Tool),
            "framework" => Ok(Self::Framework),
            "game" => Ok(Self::Game),
            "website" => Ok(Self::Website),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown project type: {}", s)),
        }
    }
}

/// Who the generated site should speak to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    Developers,
    #[serde(rename = "endusers")]
    EndUsers,
    Enterprise,
    Researchers,
}

impl std::str::FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "developers" => Ok(Self::Developers),
            "endusers" | "end-users" | "end_users" => Ok(Self::EndUsers),
            "enterprise" => Ok(Self::Enterprise),
            "researchers" => Ok(Self::Researchers),
            _ => Err(format!("Unknown audience: {}", s)),
        }
    }
}

/// Visual register of the generated site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SiteStyle {
    #[default]
    Professional,
    Minimal,
    Playful,
    Bold,
    Elegant,
}

impl std::str::FromStr for SiteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "professional" => Ok(Self::Professional),
            "minimal" => Ok(Self::Minimal),
            "playful" => Ok(Self::Playful),
            "bold" => Ok(Self::Bold),
            "elegant" => Ok(Self::Elegant),
            _ => Err(format!("Unknown style: {}", s)),
        }
    }
}

/// Validated output of the Analyze stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryAnalysis {
    pub name: String,
    pub description: String,
    pub project_type: ProjectType,
    pub primary_language: String,
    pub audience: Audience,
    pub style: SiteStyle,
    pub key_features: Vec<String>,
}

// =============================================================================
// Design System (Design stage output)
// =============================================================================

/// Color palette for one theme mode. Structurally required: absence of a
/// palette aborts the Design stage, there is no fallback palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorSet {
    pub background: String,
    pub surface: String,
    pub text: String,
    pub accent: String,
    #[serde(default)]
    pub muted: Option<String>,
}

/// Light and dark palettes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorScheme {
    pub light: ColorSet,
    pub dark: ColorSet,
}

/// Font pairing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Typography {
    pub heading_font: String,
    pub body_font: String,
}

/// Validated output of the Design stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignSystem {
    pub colors: ColorScheme,
    pub typography: Typography,
    #[serde(default)]
    pub layout: Option<String>,
}

// =============================================================================
// Generated Artifacts
// =============================================================================

/// One rendered page of the site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPage {
    /// Relative output path (`index.html`, `contributors.html`, ...)
    pub path: String,
    /// Self-contained static page text
    pub html: String,
}

impl GeneratedPage {
    pub fn new(path: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            html: html.into(),
        }
    }
}

/// A non-page output file (theme script, manifest, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteAsset {
    pub path: String,
    pub content: String,
}

// =============================================================================
// Self-Refine
// =============================================================================

/// Quality judgement for one artifact, on a 0-10 scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

/// Outcome of the Self-Refine loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinementResult {
    /// Final artifact (the last valid one, even if a later step failed)
    pub html: String,
    /// Last successful evaluation
    pub evaluation: Evaluation,
    /// Number of improve cycles actually executed; 0 means the first
    /// evaluation already met the target
    pub iterations: usize,
    /// Whether the loop reached the target score or rewrote the artifact
    pub improved: bool,
}

// =============================================================================
// Generated Site
// =============================================================================

/// Final output of a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSite {
    pub pages: Vec<GeneratedPage>,
    #[serde(default)]
    pub assets: Vec<SiteAsset>,
    /// Present only when the Self-Refine loop ran (high quality mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinement: Option<RefinementResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_defaults() {
        assert_eq!(ProjectType::default(), ProjectType::Other);
        assert_eq!(Audience::default(), Audience::Developers);
        assert_eq!(SiteStyle::default(), SiteStyle::Professional);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("library".parse::<ProjectType>().unwrap(), ProjectType::Library);
        assert_eq!("endusers".parse::<Audience>().unwrap(), Audience::EndUsers);
        assert_eq!("minimal".parse::<SiteStyle>().unwrap(), SiteStyle::Minimal);
        assert!("spaceship".parse::<ProjectType>().is_err());
    }

    #[test]
    fn test_design_system_deserializes() {
        let json = serde_json::json!({
            "colors": {
                "light": {"background": "#fff", "surface": "#f8f8f8", "text": "#111", "accent": "#06c"},
                "dark": {"background": "#111", "surface": "#1a1a1a", "text": "#eee", "accent": "#4af"}
            },
            "typography": {"heading_font": "Inter", "body_font": "Inter"}
        });
        let ds: DesignSystem = serde_json::from_value(json).unwrap();
        assert_eq!(ds.colors.light.accent, "#06c");
        assert_eq!(ds.typography.heading_font, "Inter");
    }
}
