//! Typed Stage Extraction
//!
//! Per-field validation policy on top of the repaired JSON value:
//!
//! - **Fallback fields**: analysis enums (`project_type`, `audience`,
//!   `style`) coerce unrecognized values to their default and record a
//!   warning - the run continues
//! - **Structurally required fields**: design palettes and typography have no
//!   sane default; their absence fails the stage even though the JSON parsed
//!
//! The asymmetry is deliberate and covered by tests: an analysis with a made-up
//! `project_type` is still a usable analysis, a design system without colors
//! is not a design system.

use serde_json::Value;
use tracing::warn;

use super::json_repair::extract_json;
use super::{IssueSeverity, ValidationIssue};
use crate::types::{
    Audience, ColorScheme, ColorSet, DesignSystem, Evaluation, ProjectType, RepositoryAnalysis,
    Result, SiteError, SiteStyle, Typography,
};

// =============================================================================
// Analysis (fallback policy)
// =============================================================================

/// Parse a repository analysis response. Enum fields that don't validate are
/// coerced to their defaults; the returned issues list records each fallback.
pub fn parse_analysis(raw: &str) -> Result<(RepositoryAnalysis, Vec<ValidationIssue>)> {
    let value = extract_json(raw)?;
    let mut issues = Vec::new();

    let name = string_field(&value, "name").unwrap_or_default();
    let description = string_field(&value, "description").unwrap_or_default();
    let primary_language = string_field(&value, "primary_language")
        .or_else(|| string_field(&value, "primaryLanguage"))
        .unwrap_or_else(|| "Unknown".to_string());

    let project_type =
        enum_with_fallback::<ProjectType>(&value, "project_type", "projectType", &mut issues);
    let audience = enum_with_fallback::<Audience>(&value, "audience", "audience", &mut issues);
    let style = enum_with_fallback::<SiteStyle>(&value, "style", "style", &mut issues);

    let key_features = value
        .get("key_features")
        .or_else(|| value.get("keyFeatures"))
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    for issue in &issues {
        if issue.severity == IssueSeverity::Warning {
            warn!(field = issue.field.as_deref(), "{}", issue.message);
        }
    }

    Ok((
        RepositoryAnalysis {
            name,
            description,
            project_type,
            primary_language,
            audience,
            style,
            key_features,
        },
        issues,
    ))
}

/// Read an enum-valued field, coercing unrecognized or missing values to the
/// enum's default and recording a fallback warning
fn enum_with_fallback<T>(
    value: &Value,
    field: &str,
    alt_field: &str,
    issues: &mut Vec<ValidationIssue>,
) -> T
where
    T: Default + std::str::FromStr,
{
    let raw = value
        .get(field)
        .or_else(|| value.get(alt_field))
        .and_then(Value::as_str);

    match raw {
        Some(s) => match s.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                issues.push(
                    ValidationIssue::warning(format!(
                        "Unrecognized value '{}', falling back to default",
                        s
                    ))
                    .at(field),
                );
                T::default()
            }
        },
        None => {
            issues.push(
                ValidationIssue::warning("Field missing, falling back to default").at(field),
            );
            T::default()
        }
    }
}

// =============================================================================
// Design System (structural policy)
// =============================================================================

/// Parse a design system response. `colors.light`, `colors.dark`, and
/// `typography` are structurally required - there is no fallback palette.
pub fn parse_design_system(raw: &str) -> Result<DesignSystem> {
    let value = extract_json(raw)?;

    let colors = value
        .get("colors")
        .ok_or_else(|| SiteError::missing_field("colors", "no color scheme in response"))?;

    let light = required_color_set(colors, "light")?;
    let dark = required_color_set(colors, "dark")?;

    let typography_value = value
        .get("typography")
        .ok_or_else(|| SiteError::missing_field("typography", "no typography in response"))?;
    let typography = parse_typography(typography_value)?;

    let layout = string_field(&value, "layout");

    Ok(DesignSystem {
        colors: ColorScheme { light, dark },
        typography,
        layout,
    })
}

fn required_color_set(colors: &Value, mode: &str) -> Result<ColorSet> {
    let set = colors
        .get(mode)
        .ok_or_else(|| SiteError::missing_field(format!("colors.{}", mode), "palette absent"))?;

    serde_json::from_value(set.clone()).map_err(|e| {
        SiteError::missing_field(format!("colors.{}", mode), format!("malformed palette: {}", e))
    })
}

fn parse_typography(value: &Value) -> Result<Typography> {
    let heading_font = string_field(value, "heading_font")
        .or_else(|| string_field(value, "headingFont"))
        .ok_or_else(|| SiteError::missing_field("typography.heading_font", "font absent"))?;
    let body_font = string_field(value, "body_font")
        .or_else(|| string_field(value, "bodyFont"))
        .ok_or_else(|| SiteError::missing_field("typography.body_font", "font absent"))?;

    Ok(Typography {
        heading_font,
        body_font,
    })
}

// =============================================================================
// Evaluation
// =============================================================================

/// Parse an evaluation response from the Self-Refine loop. The score is
/// structurally required and clamped to the 0-10 scale; the qualitative
/// fields degrade to empty values.
pub fn parse_evaluation(raw: &str) -> Result<Evaluation> {
    let value = extract_json(raw)?;

    let score = value
        .get("score")
        .and_then(Value::as_f64)
        .ok_or_else(|| SiteError::missing_field("score", "evaluation has no numeric score"))?
        .clamp(0.0, 10.0);

    let feedback = string_field(&value, "feedback").unwrap_or_default();
    let strengths = string_list(&value, "strengths");
    let improvements = string_list(&value, "improvements");

    Ok(Evaluation {
        score,
        feedback,
        strengths,
        improvements,
    })
}

// =============================================================================
// Helpers
// =============================================================================

fn string_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn string_list(value: &Value, field: &str) -> Vec<String> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_analysis() {
        let raw = r#"{
            "name": "demo",
            "description": "A demo tool",
            "project_type": "tool",
            "primary_language": "Rust",
            "audience": "developers",
            "style": "minimal",
            "key_features": ["fast", "small"]
        }"#;
        let (analysis, issues) = parse_analysis(raw).unwrap();
        assert_eq!(analysis.project_type, ProjectType::Tool);
        assert_eq!(analysis.style, SiteStyle::Minimal);
        assert_eq!(analysis.key_features.len(), 2);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unrecognized_enums_fall_back_with_warnings() {
        let raw = r#"{
            "name": "demo",
            "description": "x",
            "project_type": "spaceship",
            "primary_language": "Rust",
            "audience": "aliens",
            "style": "brutalist",
            "key_features": []
        }"#;
        let (analysis, issues) = parse_analysis(raw).unwrap();
        assert_eq!(analysis.project_type, ProjectType::Other);
        assert_eq!(analysis.audience, Audience::Developers);
        assert_eq!(analysis.style, SiteStyle::Professional);
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn test_fenced_analysis_parses() {
        let raw = "```json\n{\"name\": \"demo\", \"project_type\": \"library\"}\n```";
        let (analysis, _) = parse_analysis(raw).unwrap();
        assert_eq!(analysis.project_type, ProjectType::Library);
    }

    #[test]
    fn test_design_missing_dark_palette_fails() {
        let raw = r##"{
            "colors": {"light": {"background": "#fff", "surface": "#eee", "text": "#000", "accent": "#06c"}},
            "typography": {"heading_font": "Inter", "body_font": "Inter"}
        }"##;
        let err = parse_design_system(raw).unwrap_err();
        match err {
            SiteError::StructuralValidation { field, .. } => assert_eq!(field, "colors.dark"),
            other => panic!("expected StructuralValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_design_missing_typography_fails() {
        let raw = r##"{
            "colors": {
                "light": {"background": "#fff", "surface": "#eee", "text": "#000", "accent": "#06c"},
                "dark": {"background": "#111", "surface": "#222", "text": "#eee", "accent": "#4af"}
            }
        }"##;
        let err = parse_design_system(raw).unwrap_err();
        assert!(matches!(err, SiteError::StructuralValidation { .. }));
    }

    #[test]
    fn test_design_camel_case_typography_accepted() {
        let raw = r##"{
            "colors": {
                "light": {"background": "#fff", "surface": "#eee", "text": "#000", "accent": "#06c"},
                "dark": {"background": "#111", "surface": "#222", "text": "#eee", "accent": "#4af"}
            },
            "typography": {"headingFont": "Sora", "bodyFont": "Inter"}
        }"##;
        let design = parse_design_system(raw).unwrap();
        assert_eq!(design.typography.heading_font, "Sora");
    }

    #[test]
    fn test_evaluation_score_clamped() {
        let raw = r#"{"score": 14.5, "feedback": "great", "strengths": [], "improvements": []}"#;
        let eval = parse_evaluation(raw).unwrap();
        assert_eq!(eval.score, 10.0);
    }

    #[test]
    fn test_evaluation_without_score_fails() {
        let raw = r#"{"feedback": "looks fine"}"#;
        assert!(parse_evaluation(raw).is_err());
    }
}
