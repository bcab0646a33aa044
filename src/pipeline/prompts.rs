//! Stage Prompt Construction
//!
//! Builds the prompt for each pipeline stage from fixed instructions, the
//! previous stage's validated output, the immutable repository facts, and
//! optional user-supplied site instructions. READMEs are truncated to a fixed
//! character budget before inclusion - never sent in full.

use crate::config::{SiteConfig, ThemeMode};
use crate::constants::prompt as prompt_constants;
use crate::types::{DesignSystem, Evaluation, Repository, RepositoryAnalysis};

/// Truncate README content to the prompt character budget
pub fn truncate_readme(readme: &str) -> String {
    if readme.chars().count() <= prompt_constants::README_CHAR_BUDGET {
        return readme.to_string();
    }
    let truncated: String = readme
        .chars()
        .take(prompt_constants::README_CHAR_BUDGET)
        .collect();
    format!("{}\n[README truncated]", truncated)
}

/// Immutable repository facts shared by every stage prompt
fn repository_context(repo: &Repository) -> String {
    let mut ctx = format!("Repository: {}\n", repo.name);

    if let Some(description) = &repo.description {
        ctx.push_str(&format!("Description: {}\n", description));
    }
    if let Some(language) = &repo.language {
        ctx.push_str(&format!("Primary language: {}\n", language));
    }
    if !repo.topics.is_empty() {
        ctx.push_str(&format!("Topics: {}\n", repo.topics.join(", ")));
    }
    if let Some(stats) = &repo.stats {
        ctx.push_str(&format!(
            "Stats: {} stars, {} forks, {} open issues\n",
            stats.stars, stats.forks, stats.open_issues
        ));
    }
    if let Some(readme) = &repo.readme {
        ctx.push_str(&format!("\nREADME excerpt:\n{}\n", truncate_readme(readme)));
    }

    ctx
}

/// SEO requirement lines for the content prompt; empty when nothing is
/// configured
fn seo_requirements(config: &SiteConfig) -> String {
    let mut lines = String::new();
    if let Some(description) = &config.seo.description {
        lines.push_str(&format!("- Use this meta description: {}\n", description));
    }
    if !config.seo.keywords.is_empty() {
        lines.push_str(&format!(
            "- Include these meta keywords: {}\n",
            config.seo.keywords.join(", ")
        ));
    }
    lines
}

fn custom_instructions(config: &SiteConfig) -> String {
    match &config.prompts.site_instructions {
        Some(instructions) if !instructions.trim().is_empty() => {
            format!("\nAdditional instructions from the site owner:\n{}\n", instructions)
        }
        _ => String::new(),
    }
}

/// Analyze stage: classify the repository into the analysis schema
pub fn analysis_prompt(repo: &Repository, config: &SiteConfig) -> String {
    format!(
        r#"Analyze this repository and classify it for website generation.

{context}
Respond with a JSON object using exactly these fields:
{{
  "name": string,
  "description": string (one-sentence pitch),
  "project_type": "library" | "application" | "tool" | "framework" | "game" | "website" | "other",
  "primary_language": string,
  "audience": "developers" | "endusers" | "enterprise" | "researchers",
  "style": "professional" | "minimal" | "playful" | "bold" | "elegant",
  "key_features": [string, ...] (3-6 entries)
}}
{custom}
Respond ONLY with the JSON object, no explanation."#,
        context = repository_context(repo),
        custom = custom_instructions(config),
    )
}

/// Design stage: derive a design system from the validated analysis
pub fn design_prompt(analysis: &RepositoryAnalysis, config: &SiteConfig) -> String {
    format!(
        r#"Create a design system for a static website presenting this project.

Project: {name}
Description: {description}
Type: {project_type:?}
Audience: {audience:?}
Style: {style:?}

Respond with a JSON object using exactly these fields:
{{
  "colors": {{
    "light": {{"background": css-color, "surface": css-color, "text": css-color, "accent": css-color}},
    "dark": {{"background": css-color, "surface": css-color, "text": css-color, "accent": css-color}}
  }},
  "typography": {{"heading_font": font-name, "body_font": font-name}},
  "layout": short description of the page layout
}}

Both the light and dark palettes and the typography block are mandatory.
{custom}
Respond ONLY with the JSON object, no explanation."#,
        name = analysis.name,
        description = analysis.description,
        project_type = analysis.project_type,
        audience = analysis.audience,
        style = analysis.style,
        custom = custom_instructions(config),
    )
}

/// Content stage: render the landing page against the design system
pub fn content_prompt(
    repo: &Repository,
    analysis: &RepositoryAnalysis,
    design: &DesignSystem,
    config: &SiteConfig,
) -> String {
    let features = if analysis.key_features.is_empty() {
        "-".to_string()
    } else {
        analysis
            .key_features
            .iter()
            .map(|f| format!("- {}", f))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Generate a complete, self-contained static landing page (index.html) for this project.

{context}
Positioning: {description}
Audience: {audience:?}, style: {style:?}

Design system (follow it exactly):
- Light palette: background {l_bg}, surface {l_surface}, text {l_text}, accent {l_accent}
- Dark palette: background {d_bg}, surface {d_surface}, text {d_text}, accent {d_accent}
- Fonts: headings {heading_font}, body {body_font}
- Theme mode: {theme_mode}{toggle}

Key features to highlight:
{features}

Requirements:
- Single self-contained HTML document with Tailwind utility classes
- Include the Tailwind CDN script in <head>
- Semantic HTML, responsive layout, accessible contrast
{seo}{custom}
Respond ONLY with the HTML document, no explanation."#,
        context = repository_context(repo),
        seo = seo_requirements(config),
        description = analysis.description,
        audience = analysis.audience,
        style = analysis.style,
        l_bg = design.colors.light.background,
        l_surface = design.colors.light.surface,
        l_text = design.colors.light.text,
        l_accent = design.colors.light.accent,
        d_bg = design.colors.dark.background,
        d_surface = design.colors.dark.surface,
        d_text = design.colors.dark.text,
        d_accent = design.colors.dark.accent,
        heading_font = design.typography.heading_font,
        body_font = design.typography.body_font,
        theme_mode = config.theme.mode,
        toggle = if config.theme.toggle {
            " with a light/dark toggle"
        } else {
            ""
        },
        features = features,
        custom = custom_instructions(config),
    )
}

/// Requirements description handed to the Self-Refine loop
pub fn refine_requirements(analysis: &RepositoryAnalysis, config: &SiteConfig) -> String {
    format!(
        "Static landing page for {} ({:?} project, {:?} audience, {:?} style). \
         Tailwind CSS via CDN, self-contained HTML, theme mode {}.",
        analysis.name, analysis.project_type, analysis.audience, analysis.style, config.theme.mode,
    )
}

/// Evaluate call of the Self-Refine loop
pub fn evaluation_prompt(html: &str, requirements: &str) -> String {
    format!(
        r#"Evaluate the following generated web page against its requirements.

Requirements: {requirements}

Score it on a 0-10 scale for visual design, content quality, accessibility, and
fidelity to the requirements.

Respond with a JSON object:
{{
  "score": number (0-10),
  "feedback": string,
  "strengths": [string, ...],
  "improvements": [string, ...] (concrete, actionable)
}}

Page:
```html
{html}
```

Respond ONLY with the JSON object, no explanation."#,
    )
}

/// Improve call of the Self-Refine loop
pub fn improvement_prompt(html: &str, evaluation: &Evaluation, requirements: &str) -> String {
    let improvements = if evaluation.improvements.is_empty() {
        "- Improve overall quality".to_string()
    } else {
        evaluation
            .improvements
            .iter()
            .map(|i| format!("- {}", i))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Rewrite the following web page, applying every improvement listed. Keep
everything that already works.

Requirements: {requirements}

Improvements to apply:
{improvements}

Current page:
```html
{html}
```

Respond ONLY with the complete rewritten HTML document, no explanation."#,
    )
}

/// Theme-mode hint used by boilerplate assets
pub fn theme_mode_attr(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => "light",
        ThemeMode::Dark => "dark",
        ThemeMode::Auto => "auto",
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Audience, ColorScheme, ColorSet, ProjectType, RepoStats, SiteStyle, Typography,
    };

    #[test]
    fn test_readme_truncated_to_budget() {
        let long = "x".repeat(10_000);
        let truncated = truncate_readme(&long);
        assert!(truncated.len() < 2100);
        assert!(truncated.ends_with("[README truncated]"));

        let short = "short readme";
        assert_eq!(truncate_readme(short), short);
    }

    #[test]
    fn test_analysis_prompt_includes_facts_and_truncated_readme() {
        let mut repo = Repository::new("demo");
        repo.description = Some("A demo".to_string());
        repo.topics = vec!["cli".to_string(), "rust".to_string()];
        repo.readme = Some("r".repeat(5000));
        repo.stats = Some(RepoStats {
            stars: 10,
            forks: 2,
            open_issues: 1,
        });

        let prompt = analysis_prompt(&repo, &SiteConfig::default());
        assert!(prompt.contains("Repository: demo"));
        assert!(prompt.contains("cli, rust"));
        assert!(prompt.contains("[README truncated]"));
        // Full README must never be sent
        assert!(!prompt.contains(&"r".repeat(3000)));
    }

    #[test]
    fn test_custom_instructions_appended() {
        let repo = Repository::new("demo");
        let mut config = SiteConfig::default();
        config.prompts.site_instructions = Some("Use purple everywhere".to_string());

        let prompt = analysis_prompt(&repo, &config);
        assert!(prompt.contains("Use purple everywhere"));
    }

    #[test]
    fn test_seo_settings_reach_content_prompt() {
        let mut config = SiteConfig::default();
        config.seo.description = Some("Fast demo tool".to_string());
        config.seo.keywords = vec!["demo".to_string(), "cli".to_string()];

        let palette = |bg: &str| ColorSet {
            background: bg.to_string(),
            surface: "#eee".to_string(),
            text: "#111".to_string(),
            accent: "#06c".to_string(),
            muted: None,
        };
        let analysis = RepositoryAnalysis {
            name: "demo".to_string(),
            description: "A demo".to_string(),
            project_type: ProjectType::default(),
            primary_language: "Rust".to_string(),
            audience: Audience::default(),
            style: SiteStyle::default(),
            key_features: vec![],
        };
        let design = DesignSystem {
            colors: ColorScheme {
                light: palette("#fff"),
                dark: palette("#111"),
            },
            typography: Typography {
                heading_font: "Sora".to_string(),
                body_font: "Inter".to_string(),
            },
            layout: None,
        };
        let prompt = content_prompt(&Repository::new("demo"), &analysis, &design, &config);
        assert!(prompt.contains("meta description: Fast demo tool"));
        assert!(prompt.contains("meta keywords: demo, cli"));
    }

    #[test]
    fn test_improvement_prompt_lists_improvements() {
        let eval = Evaluation {
            score: 5.0,
            feedback: "ok".to_string(),
            strengths: vec![],
            improvements: vec!["Fix contrast".to_string(), "Add hero section".to_string()],
        };
        let prompt = improvement_prompt("<html></html>", &eval, "reqs");
        assert!(prompt.contains("- Fix contrast"));
        assert!(prompt.contains("- Add hero section"));
    }
}
