//! Generation Pipeline
//!
//! Fixed-sequence orchestrator over one repository:
//! Analyze -> Design -> GenerateContent -> (Refine)? -> Assemble.
//!
//! Each stage builds its prompt from the previous stage's validated output,
//! calls the provider port (Analyze and Design through the retry wrapper),
//! and feeds the response through the validation layer. A stage failure wraps
//! the underlying error with the stage prefix and aborts the run; stages are
//! not re-entered within one run. Validation failures of a returned response
//! are terminal - only transient provider faults are retried.
//!
//! A pipeline instance holds no shared mutable state; callers generating many
//! repositories should run separate instances concurrently rather than
//! parallelize within one run.

pub mod prompts;
pub mod refine;

pub use refine::SelfRefineLoop;

use tracing::info;

use crate::ai::provider::{GenerateRequest, SharedProvider, TaskKind};
use crate::ai::retry::{RetryPolicy, with_retry};
use crate::ai::validation::{parse_analysis, parse_design_system, parse_rendered_artifact};
use crate::config::{QualityMode, SiteConfig};
use crate::constants::artifact as artifact_constants;
use crate::site;
use crate::types::{
    DesignSystem, GeneratedPage, GeneratedSite, Repository, RepositoryAnalysis, Result, Stage,
};

/// The generation pipeline for one repository
pub struct SitePipeline {
    provider: SharedProvider,
    config: SiteConfig,
    retry: RetryPolicy,
}

impl SitePipeline {
    pub fn new(provider: SharedProvider, config: SiteConfig) -> Self {
        Self {
            provider,
            config,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy for provider calls
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run the full pipeline and return the assembled site
    pub async fn generate(&self, repo: &Repository) -> Result<GeneratedSite> {
        self.config.validate()?;

        info!(
            repository = %repo.name,
            quality = %self.config.ai.quality,
            provider = self.provider.name(),
            "Starting site generation"
        );

        let analysis = self.analyze(repo).await?;
        let design = self.design(&analysis).await?;

        // Boilerplate assets share no data with the AI stages, so they are
        // produced concurrently with content rendering
        let (content, assets) = futures::join!(
            self.render_content(repo, &analysis, &design),
            async {
                if self.config.theme.toggle {
                    vec![site::theme_toggle_script(self.config.theme.mode)]
                } else {
                    Vec::new()
                }
            }
        );
        let mut index_html = content?;

        let refinement = if self.config.ai.quality == QualityMode::High {
            let requirements = prompts::refine_requirements(&analysis, &self.config);
            let refine_loop = SelfRefineLoop::new(
                self.provider.clone(),
                self.config.ai.refine_target_score,
                self.config.ai.max_refine_iterations,
            );
            let result = refine_loop.run(&index_html, &requirements).await;
            index_html = result.html.clone();
            Some(result)
        } else {
            None
        };

        let mut pages = vec![GeneratedPage::new("index.html", index_html)];

        if self.config.contributors.enabled && !repo.contributors.is_empty() {
            pages.push(site::contributors_page(
                &repo.contributors,
                self.config.contributors.max_contributors,
            ));
        }

        let mut generated = site::assemble(pages, assets, &self.config);
        generated.refinement = refinement;

        info!(
            pages = generated.pages.len(),
            refined = generated.refinement.is_some(),
            "Site generation complete"
        );
        Ok(generated)
    }

    /// Analyze stage: classify the repository. Enum mismatches fall back to
    /// defaults and never abort the run.
    async fn analyze(&self, repo: &Repository) -> Result<RepositoryAnalysis> {
        info!(stage = %Stage::Analyze, "Running pipeline stage");
        let prompt = prompts::analysis_prompt(repo, &self.config);

        let response = with_retry(&self.retry, || {
            let request = GenerateRequest::new(TaskKind::Analysis, prompt.clone());
            async move { self.provider.generate_text(&request).await }
        })
        .await
        .map_err(|e| e.in_stage(Stage::Analyze))?;

        let (analysis, _issues) =
            parse_analysis(&response.text).map_err(|e| e.in_stage(Stage::Analyze))?;
        Ok(analysis)
    }

    /// Design stage: derive the design system. Missing palettes or typography
    /// abort the run - there is no fallback design.
    async fn design(&self, analysis: &RepositoryAnalysis) -> Result<DesignSystem> {
        info!(stage = %Stage::Design, "Running pipeline stage");
        let prompt = prompts::design_prompt(analysis, &self.config);

        let response = with_retry(&self.retry, || {
            let request = GenerateRequest::new(TaskKind::Design, prompt.clone());
            async move { self.provider.generate_text(&request).await }
        })
        .await
        .map_err(|e| e.in_stage(Stage::Design))?;

        parse_design_system(&response.text).map_err(|e| e.in_stage(Stage::Design))
    }

    /// Content stage: render the landing page. Under-length output aborts.
    async fn render_content(
        &self,
        repo: &Repository,
        analysis: &RepositoryAnalysis,
        design: &DesignSystem,
    ) -> Result<String> {
        info!(stage = %Stage::Content, "Running pipeline stage");
        let request = GenerateRequest::new(
            TaskKind::Content,
            prompts::content_prompt(repo, analysis, design, &self.config),
        );

        let response = self
            .provider
            .generate_text(&request)
            .await
            .map_err(|e| e.in_stage(Stage::Content))?;

        let outcome =
            parse_rendered_artifact(&response.text, artifact_constants::MIN_HTML_LENGTH)
                .map_err(|e| e.in_stage(Stage::Content))?;
        Ok(outcome.html)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::{GenerateResponse, LlmProvider};
    use crate::config::SeoConfig;
    use crate::types::{Contributor, ErrorCategory, SiteError};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// One scripted provider turn: a canned response or a transient fault
    enum Step {
        Reply(String),
        Transient,
    }

    /// Scripted provider that records the task of every call
    struct ScriptedProvider {
        steps: Mutex<Vec<Step>>,
        calls: Mutex<Vec<TaskKind>>,
    }

    impl ScriptedProvider {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: Mutex::new(steps),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn replies(texts: &[&str]) -> Arc<Self> {
            Self::new(texts.iter().map(|t| Step::Reply(t.to_string())).collect())
        }

        fn calls(&self) -> Vec<TaskKind> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn generate_text(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
            self.calls.lock().unwrap().push(request.task);
            let mut steps = self.steps.lock().unwrap();
            if steps.is_empty() {
                return Err(SiteError::provider(
                    ErrorCategory::Unknown,
                    "script exhausted",
                ));
            }
            match steps.remove(0) {
                Step::Reply(text) => Ok(GenerateResponse::text_only(text)),
                Step::Transient => Err(SiteError::provider(
                    ErrorCategory::Network,
                    "connection reset",
                )),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "test"
        }
    }

    fn analysis_json() -> String {
        r#"{
            "name": "demo",
            "description": "A demo tool",
            "project_type": "tool",
            "primary_language": "Rust",
            "audience": "developers",
            "style": "minimal",
            "key_features": ["fast", "small"]
        }"#
        .to_string()
    }

    fn design_json() -> String {
        r##"{
            "colors": {
                "light": {"background": "#fff", "surface": "#f6f6f6", "text": "#111", "accent": "#06c"},
                "dark": {"background": "#111", "surface": "#1a1a1a", "text": "#eee", "accent": "#4af"}
            },
            "typography": {"heading_font": "Sora", "body_font": "Inter"},
            "layout": "hero with feature grid"
        }"##
        .to_string()
    }

    fn content_html() -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head><title>demo</title></head>\n<body>{}</body>\n</html>",
            "<p>content</p>".repeat(20)
        )
    }

    fn eval_json(score: f64) -> String {
        format!(
            r#"{{"score": {}, "feedback": "f", "strengths": [], "improvements": []}}"#,
            score
        )
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_standard_mode_makes_exactly_three_calls() {
        let provider = ScriptedProvider::replies(&[
            &analysis_json(),
            &design_json(),
            &content_html(),
        ]);
        let pipeline = SitePipeline::new(provider.clone(), SiteConfig::default());

        let site = pipeline.generate(&Repository::new("demo")).await.unwrap();

        assert_eq!(
            provider.calls(),
            vec![TaskKind::Analysis, TaskKind::Design, TaskKind::Content]
        );
        assert!(site.refinement.is_none());
        assert!(site.pages.iter().any(|p| p.path == "index.html"));
        // No site URL configured: robots present, sitemap skipped
        assert!(site.pages.iter().any(|p| p.path == "robots.txt"));
        assert!(!site.pages.iter().any(|p| p.path == "sitemap.xml"));
    }

    #[tokio::test]
    async fn test_high_quality_mode_adds_evaluation_call() {
        let provider = ScriptedProvider::replies(&[
            &analysis_json(),
            &design_json(),
            &content_html(),
            &eval_json(9.0),
        ]);
        let mut config = SiteConfig::default();
        config.ai.quality = QualityMode::High;
        let pipeline = SitePipeline::new(provider.clone(), config);

        let site = pipeline.generate(&Repository::new("demo")).await.unwrap();

        assert_eq!(provider.calls().len(), 4);
        assert_eq!(provider.calls()[3], TaskKind::Evaluation);

        let refinement = site.refinement.unwrap();
        assert_eq!(refinement.iterations, 0);
        assert!(refinement.improved);
    }

    #[tokio::test]
    async fn test_analysis_enum_mismatch_does_not_abort() {
        let odd_analysis = r#"{
            "name": "demo",
            "description": "x",
            "project_type": "spaceship",
            "primary_language": "Rust",
            "audience": "aliens",
            "style": "brutalist",
            "key_features": []
        }"#;
        let provider =
            ScriptedProvider::replies(&[odd_analysis, &design_json(), &content_html()]);
        let pipeline = SitePipeline::new(provider, SiteConfig::default());

        let site = pipeline.generate(&Repository::new("demo")).await.unwrap();
        assert!(site.pages.iter().any(|p| p.path == "index.html"));
    }

    #[tokio::test]
    async fn test_design_missing_palette_aborts_with_stage_prefix() {
        let bad_design = r##"{
            "colors": {"light": {"background": "#fff", "surface": "#eee", "text": "#000", "accent": "#06c"}},
            "typography": {"heading_font": "Sora", "body_font": "Inter"}
        }"##;
        let provider = ScriptedProvider::replies(&[&analysis_json(), bad_design]);
        let pipeline = SitePipeline::new(provider, SiteConfig::default());

        let err = pipeline.generate(&Repository::new("demo")).await.unwrap_err();
        assert!(err.to_string().contains("Design system generation failed"));
    }

    #[tokio::test]
    async fn test_undersized_content_aborts_with_stage_prefix() {
        let provider = ScriptedProvider::replies(&[&analysis_json(), &design_json(), "short"]);
        let pipeline = SitePipeline::new(provider, SiteConfig::default());

        let err = pipeline.generate(&Repository::new("demo")).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Content generation failed"));
        assert!(msg.contains("AI returned empty or invalid response"));
    }

    #[tokio::test]
    async fn test_transient_analysis_fault_is_retried() {
        let provider = ScriptedProvider::new(vec![
            Step::Transient,
            Step::Reply(analysis_json()),
            Step::Reply(design_json()),
            Step::Reply(content_html()),
        ]);
        let pipeline =
            SitePipeline::new(provider.clone(), SiteConfig::default()).with_retry_policy(fast_retry());

        let site = pipeline.generate(&Repository::new("demo")).await.unwrap();
        assert!(site.pages.iter().any(|p| p.path == "index.html"));
        // First analysis call failed, second succeeded
        assert_eq!(provider.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_malformed_design_not_retried() {
        let provider = ScriptedProvider::replies(&[&analysis_json(), "utter nonsense"]);
        let pipeline =
            SitePipeline::new(provider.clone(), SiteConfig::default()).with_retry_policy(fast_retry());

        let err = pipeline.generate(&Repository::new("demo")).await.unwrap_err();
        assert!(err.to_string().contains("Design system generation failed"));
        // One analysis call plus exactly one design call: no retry on a
        // deterministic validation failure
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_contributors_page_generated_when_enabled() {
        let provider = ScriptedProvider::replies(&[
            &analysis_json(),
            &design_json(),
            &content_html(),
        ]);
        let mut config = SiteConfig::default();
        config.contributors.enabled = true;

        let mut repo = Repository::new("demo");
        repo.contributors = vec![Contributor {
            login: "alice".to_string(),
            avatar_url: None,
            profile_url: None,
            contributions: 42,
        }];

        let pipeline = SitePipeline::new(provider, config);
        let site = pipeline.generate(&repo).await.unwrap();
        assert!(site.pages.iter().any(|p| p.path == "contributors.html"));
    }

    #[tokio::test]
    async fn test_sitemap_emitted_with_site_url() {
        let provider = ScriptedProvider::replies(&[
            &analysis_json(),
            &design_json(),
            &content_html(),
        ]);
        let config = SiteConfig {
            seo: SeoConfig {
                site_url: Some("https://demo.example".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let pipeline = SitePipeline::new(provider, config);

        let site = pipeline.generate(&Repository::new("demo")).await.unwrap();
        let sitemap = site
            .pages
            .iter()
            .find(|p| p.path == "sitemap.xml")
            .expect("sitemap should be generated");
        assert!(sitemap.html.contains("<loc>https://demo.example</loc>"));
    }

    #[tokio::test]
    async fn test_theme_toggle_asset_produced() {
        let provider = ScriptedProvider::replies(&[
            &analysis_json(),
            &design_json(),
            &content_html(),
        ]);
        let pipeline = SitePipeline::new(provider, SiteConfig::default());

        let site = pipeline.generate(&Repository::new("demo")).await.unwrap();
        assert!(site.assets.iter().any(|a| a.path == "assets/theme.js"));
    }
}
