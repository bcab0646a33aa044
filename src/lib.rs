//! SiteSmith - AI-Driven Static Site Generator
//!
//! Generates a polished static landing site for a code repository by running
//! a fixed LLM pipeline: analyze the repository, derive a design system,
//! render the page, optionally self-refine it, and assemble the final site
//! with its deterministic artifacts (sitemap, robots.txt, contributors page,
//! theme script).
//!
//! ## Core Features
//!
//! - **Fixed Pipeline**: Analyze -> Design -> Content -> (Refine) -> Assemble
//! - **Provider Port**: Anthropic, OpenAI, and Google backends behind one trait
//! - **Response Repair**: JSON extraction and structural repair of LLM output
//! - **Self-Refine**: bounded Evaluate/Improve loop in high quality mode
//! - **Bounded Retry**: exponential backoff for transient provider faults only
//!
//! ## Quick Start
//!
//! ```ignore
//! use sitesmith::{Repository, SiteConfig, SitePipeline};
//! use sitesmith::ai::provider::{create_provider, ProviderConfig};
//!
//! let config = SiteConfig::default();
//! let provider = create_provider(&ProviderConfig::default())?;
//! let pipeline = SitePipeline::new(provider, config);
//! let site = pipeline.generate(&repository).await?;
//! for page in &site.pages {
//!     std::fs::write(&page.path, &page.html)?;
//! }
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: provider abstraction, retry wrapper, response validation
//! - [`pipeline`]: stage orchestration, prompt construction, Self-Refine
//! - [`site`]: deterministic assembly of the final site manifest
//! - [`config`]: generation settings and validation
//! - [`types`]: domain model and the unified error type

pub mod ai;
pub mod config;
pub mod constants;
pub mod logging;
pub mod pipeline;
pub mod site;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{AiVendor, QualityMode, SiteConfig, ThemeMode};

// Error Types
pub use types::{ErrorCategory, Result, SiteError, Stage};

// Domain Model
pub use types::{
    Contributor, DesignSystem, GeneratedPage, GeneratedSite, RefinementResult, Repository,
    RepositoryAnalysis,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{SelfRefineLoop, SitePipeline};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::provider::{
    GenerateRequest, GenerateResponse, LlmProvider, ProviderConfig, SharedProvider, TaskKind,
    create_provider,
};
pub use ai::retry::{RetryPolicy, with_retry};
