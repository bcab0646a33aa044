//! Configuration
//!
//! Pre-resolved site configuration with full defaults. File/env loading is
//! left to the embedding application.

mod types;

pub use types::{
    AiConfig, AiVendor, ChangeFreq, ContributorsConfig, PromptsConfig, QualityMode, RobotsConfig,
    SeoConfig, SiteConfig, SitemapConfig, ThemeConfig, ThemeMode,
};
