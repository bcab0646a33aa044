//! Core Types
//!
//! Domain model, input port types, and the unified error type.

pub mod error;
pub mod repository;
pub mod site;

pub use error::{ErrorCategory, Result, SiteError, Stage};
pub use repository::{Contributor, RepoStats, Repository};
pub use site::{
    Audience, ColorScheme, ColorSet, DesignSystem, Evaluation, GeneratedPage, GeneratedSite,
    ProjectType, RefinementResult, RepositoryAnalysis, SiteAsset, SiteStyle, Typography,
};
