//! Response Validation
//!
//! Turns raw provider text into typed stage outputs or classified failures.
//!
//! ## Modules
//!
//! - `json_repair`: fence stripping, bracket extraction, structural repair
//! - `schema`: typed extraction with per-field fallback-vs-required policy
//! - `artifact`: rendered artifact (HTML) length and structure checks
//!
//! The defining contract of this layer is the field-level policy: fields with
//! a defined default (analysis enums) coerce to that default with a recorded
//! warning, while structurally-required fields (design palettes, typography)
//! fail the whole stage when absent even though the JSON parsed.

pub mod artifact;
pub mod json_repair;
pub mod schema;

pub use artifact::{ArtifactOutcome, parse_rendered_artifact};
pub use json_repair::{JsonRepairer, extract_json};
pub use schema::{parse_analysis, parse_design_system, parse_evaluation};

use std::fmt;

/// Severity levels for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Warning - response usable but degraded quality
    Warning,
    /// Info - observation that doesn't affect usability
    Info,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSeverity::Warning => write!(f, "WARN"),
            IssueSeverity::Info => write!(f, "INFO"),
        }
    }
}

/// A single non-fatal validation issue recorded during extraction or repair
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub message: String,
    pub field: Option<String>,
}

impl ValidationIssue {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: message.into(),
            field: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Info,
            message: message.into(),
            field: None,
        }
    }

    pub fn at(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{}] {}: {}", self.severity, field, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}
