//! Unified Error Type System
//!
//! Centralized error types for the generation pipeline.
//! Provides error classification for retry decisions.
//!
//! ## Error Taxonomy
//!
//! - **Provider**: failures from the AI provider port, carrying a category
//!   that decides whether the retry wrapper may re-attempt the call
//! - **MalformedResponse**: provider text could not be reduced to valid
//!   structured data even after repair; the cleaned text is attached
//! - **StructuralValidation**: JSON parsed but a structurally-required field
//!   is absent (no safe default exists)
//! - **ArtifactQuality**: rendered artifact is empty or under-length
//! - **Stage**: wraps any of the above with the failing stage's name so a
//!   caller can identify which of Analyze/Design/Content/Refine failed
//!
//! Non-critical enum/field mismatches are *not* errors - they resolve to a
//! default and surface as validation warnings.

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Provider error categories for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited - wait then retry
    RateLimit,
    /// Network/connectivity issues - retry with backoff
    Network,
    /// Temporary server issues (5xx) - retry
    Transient,
    /// Authentication failed - fail fast, don't retry
    Auth,
    /// Invalid request - don't retry, fix request
    BadRequest,
    /// Unknown error - don't retry
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Network => write!(f, "NETWORK"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Auth => write!(f, "AUTH"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimit | Self::Network | Self::Transient)
    }

    /// Classify an HTTP status code from a provider API
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimit,
            401 | 403 => Self::Auth,
            400 | 404 | 422 => Self::BadRequest,
            500..=599 => Self::Transient,
            _ => Self::Unknown,
        }
    }
}

// =============================================================================
// Pipeline Stages
// =============================================================================

/// The ordered stages of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Analyze,
    Design,
    Content,
    Refine,
}

impl Stage {
    /// Prefix attached to errors originating in this stage
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            Stage::Analyze => "Repository analysis failed",
            Stage::Design => "Design system generation failed",
            Stage::Content => "Content generation failed",
            Stage::Refine => "Refinement failed",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Analyze => write!(f, "analyze"),
            Stage::Design => write!(f, "design"),
            Stage::Content => write!(f, "content"),
            Stage::Refine => write!(f, "refine"),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum SiteError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Provider Errors
    // -------------------------------------------------------------------------
    /// Failure from the AI provider port with retry classification
    #[error("[{category}] {message}")]
    Provider {
        category: ErrorCategory,
        message: String,
    },

    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    /// Response could not be reduced to valid structured data after repair
    #[error("AI returned malformed response: {message}")]
    MalformedResponse {
        message: String,
        /// Cleaned text retained for diagnostics
        cleaned: String,
    },

    /// A structurally-required field is missing from an otherwise valid response
    #[error("missing required field '{field}': {message}")]
    StructuralValidation { field: String, message: String },

    /// Rendered artifact is empty or below the minimum length
    #[error("{0}")]
    ArtifactQuality(String),

    // -------------------------------------------------------------------------
    // Pipeline Errors
    // -------------------------------------------------------------------------
    /// A stage failure, prefixed with the stage name for caller diagnostics
    #[error("{}: {source}", stage.failure_prefix())]
    Stage {
        stage: Stage,
        #[source]
        source: Box<SiteError>,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl SiteError {
    /// Create a provider error with category
    pub fn provider(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self::Provider {
            category,
            message: message.into(),
        }
    }

    /// Create a malformed-response error, attaching the cleaned text
    pub fn malformed(message: impl Into<String>, cleaned: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
            cleaned: cleaned.into(),
        }
    }

    /// Create a structural-validation error for a required field
    pub fn missing_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StructuralValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wrap an error with the stage it occurred in
    pub fn in_stage(self, stage: Stage) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Check if this error may succeed on retry of the same provider call.
    /// Validation failures are deterministic and never retryable.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Provider { category, .. } => category.is_retryable(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;

// =============================================================================
// Tests
// =============================================================================
