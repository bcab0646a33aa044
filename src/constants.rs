//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Prompt construction constants
pub mod prompt {
    /// Maximum README characters included in any stage prompt.
    /// Longer READMEs are truncated, never sent in full.
    pub const README_CHAR_BUDGET: usize = 2000;

    /// Soft limit for user-supplied site instructions; exceeding it logs a
    /// warning but does not fail validation
    pub const SITE_INSTRUCTIONS_SOFT_LIMIT: usize = 2000;
}

/// Retry wrapper constants
pub mod retry {
    /// Default maximum attempts (first call plus retries)
    pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 2000;

    /// Backoff multiplier
    pub const BACKOFF_FACTOR: f32 = 2.0;
}

/// Rendered artifact validation constants
pub mod artifact {
    /// Minimum length for a rendered page; anything shorter is treated as an
    /// empty or invalid model response
    pub const MIN_HTML_LENGTH: usize = 100;

    /// Tailwind CDN script injected into pages missing a framework include
    pub const TAILWIND_CDN_SCRIPT: &str = r#"<script src="https://cdn.tailwindcss.com"></script>"#;
}

/// Self-Refine loop constants
pub mod refine {
    /// Target quality score on the 0-10 evaluation scale
    pub const DEFAULT_TARGET_SCORE: f64 = 8.0;

    /// Maximum improve cycles per run
    pub const DEFAULT_MAX_ITERATIONS: usize = 3;
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Default maximum output tokens per generation call
    pub const DEFAULT_MAX_OUTPUT_TOKENS: usize = 8192;
}
