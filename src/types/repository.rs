//! Repository Data Port Types
//!
//! Input shape supplied by an external repository collector (hosting API,
//! local clone, webhook payload). The pipeline only reads these; it never
//! fetches repository data itself.

use serde::{Deserialize, Serialize};

/// Repository facts fed into every stage prompt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name
    pub name: String,

    /// Short description, if the host provides one
    #[serde(default)]
    pub description: Option<String>,

    /// Primary language as reported by the host
    #[serde(default)]
    pub language: Option<String>,

    /// Topic tags
    #[serde(default)]
    pub topics: Vec<String>,

    /// Raw README content; truncated to a fixed budget before prompting
    #[serde(default)]
    pub readme: Option<String>,

    /// Aggregate statistics, if collected
    #[serde(default)]
    pub stats: Option<RepoStats>,

    /// Contributor list, if collected
    #[serde(default)]
    pub contributors: Vec<Contributor>,
}

impl Repository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Aggregate repository statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RepoStats {
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default)]
    pub open_issues: u64,
}

/// A single contributor as reported by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub contributions: u64,
}
