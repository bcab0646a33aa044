//! AI Layer
//!
//! Provider port, retry wrapper, and response validation.

pub mod provider;
pub mod retry;
pub mod validation;

pub use provider::{
    GenerateRequest, GenerateResponse, LlmProvider, ProviderConfig, SharedProvider, TaskKind,
    TokenUsage, create_provider,
};
pub use retry::{RetryPolicy, with_retry};
