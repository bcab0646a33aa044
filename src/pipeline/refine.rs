//! Self-Refine Loop
//!
//! Bounded fixed-point quality loop: Evaluate -> {Stop | Improve -> Evaluate}.
//! The only mutable state is the current artifact, the last evaluation, and
//! the iteration counter; exit is score >= target or the iteration budget.
//!
//! Refinement is a quality enhancement, not a correctness requirement:
//! failures inside the loop never discard prior good output - the last valid
//! artifact is returned with `improved: false` instead of raising.

use tracing::{info, warn};

use super::prompts;
use crate::ai::provider::{GenerateRequest, SharedProvider, TaskKind};
use crate::ai::validation::{parse_evaluation, parse_rendered_artifact};
use crate::constants::artifact as artifact_constants;
use crate::types::{Evaluation, RefinementResult, Result};

/// Self-Refine loop over one rendered artifact
pub struct SelfRefineLoop {
    provider: SharedProvider,
    target_score: f64,
    max_iterations: usize,
}

impl SelfRefineLoop {
    pub fn new(provider: SharedProvider, target_score: f64, max_iterations: usize) -> Self {
        Self {
            provider,
            target_score,
            max_iterations,
        }
    }

    /// Run the loop. `iterations` in the result counts improve cycles
    /// actually executed; 0 means the first evaluation already met the
    /// target.
    pub async fn run(&self, html: &str, requirements: &str) -> RefinementResult {
        let mut current = html.to_string();
        let mut iterations = 0usize;

        let mut evaluation = match self.evaluate(&current, requirements).await {
            Ok(eval) => eval,
            Err(e) => {
                warn!(error = %e, "Initial evaluation failed, keeping artifact as-is");
                return RefinementResult {
                    html: current,
                    evaluation: unavailable_evaluation(&e.to_string()),
                    iterations: 0,
                    improved: false,
                };
            }
        };

        loop {
            info!(
                score = evaluation.score,
                target = self.target_score,
                iterations,
                "Self-refine evaluation"
            );

            if evaluation.score >= self.target_score {
                return RefinementResult {
                    html: current,
                    evaluation,
                    iterations,
                    improved: true,
                };
            }

            if iterations >= self.max_iterations {
                info!(iterations, "Self-refine iteration budget reached");
                return RefinementResult {
                    html: current,
                    evaluation,
                    iterations,
                    improved: iterations > 0,
                };
            }

            match self.improve(&current, &evaluation, requirements).await {
                Ok(rewritten) => {
                    current = rewritten;
                    iterations += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Improvement call failed, keeping last valid artifact");
                    return RefinementResult {
                        html: current,
                        evaluation,
                        iterations,
                        improved: false,
                    };
                }
            }

            match self.evaluate(&current, requirements).await {
                Ok(eval) => evaluation = eval,
                Err(e) => {
                    warn!(error = %e, "Re-evaluation failed, keeping last valid artifact");
                    return RefinementResult {
                        html: current,
                        evaluation,
                        iterations,
                        improved: false,
                    };
                }
            }
        }
    }

    async fn evaluate(&self, html: &str, requirements: &str) -> Result<Evaluation> {
        let request = GenerateRequest::new(
            TaskKind::Evaluation,
            prompts::evaluation_prompt(html, requirements),
        );
        let response = self.provider.generate_text(&request).await?;
        parse_evaluation(&response.text)
    }

    async fn improve(
        &self,
        html: &str,
        evaluation: &Evaluation,
        requirements: &str,
    ) -> Result<String> {
        let request = GenerateRequest::new(
            TaskKind::Improvement,
            prompts::improvement_prompt(html, evaluation, requirements),
        );
        let response = self.provider.generate_text(&request).await?;
        let outcome =
            parse_rendered_artifact(&response.text, artifact_constants::MIN_HTML_LENGTH)?;
        Ok(outcome.html)
    }
}

fn unavailable_evaluation(reason: &str) -> Evaluation {
    Evaluation {
        score: 0.0,
        feedback: format!("evaluation unavailable: {}", reason),
        strengths: Vec::new(),
        improvements: Vec::new(),
    }
}

// =============================================================================
// Tests
// =============================================================================
