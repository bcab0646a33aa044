//! Rendered Artifact Validation
//!
//! Length and structure checks for stage outputs that are page text rather
//! than JSON. Unlike structured responses, a degraded HTML artifact is
//! repaired in place: truncated documents get their missing closing tags
//! appended with a recorded warning instead of failing the stage. Only empty
//! or under-length output is fatal.

use tracing::warn;

use super::ValidationIssue;
use crate::constants::artifact as artifact_constants;
use crate::types::{Result, SiteError};

/// Outcome of artifact validation: the (possibly repaired) page text plus any
/// warnings recorded along the way
#[derive(Debug, Clone)]
pub struct ArtifactOutcome {
    pub html: String,
    pub issues: Vec<ValidationIssue>,
}

/// Validate and repair a rendered HTML artifact.
///
/// Fails with `ArtifactQuality` when the response is empty or shorter than
/// `min_length` after fence stripping. Structural repair (closing tags,
/// framework script injection) never fails - it records warnings.
pub fn parse_rendered_artifact(raw: &str, min_length: usize) -> Result<ArtifactOutcome> {
    let mut html = strip_fences(raw).trim().to_string();

    if html.len() < min_length {
        return Err(SiteError::ArtifactQuality(format!(
            "AI returned empty or invalid response ({} chars, minimum {})",
            html.len(),
            min_length
        )));
    }

    let mut issues = Vec::new();
    close_root_tags(&mut html, &mut issues);
    inject_tailwind(&mut html, &mut issues);

    for issue in &issues {
        warn!("{}", issue);
    }

    Ok(ArtifactOutcome { html, issues })
}

/// Strip a surrounding markdown fence (```html ... ``` or bare ```)
fn strip_fences(raw: &str) -> &str {
    let mut s = raw.trim();

    if s.starts_with("```") {
        s = match s.find('\n') {
            Some(idx) => &s[idx + 1..],
            None => s.trim_start_matches('`'),
        };
    }
    if s.ends_with("```") {
        s = s[..s.len() - 3].trim_end();
    }

    s
}

/// Append missing `</body>` / `</html>` tags on truncated documents
fn close_root_tags(html: &mut String, issues: &mut Vec<ValidationIssue>) {
    let lower = html.to_lowercase();

    let has_body_open = lower.contains("<body");
    let has_body_close = lower.contains("</body>");
    let has_html_open = lower.contains("<html");
    let has_html_close = lower.contains("</html>");

    if has_body_open && !has_body_close {
        html.push_str("\n</body>");
        issues.push(ValidationIssue::warning(
            "Artifact truncated: appended missing </body> tag",
        ));
    }

    if has_html_open && !has_html_close {
        html.push_str("\n</html>");
        issues.push(ValidationIssue::warning(
            "Artifact truncated: appended missing </html> tag",
        ));
    }
}

/// Ensure the Tailwind CDN script is present. Pages are generated against
/// Tailwind utility classes; without the script they render unstyled.
fn inject_tailwind(html: &mut String, issues: &mut Vec<ValidationIssue>) {
    if html.contains("cdn.tailwindcss.com") {
        return;
    }

    if find_ignore_ascii_case(html, "<head").is_none() {
        return;
    }

    match find_ignore_ascii_case(html, "</head>") {
        Some(idx) => {
            html.insert_str(
                idx,
                &format!("  {}\n", artifact_constants::TAILWIND_CDN_SCRIPT),
            );
        }
        None => {
            issues.push(ValidationIssue::warning(
                "No </head> tag found, skipping Tailwind script injection",
            ));
        }
    }
}

/// Byte-wise ASCII-case-insensitive substring search. The returned index is
/// valid for the original string; lowercasing a copy would shift offsets for
/// characters whose lowercase form has a different UTF-8 length.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

// =============================================================================
// Tests
// =============================================================================
