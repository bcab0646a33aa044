//! JSON Repair Mechanism
//!
//! Unified JSON extraction and repair for LLM responses.
//!
//! Handles common LLM JSON output issues:
//! - Markdown code fence wrapping (```json ... ```)
//! - Prose before/after the JSON body
//! - Unquoted object keys and single-quoted strings
//! - Trailing commas
//! - Literal control characters and stray backslashes inside strings
//! - Truncated objects missing closing brackets
//!
//! Steps are ordered and each is applied only if the previous one left the
//! content unparsed: fence stripping, bracket-boundary extraction, structural
//! repair, strict parse. A failure after all steps surfaces the cleaned text
//! for diagnostics rather than silently discarding it.

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{Result, SiteError};

/// Extract and parse JSON from an LLM response
///
/// This is the primary entry point for parsing LLM JSON output.
pub fn extract_json(content: &str) -> Result<Value> {
    let repairer = JsonRepairer::new();
    repairer.parse_or_repair(content).map(|(value, _)| value)
}

/// JSON repair strategies
pub struct JsonRepairer;

impl Default for JsonRepairer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonRepairer {
    pub fn new() -> Self {
        Self
    }

    /// Parse JSON, attempting extraction and repair if strict parse fails
    ///
    /// Returns (Value, was_repaired)
    pub fn parse_or_repair(&self, raw: &str) -> Result<(Value, bool)> {
        let cleaned = self.preprocess(raw);

        if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
            return Ok((value, false));
        }

        // Discard prose around the outermost bracket pair
        debug!("Strict JSON parse failed, extracting bracket span");
        let bounded = self
            .extract_bracket_span(&cleaned)
            .unwrap_or_else(|| cleaned.clone());

        if let Ok(value) = serde_json::from_str::<Value>(&bounded) {
            warn!("JSON recovered by bracket-boundary extraction");
            return Ok((value, true));
        }

        // Structural repair pass
        let repaired = self.structural_repair(&bounded);

        match serde_json::from_str::<Value>(&repaired) {
            Ok(value) => {
                warn!("JSON recovered by structural repair");
                Ok((value, true))
            }
            Err(e) => Err(SiteError::malformed(
                format!("not valid JSON after repair: {}", e),
                bounded,
            )),
        }
    }

    /// Strip code fences, BOM, and surrounding whitespace
    fn preprocess(&self, raw: &str) -> String {
        let mut s = raw.trim();

        s = s.trim_start_matches('\u{feff}');

        // Remove ```json ... ``` or bare ``` ... ```
        if s.starts_with("```") {
            s = match s.find('\n') {
                Some(idx) => &s[idx + 1..],
                None => s.trim_start_matches('`'),
            };
        }
        if s.ends_with("```") {
            s = s[..s.len() - 3].trim_end();
        }

        s.trim().to_string()
    }

    /// Locate the outermost matching bracket pair by first opener and last
    /// matching closer, discarding any prose before/after
    fn extract_bracket_span(&self, s: &str) -> Option<String> {
        let start = s.find(['{', '['])?;
        let open = s[start..].chars().next()?;
        let close = if open == '{' { '}' } else { ']' };

        let end = s.rfind(close)?;
        if end <= start {
            return None;
        }

        Some(s[start..=end].to_string())
    }

    /// Full structural repair pass over extracted text
    fn structural_repair(&self, s: &str) -> String {
        let mut result = self.quote_unquoted_keys(s);
        result = self.normalize_single_quotes(&result);
        result = self.escape_string_contents(&result);
        result = self.fix_trailing_commas(&result);
        self.balance_brackets(&result)
    }

    /// Quote bare object keys (`{key: 1}` becomes `{"key": 1}`)
    fn quote_unquoted_keys(&self, s: &str) -> String {
        let chars: Vec<char> = s.chars().collect();
        let mut result = String::with_capacity(s.len() + 16);
        let mut in_string = false;
        let mut escape = false;

        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];

            if in_string {
                result.push(ch);
                if escape {
                    escape = false;
                } else if ch == '\\' {
                    escape = true;
                } else if ch == '"' {
                    in_string = false;
                }
                i += 1;
                continue;
            }

            match ch {
                '"' => {
                    in_string = true;
                    result.push(ch);
                    i += 1;
                }
                '{' | ',' => {
                    result.push(ch);
                    i += 1;

                    // Preserve whitespace between the delimiter and the key
                    while i < chars.len() && chars[i].is_whitespace() {
                        result.push(chars[i]);
                        i += 1;
                    }

                    // Bare identifier followed by ':' is an unquoted key
                    let key_start = i;
                    while i < chars.len()
                        && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '-')
                    {
                        i += 1;
                    }

                    if i > key_start {
                        let mut j = i;
                        while j < chars.len() && chars[j].is_whitespace() {
                            j += 1;
                        }
                        let key: String = chars[key_start..i].iter().collect();
                        if j < chars.len() && chars[j] == ':' {
                            result.push('"');
                            result.push_str(&key);
                            result.push('"');
                        } else {
                            result.push_str(&key);
                        }
                    }
                }
                _ => {
                    result.push(ch);
                    i += 1;
                }
            }
        }

        result
    }

    /// Convert single-quoted strings to double-quoted JSON strings
    fn normalize_single_quotes(&self, s: &str) -> String {
        let chars: Vec<char> = s.chars().collect();
        let mut result = String::with_capacity(s.len());
        let mut in_double = false;
        let mut escape = false;

        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];

            if in_double {
                result.push(ch);
                if escape {
                    escape = false;
                } else if ch == '\\' {
                    escape = true;
                } else if ch == '"' {
                    in_double = false;
                }
                i += 1;
                continue;
            }

            match ch {
                '"' => {
                    in_double = true;
                    result.push(ch);
                    i += 1;
                }
                '\'' => {
                    // Capture until the closing unescaped single quote
                    result.push('"');
                    i += 1;
                    while i < chars.len() {
                        let c = chars[i];
                        if c == '\\' && i + 1 < chars.len() && chars[i + 1] == '\'' {
                            result.push('\'');
                            i += 2;
                        } else if c == '\'' {
                            i += 1;
                            break;
                        } else {
                            if c == '"' {
                                result.push('\\');
                            }
                            result.push(c);
                            i += 1;
                        }
                    }
                    result.push('"');
                }
                _ => {
                    result.push(ch);
                    i += 1;
                }
            }
        }

        result
    }

    /// Escape literal control characters and stray backslashes inside string
    /// values. Valid escape sequences are preserved.
    fn escape_string_contents(&self, s: &str) -> String {
        let chars: Vec<char> = s.chars().collect();
        let mut result = String::with_capacity(s.len() + 16);
        let mut in_string = false;

        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];

            if !in_string {
                if ch == '"' {
                    in_string = true;
                }
                result.push(ch);
                i += 1;
                continue;
            }

            match ch {
                '"' => {
                    in_string = false;
                    result.push(ch);
                    i += 1;
                }
                '\\' => {
                    let next = chars.get(i + 1).copied();
                    match next {
                        Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u') => {
                            result.push('\\');
                            result.push(next.unwrap_or_default());
                            i += 2;
                        }
                        _ => {
                            // Stray backslash - double it
                            result.push_str("\\\\");
                            i += 1;
                        }
                    }
                }
                '\n' => {
                    result.push_str("\\n");
                    i += 1;
                }
                '\t' => {
                    result.push_str("\\t");
                    i += 1;
                }
                '\r' => {
                    result.push_str("\\r");
                    i += 1;
                }
                c if c.is_control() => {
                    // Other control characters have no useful escape - drop
                    i += 1;
                }
                _ => {
                    result.push(ch);
                    i += 1;
                }
            }
        }

        result
    }

    /// Remove trailing commas before ] or }
    fn fix_trailing_commas(&self, s: &str) -> String {
        let chars: Vec<char> = s.chars().collect();
        let mut result = String::with_capacity(s.len());
        let mut in_string = false;
        let mut escape = false;

        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];

            if in_string {
                result.push(ch);
                if escape {
                    escape = false;
                } else if ch == '\\' {
                    escape = true;
                } else if ch == '"' {
                    in_string = false;
                }
                i += 1;
                continue;
            }

            if ch == '"' {
                in_string = true;
                result.push(ch);
                i += 1;
                continue;
            }

            if ch == ',' {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && (chars[j] == ']' || chars[j] == '}') {
                    i += 1;
                    continue;
                }
            }

            result.push(ch);
            i += 1;
        }

        result
    }

    /// Balance brackets by closing unterminated strings and appending
    /// missing closers in reverse nesting order (truncated model output)
    fn balance_brackets(&self, s: &str) -> String {
        let mut result = s.to_string();

        let mut stack: Vec<char> = Vec::new();
        let mut in_string = false;
        let mut escape = false;

        for ch in result.chars() {
            if escape {
                escape = false;
                continue;
            }

            match ch {
                '\\' if in_string => escape = true,
                '"' => in_string = !in_string,
                '{' | '[' if !in_string => stack.push(ch),
                '}' if !in_string => {
                    if stack.last() == Some(&'{') {
                        stack.pop();
                    }
                }
                ']' if !in_string => {
                    if stack.last() == Some(&'[') {
                        stack.pop();
                    }
                }
                _ => {}
            }
        }

        if in_string {
            result.push('"');
        }
        while let Some(open) = stack.pop() {
            result.push(if open == '{' { '}' } else { ']' });
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_valid_json() {
        let repairer = JsonRepairer::new();
        let (_, repaired) = repairer.parse_or_repair(r#"{"key": "value"}"#).unwrap();
        assert!(!repaired);
    }

    #[test]
    fn test_json_fence_yields_identical_object() {
        let repairer = JsonRepairer::new();
        let plain = r#"{"name": "demo", "features": ["a", "b"]}"#;
        let fenced = format!("```json\n{}\n```", plain);
        let bare_fenced = format!("```\n{}\n```", plain);

        let (expected, _) = repairer.parse_or_repair(plain).unwrap();
        let (from_fence, _) = repairer.parse_or_repair(&fenced).unwrap();
        let (from_bare, _) = repairer.parse_or_repair(&bare_fenced).unwrap();

        assert_eq!(expected, from_fence);
        assert_eq!(expected, from_bare);
    }

    #[test]
    fn test_prose_around_json_is_discarded() {
        let repairer = JsonRepairer::new();
        let input = r##"Here's the design you asked for:
{"colors": {"light": {"background": "#fff"}}}
Let me know if you need changes!"##;
        let (value, repaired) = repairer.parse_or_repair(input).unwrap();
        assert!(repaired);
        assert_eq!(value["colors"]["light"]["background"], "#fff");
    }

    #[test]
    fn test_unquoted_keys_are_quoted() {
        let repairer = JsonRepairer::new();
        let input = r#"{name: "demo", project_type: "tool"}"#;
        let (value, repaired) = repairer.parse_or_repair(input).unwrap();
        assert!(repaired);
        assert_eq!(value["name"], "demo");
        assert_eq!(value["project_type"], "tool");
    }

    #[test]
    fn test_single_quoted_values_normalized() {
        let repairer = JsonRepairer::new();
        let input = r#"{"style": 'minimal', "audience": 'developers'}"#;
        let (value, _) = repairer.parse_or_repair(input).unwrap();
        assert_eq!(value["style"], "minimal");
        assert_eq!(value["audience"], "developers");
    }

    #[test]
    fn test_fix_trailing_comma() {
        let repairer = JsonRepairer::new();
        let input = r#"{"features": ["fast", "typed",], }"#;
        let (value, repaired) = repairer.parse_or_repair(input).unwrap();
        assert!(repaired);
        assert_eq!(value["features"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_literal_newline_inside_string() {
        let repairer = JsonRepairer::new();
        let input = "{\"description\": \"line one\nline two\"}";
        let (value, _) = repairer.parse_or_repair(input).unwrap();
        assert_eq!(value["description"], "line one\nline two");
    }

    #[test]
    fn test_stray_backslash_escaped() {
        let repairer = JsonRepairer::new();
        let input = r#"{"path": "C:\Users\demo"}"#;
        let (value, _) = repairer.parse_or_repair(input).unwrap();
        assert_eq!(value["path"], r"C:\Users\demo");
    }

    #[test]
    fn test_truncated_object_balanced() {
        let repairer = JsonRepairer::new();
        let input = r#"{"pages": [{"path": "index.html""#;
        let (value, repaired) = repairer.parse_or_repair(input).unwrap();
        assert!(repaired);
        assert!(value["pages"].is_array());
    }

    #[test]
    fn test_truncation_inside_nested_array_closes_in_order() {
        let repairer = JsonRepairer::new();
        // Cut off mid-string inside an object inside an array: closers must
        // come out as "}]}" to match the nesting, not "]}}"
        let input = r#"{"features": [{"title": "fast", "detail": "zero-co"#;
        let (value, repaired) = repairer.parse_or_repair(input).unwrap();
        assert!(repaired);
        assert_eq!(value["features"][0]["title"], "fast");
        assert_eq!(value["features"][0]["detail"], "zero-co");
    }

    #[test]
    fn test_hopeless_input_surfaces_cleaned_text() {
        let repairer = JsonRepairer::new();
        let err = repairer.parse_or_repair("no json here at all").unwrap_err();
        match err {
            SiteError::MalformedResponse { cleaned, .. } => {
                assert!(cleaned.contains("no json here"));
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    proptest! {
        // Fence-wrapping any valid JSON object must parse to the same value
        #[test]
        fn prop_fenced_equals_unfenced(
            key in "[a-z_]{1,12}",
            text in "[a-zA-Z0-9 ]{0,40}",
            num in -1000i64..1000,
        ) {
            let value = serde_json::json!({ key.clone(): text, "n": num });
            let plain = serde_json::to_string(&value).unwrap();
            let fenced = format!("```json\n{}\n```", plain);

            let repairer = JsonRepairer::new();
            let (parsed, _) = repairer.parse_or_repair(&fenced).unwrap();
            prop_assert_eq!(parsed, value);
        }
    }
}
