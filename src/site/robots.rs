//! robots.txt Generation
//!
//! Always emits the permissive `User-agent: *` / `Allow: /` preamble, a
//! `Sitemap:` line when requested and a site URL is known, and any non-blank
//! configured extra rules.

/// Generate robots.txt content
pub fn generate_robots(
    site_url: Option<&str>,
    include_sitemap: bool,
    additional_rules: &[String],
) -> String {
    let mut robots = String::from("User-agent: *\nAllow: /\n");

    if include_sitemap
        && let Some(url) = site_url
    {
        robots.push_str(&format!("\nSitemap: {}/sitemap.xml\n", url.trim_end_matches('/')));
    }

    let rules: Vec<&str> = additional_rules
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();

    if !rules.is_empty() {
        robots.push('\n');
        for rule in rules {
            robots.push_str(rule);
            robots.push('\n');
        }
    }

    robots
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_emits_preamble() {
        let robots = generate_robots(None, true, &[]);
        assert!(robots.starts_with("User-agent: *\nAllow: /\n"));
        assert!(!robots.contains("Sitemap:"));
    }

    #[test]
    fn test_sitemap_line_iff_enabled() {
        let with = generate_robots(Some("https://example.com/"), true, &[]);
        assert!(with.contains("Sitemap: https://example.com/sitemap.xml"));

        let without = generate_robots(Some("https://example.com"), false, &[]);
        assert!(!without.contains("Sitemap:"));
    }

    #[test]
    fn test_only_non_blank_rules_appended() {
        let rules = vec![
            "Disallow: /drafts".to_string(),
            "   ".to_string(),
            String::new(),
            "Disallow: /private".to_string(),
        ];
        let robots = generate_robots(None, true, &rules);
        assert!(robots.contains("Disallow: /drafts\n"));
        assert!(robots.contains("Disallow: /private\n"));
        assert_eq!(robots.lines().filter(|l| l.starts_with("Disallow")).count(), 2);
    }
}
