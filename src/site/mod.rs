//! Site Assembly
//!
//! Deterministic, non-AI folding of generated pages and assets into the final
//! [`GeneratedSite`] shape, plus the prompt-free boilerplate artifacts
//! (contributors page, theme toggle script). Sitemap and robots emission is
//! skipped with a logged reason rather than failing the run when a
//! prerequisite is absent.

mod robots;
mod sitemap;

pub use robots::generate_robots;
pub use sitemap::generate_sitemap;

use tracing::info;

use crate::config::{SiteConfig, ThemeMode};
use crate::types::{Contributor, GeneratedPage, GeneratedSite, SiteAsset};

/// Fold pages and assets into the final site manifest, appending sitemap.xml
/// and robots.txt when configured and possible
pub fn assemble(
    mut pages: Vec<GeneratedPage>,
    assets: Vec<SiteAsset>,
    config: &SiteConfig,
) -> GeneratedSite {
    let site_url = config.seo.site_url.as_deref();

    if !config.sitemap.enabled {
        info!(reason = "disabled", "Skipping sitemap generation");
    } else if let Some(url) = site_url {
        let xml = generate_sitemap(&pages, url, config.sitemap.changefreq, config.sitemap.priority);
        pages.push(GeneratedPage::new("sitemap.xml", xml));
    } else {
        info!(reason = "no site-url", "Skipping sitemap generation");
    }

    if !config.robots.enabled {
        info!(reason = "disabled", "Skipping robots.txt generation");
    } else {
        let include_sitemap = config.sitemap.enabled && site_url.is_some();
        let robots = generate_robots(site_url, include_sitemap, &config.robots.additional_rules);
        pages.push(GeneratedPage::new("robots.txt", robots));
    }

    GeneratedSite {
        pages,
        assets,
        refinement: None,
    }
}

/// Render the deterministic contributors page, capped at `max` entries
pub fn contributors_page(contributors: &[Contributor], max: usize) -> GeneratedPage {
    let mut cards = String::new();
    for contributor in contributors.iter().take(max) {
        let avatar = contributor
            .avatar_url
            .as_deref()
            .map(|url| format!(r#"<img src="{}" alt="{}" class="w-16 h-16 rounded-full">"#, url, contributor.login))
            .unwrap_or_default();
        let name = match contributor.profile_url.as_deref() {
            Some(url) => format!(r#"<a href="{}" class="font-semibold">{}</a>"#, url, contributor.login),
            None => format!(r#"<span class="font-semibold">{}</span>"#, contributor.login),
        };
        cards.push_str(&format!(
            "      <li class=\"flex items-center gap-4 p-4 rounded-lg border\">{}{}<span class=\"text-sm opacity-70\">{} contributions</span></li>\n",
            avatar, name, contributor.contributions
        ));
    }

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Contributors</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="max-w-3xl mx-auto px-4 py-12">
  <main>
    <h1 class="text-3xl font-bold mb-8">Contributors</h1>
    <ul class="space-y-3">
{cards}    </ul>
    <p class="mt-8"><a href="index.html" class="underline">Back to home</a></p>
  </main>
</body>
</html>
"#,
    );

    GeneratedPage::new("contributors.html", html)
}

/// Boilerplate theme toggle script; shares no data with any AI stage
pub fn theme_toggle_script(mode: ThemeMode) -> SiteAsset {
    let content = format!(
        r#"(function () {{
  var mode = "{mode}";
  var stored = localStorage.getItem("theme");
  var prefersDark = window.matchMedia("(prefers-color-scheme: dark)").matches;
  var dark = stored ? stored === "dark" : mode === "dark" || (mode === "auto" && prefersDark);
  document.documentElement.classList.toggle("dark", dark);
  window.toggleTheme = function () {{
    var next = document.documentElement.classList.toggle("dark");
    localStorage.setItem("theme", next ? "dark" : "light");
  }};
}})();
"#,
    );
    SiteAsset {
        path: "assets/theme.js".to_string(),
        content,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeoConfig;

    fn index_page() -> Vec<GeneratedPage> {
        vec![GeneratedPage::new("index.html", "<html></html>")]
    }

    #[test]
    fn test_assemble_with_site_url_appends_sitemap_and_robots() {
        let config = SiteConfig {
            seo: SeoConfig {
                site_url: Some("https://example.com".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let site = assemble(index_page(), vec![], &config);
        let paths: Vec<&str> = site.pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["index.html", "sitemap.xml", "robots.txt"]);

        let robots = &site.pages[2].html;
        assert!(robots.contains("Sitemap: https://example.com/sitemap.xml"));
    }

    #[test]
    fn test_assemble_without_site_url_skips_sitemap_keeps_robots() {
        let site = assemble(index_page(), vec![], &SiteConfig::default());
        let paths: Vec<&str> = site.pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["index.html", "robots.txt"]);
        assert!(!site.pages[1].html.contains("Sitemap:"));
    }

    #[test]
    fn test_assemble_disabled_emits_neither() {
        let mut config = SiteConfig::default();
        config.sitemap.enabled = false;
        config.robots.enabled = false;
        let site = assemble(index_page(), vec![], &config);
        assert_eq!(site.pages.len(), 1);
    }

    #[test]
    fn test_contributors_page_caps_entries() {
        let contributors: Vec<Contributor> = (0u64..10)
            .map(|i| Contributor {
                login: format!("user{}", i),
                avatar_url: None,
                profile_url: Some(format!("https://example.com/user{}", i)),
                contributions: 100 - i,
            })
            .collect();
        let page = contributors_page(&contributors, 5);
        assert_eq!(page.path, "contributors.html");
        assert!(page.html.contains("user4"));
        assert!(!page.html.contains("user5"));
    }

    #[test]
    fn test_theme_toggle_script_embeds_mode() {
        let asset = theme_toggle_script(ThemeMode::Dark);
        assert_eq!(asset.path, "assets/theme.js");
        assert!(asset.content.contains(r#"var mode = "dark";"#));
    }
}
