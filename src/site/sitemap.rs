//! Sitemap Generation
//!
//! Deterministic sitemap.xml emission: one `<url>` entry per `.html` page.
//! Path mapping: `index.html` is the bare site root, `docs/index.html` the
//! directory URL `docs/`, any other `about.html` drops its extension.

use chrono::Utc;

use crate::config::ChangeFreq;
use crate::types::GeneratedPage;

/// Map a relative page path onto its canonical URL under `site_url`
/// (trailing slash already stripped)
fn page_url(site_url: &str, path: &str) -> String {
    if path == "index.html" {
        return site_url.to_string();
    }
    if let Some(dir) = path.strip_suffix("/index.html") {
        return format!("{}/{}/", site_url, dir);
    }
    let bare = path.strip_suffix(".html").unwrap_or(path);
    format!("{}/{}", site_url, bare)
}

/// Generate sitemap.xml content for all `.html` pages
pub fn generate_sitemap(
    pages: &[GeneratedPage],
    site_url: &str,
    changefreq: ChangeFreq,
    priority: f64,
) -> String {
    let site_url = site_url.trim_end_matches('/');
    let lastmod = Utc::now().format("%Y-%m-%d");

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for page in pages.iter().filter(|p| p.path.ends_with(".html")) {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            page_url(site_url, &page.path),
            lastmod,
            changefreq,
            priority,
        ));
    }

    xml.push_str("</urlset>\n");
    xml
}

// =============================================================================
// Tests
// =============================================================================
