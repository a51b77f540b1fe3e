// News source registry.
//
// Each source is a text-oriented news site with three CSS selectors: one
// to discover article links on the homepage, and two to pull the headline
// and body paragraphs out of an article page. The registry is fixed —
// this tool runs once, end-to-end, against a small known set of sites.

pub mod article;
pub mod client;
pub mod discover;

use anyhow::{anyhow, Result};
use scraper::Selector;

/// A configured news site.
pub struct Source {
    /// Short name used for directory and sheet names (e.g. "cnn")
    pub brand: &'static str,
    /// Homepage crawled for article links
    pub homepage: &'static str,
    /// Selector for article anchors on the homepage
    pub link_selector: &'static str,
    /// Selector for the headline on an article page
    pub title_selector: &'static str,
    /// Selector for the body elements on an article page
    pub body_selector: &'static str,
}

/// The builtin registry: text-only or lightweight site variants whose
/// markup is small and stable enough to scrape with plain selectors.
pub fn registry() -> Vec<Source> {
    vec![
        Source {
            brand: "cnn",
            homepage: "https://lite.cnn.com",
            link_selector: ".card--lite a[href]",
            title_selector: ".headline--lite",
            body_selector: ".article--lite p",
        },
        Source {
            brand: "npr",
            homepage: "https://text.npr.org",
            link_selector: "ul li a[href]",
            title_selector: "h1",
            body_selector: ".paragraphs-container p",
        },
        Source {
            brand: "apnews",
            homepage: "https://apnews.com",
            link_selector: "a[href*='/article/']",
            title_selector: "h1",
            body_selector: ".RichTextStoryBody p",
        },
    ]
}

/// Parse a CSS selector, converting scraper's borrowed error into an
/// owned anyhow error so it can cross function boundaries.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_selectors_parse() {
        for source in registry() {
            assert!(selector(source.link_selector).is_ok(), "{}", source.brand);
            assert!(selector(source.title_selector).is_ok(), "{}", source.brand);
            assert!(selector(source.body_selector).is_ok(), "{}", source.brand);
        }
    }

    #[test]
    fn registry_brands_unique() {
        let brands: Vec<_> = registry().iter().map(|s| s.brand).collect();
        let mut deduped = brands.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(brands.len(), deduped.len());
    }
}
