// Homepage crawling: discover article URLs for one source.
//
// Relative hrefs are resolved against the homepage URL, anchors that
// resolve back to the homepage itself are dropped, and the list is
// deduped (homepages repeat links in nav and card elements) before being
// capped at the per-source limit.

use anyhow::{Context, Result};
use scraper::Html;
use tracing::info;
use url::Url;

use super::client::HttpClient;
use super::{selector, Source};

/// Fetch a source's homepage and extract up to `limit` article URLs.
pub async fn discover_urls(client: &HttpClient, source: &Source, limit: usize) -> Result<Vec<String>> {
    let html = client
        .fetch_html(source.homepage)
        .await
        .with_context(|| format!("Failed to index {}", source.brand))?;

    let urls = extract_links(&html, source, limit)?;

    info!(
        source = source.brand,
        count = urls.len(),
        "Discovered article URLs"
    );

    Ok(urls)
}

/// Pull article links out of homepage HTML. Separated from the fetch so
/// it can be exercised against fixture HTML without a network.
pub fn extract_links(html: &str, source: &Source, limit: usize) -> Result<Vec<String>> {
    let base = Url::parse(source.homepage)
        .with_context(|| format!("Bad homepage URL for {}", source.brand))?;
    let links = selector(source.link_selector)?;

    let document = Html::parse_document(html);
    let mut urls = Vec::new();

    for element in document.select(&links) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href) else {
            continue;
        };
        let resolved = resolved.to_string();
        if resolved.trim_end_matches('/') == source.homepage.trim_end_matches('/') {
            continue;
        }
        if !urls.contains(&resolved) {
            urls.push(resolved);
        }
        if urls.len() >= limit {
            break;
        }
    }

    Ok(urls)
}
