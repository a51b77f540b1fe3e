// Run the article collection pipeline.
//
// Strategy: for each registered source, pull article links off the
// homepage, fetch the articles concurrently, then persist them
// sequentially. Fetch and parse failures are per-article and never abort
// the run; short bodies are counted but not stored.

use std::path::Path;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::sources::article::{fetch_article, Article};
use crate::sources::client::HttpClient;
use crate::sources::{discover, registry, Source};
use crate::store;

/// Counters for one collection run, summed across sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectStats {
    /// Article links found on the homepages
    pub discovered: usize,
    /// Articles fetched and parsed
    pub fetched: usize,
    /// Articles written to disk
    pub stored: usize,
    /// Articles dropped by the minimum-body-length filter
    pub skipped_short: usize,
    /// Fetch or parse failures
    pub failed: usize,
}

/// Collect articles from every registered source.
pub async fn run(
    client: &HttpClient,
    article_dir: &Path,
    limit: usize,
    concurrency: usize,
    min_body_len: usize,
) -> Result<CollectStats> {
    let mut stats = CollectStats::default();

    for source in registry() {
        println!("Collecting from {}...", source.brand);

        let urls = match discover::discover_urls(client, &source, limit).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(brand = source.brand, error = %e, "Failed to list articles, skipping source");
                continue;
            }
        };
        stats.discovered += urls.len();

        let articles = fetch_all(client, &source, &urls, concurrency).await;
        stats.fetched += articles.len();
        stats.failed += urls.len() - articles.len();

        let (stored, skipped) =
            persist_articles(article_dir, source.brand, &articles, min_body_len)?;
        stats.stored += stored;
        stats.skipped_short += skipped;

        info!(
            brand = source.brand,
            discovered = urls.len(),
            stored,
            skipped,
            "Source done"
        );
    }

    Ok(stats)
}

/// Fetch a batch of article URLs concurrently. Failures are logged and
/// dropped; the returned list holds only the articles that parsed.
pub async fn fetch_all(
    client: &HttpClient,
    source: &Source,
    urls: &[String],
    concurrency: usize,
) -> Vec<Article> {
    let pb = ProgressBar::new(urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Fetching [{bar:30}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    let results: Vec<Result<Article>> = stream::iter(urls.iter().map(|url| {
        let pb = &pb;
        async move {
            let result = fetch_article(client, source, url).await;
            pb.inc(1);
            result
        }
    }))
    .buffer_unordered(concurrency)
    .collect()
    .await;
    pb.finish_and_clear();

    let mut articles = Vec::new();
    for result in results {
        match result {
            Ok(article) => articles.push(article),
            Err(e) => {
                warn!(error = %e, "Failed to fetch article, skipping");
            }
        }
    }
    articles
}

/// Write fetched articles to the store, one file per article.
///
/// Returns (stored, skipped_short). A write failure for one article is
/// logged and skipped so a bad headline cannot sink the whole batch.
pub fn persist_articles(
    root: &Path,
    brand: &str,
    articles: &[Article],
    min_body_len: usize,
) -> Result<(usize, usize)> {
    let mut stored = 0;
    let mut skipped = 0;

    for article in articles {
        match store::write_article(root, brand, article, min_body_len) {
            Ok(Some(_)) => stored += 1,
            Ok(None) => skipped += 1,
            Err(e) => {
                warn!(url = article.url, error = %e, "Failed to persist article, skipping");
            }
        }
    }

    Ok((stored, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, body_len: usize) -> Article {
        Article {
            title: title.to_string(),
            url: format!("https://example.com/{title}"),
            body: "x".repeat(body_len),
            keywords: vec!["example".to_string()],
        }
    }

    #[test]
    fn persist_counts_stored_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let articles = vec![
            article("long enough", 600),
            article("too short", 100),
            article("also long", 501),
        ];

        let (stored, skipped) =
            persist_articles(dir.path(), "cnn", &articles, store::MIN_BODY_LEN).unwrap();
        assert_eq!(stored, 2);
        assert_eq!(skipped, 1);

        let listed = store::list_articles(dir.path()).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|a| a.brand == "cnn"));
    }

    #[test]
    fn persist_skips_unwritable_articles_without_failing() {
        let dir = tempfile::tempdir().unwrap();
        let articles = vec![
            article("fine", 600),
            // Sanitizes to an empty filename, which write_article rejects
            Article {
                title: "???".to_string(),
                url: "https://example.com/bad".to_string(),
                body: "x".repeat(600),
                keywords: vec![],
            },
        ];

        let (stored, skipped) = persist_articles(dir.path(), "npr", &articles, 500).unwrap();
        assert_eq!(stored, 1);
        assert_eq!(skipped, 0);
    }
}
