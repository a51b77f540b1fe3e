// Export a workbook of current headlines.
//
// One CSV sheet per source, three columns: Title, URL, Keywords. This is
// the survey counterpart to `collect` — it records what each site is
// running right now without persisting bodies.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::pipeline::collect::fetch_all;
use crate::sources::article::Article;
use crate::sources::client::HttpClient;
use crate::sources::{discover, registry, Source};

#[derive(Serialize)]
struct SheetRow<'a> {
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "URL")]
    url: &'a str,
    #[serde(rename = "Keywords")]
    keywords: String,
}

/// Fetch every source and write its sheet. Returns the sheet paths.
pub async fn run(
    client: &HttpClient,
    workbook_dir: &Path,
    limit: usize,
    concurrency: usize,
) -> Result<Vec<PathBuf>> {
    survey_sources(client, registry(), workbook_dir, limit, concurrency).await
}

/// The survey loop over an explicit source list. A source whose homepage
/// cannot be indexed is skipped with a warning, the same as `collect` —
/// the remaining sources still get their sheets.
pub async fn survey_sources(
    client: &HttpClient,
    sources: Vec<Source>,
    workbook_dir: &Path,
    limit: usize,
    concurrency: usize,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(workbook_dir)
        .with_context(|| format!("Failed to create workbook directory {}", workbook_dir.display()))?;

    let mut sheets = Vec::new();
    for source in sources {
        println!("Surveying {}...", source.brand);

        let urls = match discover::discover_urls(client, &source, limit).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(brand = source.brand, error = %e, "Failed to list articles, skipping source");
                continue;
            }
        };
        let articles = fetch_all(client, &source, &urls, concurrency).await;

        let path = workbook_dir.join(format!("{}.csv", source.brand));
        write_sheet(&path, &articles)?;
        info!(brand = source.brand, rows = articles.len(), sheet = %path.display(), "Sheet written");
        sheets.push(path);
    }

    Ok(sheets)
}

/// Write one source's sheet: a header row, then Title / URL / Keywords
/// per article. Keywords are joined with "; " so they stay one cell.
pub fn write_sheet(path: &Path, articles: &[Article]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create sheet {}", path.display()))?;

    for article in articles {
        writer.serialize(SheetRow {
            title: &article.title,
            url: &article.url,
            keywords: article.keywords.join("; "),
        })?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush sheet {}", path.display()))?;

    Ok(())
}
