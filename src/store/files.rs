// Filesystem article store.
//
// Layout: <root>/<brand>/<title>.txt, directories auto-created. File
// content is the article body followed by a keyword footer. Listing is
// sorted (brand, then filename) so the document-term matrix built from
// the store is deterministic across runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::sources::article::Article;

/// Bodies at or below this length are treated as "update" stubs and
/// silently dropped.
pub const MIN_BODY_LEN: usize = 500;

/// A persisted article file, addressed by its title-derived name.
#[derive(Debug, Clone)]
pub struct StoredArticle {
    /// Title-derived name (filename without the .txt extension)
    pub name: String,
    /// Source directory name this article came from
    pub brand: String,
    pub path: PathBuf,
}

/// Turn an article title into a safe filename stem.
///
/// Path separators, control characters, and other filesystem-hostile
/// punctuation become spaces; whitespace runs collapse; the result is
/// capped at 120 characters so long headlines stay within filename
/// limits.
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => ' ',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(120)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Persist one article under its source's directory.
///
/// Returns `Ok(None)` when the body fails the minimum-length heuristic;
/// the caller counts these but they are not errors. An article with an
/// empty title or body is an error — the store invariant is that every
/// persisted file has both.
pub fn write_article(
    root: &Path,
    brand: &str,
    article: &Article,
    min_body_len: usize,
) -> Result<Option<PathBuf>> {
    if article.title.trim().is_empty() {
        anyhow::bail!("refusing to store article with empty title: {}", article.url);
    }
    if article.body.trim().is_empty() {
        anyhow::bail!("refusing to store article with empty body: {}", article.url);
    }

    if article.body.len() <= min_body_len {
        debug!(
            url = article.url,
            bytes = article.body.len(),
            "Body below minimum length, skipping"
        );
        return Ok(None);
    }

    let dir = root.join(brand);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create article directory {}", dir.display()))?;

    let name = sanitize_title(&article.title);
    if name.is_empty() {
        anyhow::bail!("title sanitized to nothing: {:?}", article.title);
    }
    let path = dir.join(format!("{name}.txt"));

    let mut content = article.body.clone();
    content.push_str("\n\nKeywords: ");
    content.push_str(&article.keywords.join(", "));
    content.push('\n');

    fs::write(&path, content)
        .with_context(|| format!("Failed to write article file {}", path.display()))?;

    Ok(Some(path))
}

/// Enumerate every persisted article, sorted by brand then filename.
pub fn list_articles(root: &Path) -> Result<Vec<StoredArticle>> {
    let mut articles = Vec::new();

    if !root.exists() {
        return Ok(articles);
    }

    let mut brands: Vec<PathBuf> = fs::read_dir(root)
        .with_context(|| format!("Failed to read article root {}", root.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    brands.sort();

    for brand_dir in brands {
        let brand = brand_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut files: Vec<PathBuf> = fs::read_dir(&brand_dir)
            .with_context(|| format!("Failed to read {}", brand_dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        files.sort();

        for path in files {
            let name = path
                .file_stem()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            articles.push(StoredArticle {
                name,
                brand: brand.clone(),
                path,
            });
        }
    }

    Ok(articles)
}

/// Read a stored article file back as text.
pub fn read_article(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read article file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_hostile_characters() {
        assert_eq!(
            sanitize_title("Breaking: markets / rally \"again\"?"),
            "Breaking markets rally again"
        );
    }

    #[test]
    fn sanitize_collapses_whitespace() {
        assert_eq!(sanitize_title("  two   words \n here "), "two words here");
    }

    #[test]
    fn sanitize_caps_length() {
        let long = "word ".repeat(100);
        assert!(sanitize_title(&long).len() <= 120);
    }
}
