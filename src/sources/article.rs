// Article download and extraction.
//
// An article must survive all three steps — download, HTML extraction,
// keyword extraction — or the caller skips it. The body is the joined
// text of the body selector's elements with paragraph breaks collapsed
// to single spaces, which keeps the stored .txt files one long line of
// prose plus a keyword footer.

use anyhow::Result;
use scraper::Html;

use super::client::HttpClient;
use super::{selector, Source};
use crate::text;

/// A fetched article. Immutable once created; persisted only if the body
/// clears the minimum length heuristic.
#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub body: String,
    pub keywords: Vec<String>,
}

/// Download and parse a single article.
pub async fn fetch_article(client: &HttpClient, source: &Source, url: &str) -> Result<Article> {
    let html = client.fetch_html(url).await?;
    parse_article(&html, source, url)
}

/// Extract title, body, and keywords from article HTML.
///
/// Separated from the fetch so parsing is testable against fixture HTML,
/// and so the non-Send `Html` DOM never lives across an await point.
pub fn parse_article(html: &str, source: &Source, url: &str) -> Result<Article> {
    let title_sel = selector(source.title_selector)?;
    let body_sel = selector(source.body_selector)?;

    let document = Html::parse_document(html);

    let title = document
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let title = normalize_whitespace(&title);

    let mut body = String::new();
    for element in document.select(&body_sel) {
        let text = element.text().collect::<Vec<_>>().join(" ");
        body.push_str(&text);
        body.push(' ');
    }
    let body = normalize_whitespace(&body);

    if title.is_empty() {
        anyhow::bail!("{url}: no title matched {:?}", source.title_selector);
    }
    if body.is_empty() {
        anyhow::bail!("{url}: no body matched {:?}", source.body_selector);
    }

    let keywords = text::keywords(&body, 8);

    Ok(Article {
        title,
        url: url.to_string(),
        body,
        keywords,
    })
}

/// Collapse runs of whitespace, including paragraph breaks, into single
/// spaces and trim the ends.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cnn() -> Source {
        crate::sources::registry()
            .into_iter()
            .find(|s| s.brand == "cnn")
            .unwrap()
    }

    #[test]
    fn parses_title_and_body() {
        let html = r#"
            <h1 class="headline--lite">Markets  rally on
            rate news</h1>
            <div class="article--lite">
              <p>Stocks rose sharply today.</p>
              <p>Analysts expect further gains.</p>
            </div>
        "#;
        let article = parse_article(html, &cnn(), "https://example.test/a").unwrap();
        assert_eq!(article.title, "Markets rally on rate news");
        assert_eq!(
            article.body,
            "Stocks rose sharply today. Analysts expect further gains."
        );
    }

    #[test]
    fn missing_title_is_an_error() {
        let html = r#"<div class="article--lite"><p>Body only.</p></div>"#;
        assert!(parse_article(html, &cnn(), "https://example.test/a").is_err());
    }

    #[test]
    fn missing_body_is_an_error() {
        let html = r#"<h1 class="headline--lite">Title only</h1>"#;
        assert!(parse_article(html, &cnn(), "https://example.test/a").is_err());
    }
}
