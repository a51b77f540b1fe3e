// Text preprocessing: tokenizing, stop-word filtering, stemming, and
// per-article keyword extraction.
//
// The topic model consumes the full preprocess() output (per-line token
// documents). Keyword extraction is separate — it runs TF-IDF over an
// article's own sentences so the footer keywords reflect which words are
// distinctive within the article rather than just frequent.

use std::sync::OnceLock;

use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use regex_lite::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use stop_words::{get, LANGUAGE};

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    // \w+ equivalent, ASCII word characters
    WORD.get_or_init(|| Regex::new(r"[a-z0-9_]+").unwrap())
}

fn stop_word_list() -> &'static Vec<String> {
    static STOPS: OnceLock<Vec<String>> = OnceLock::new();
    STOPS.get_or_init(|| get(LANGUAGE::English))
}

/// Lowercase a line and split it into word tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    let lower = line.to_lowercase();
    word_pattern()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Tokenize, drop stop words, and Porter-stem one line of text.
pub fn stem_tokens(line: &str) -> Vec<String> {
    let stops = stop_word_list();
    let stemmer = Stemmer::create(Algorithm::English);
    tokenize(line)
        .into_iter()
        .filter(|token| !stops.contains(token))
        .map(|token| stemmer.stem(&token).to_string())
        .collect()
}

/// Turn an article body into per-line token documents for the topic
/// model, with empty documents removed.
pub fn preprocess(body: &str) -> Vec<Vec<String>> {
    body.lines()
        .map(stem_tokens)
        .filter(|doc| !doc.is_empty())
        .collect()
}

/// Extract up to `top_n` keywords from an article body.
///
/// Each sentence is treated as a separate document for IDF computation,
/// so words distinctive to parts of the article outrank boilerplate that
/// appears throughout.
pub fn keywords(body: &str, top_n: usize) -> Vec<String> {
    let sentences: Vec<String> = body
        .split(['.', '?', '!'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if sentences.is_empty() {
        return Vec::new();
    }

    let stops = stop_word_list();
    let params = TfIdfParams::UnprocessedDocuments(&sentences, stops, None);
    let tfidf = TfIdf::new(params);

    tfidf
        .get_ranked_word_scores(top_n)
        .into_iter()
        .map(|(word, _score)| word)
        .collect()
}
