use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// Per-run parameters (article limits, thread counts, the whole series
/// step configuration) come from CLI flags; only the durable local paths
/// and the HTTP identity live here. The .env file is loaded automatically
/// at startup via dotenvy.
pub struct Config {
    /// Root directory for persisted article files (one subdir per source)
    pub article_dir: PathBuf,
    /// Directory for workbook sheets written by `gazette export`
    pub workbook_dir: PathBuf,
    /// User-Agent header sent with every fetch
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults that
    /// keep everything under the current working directory.
    pub fn load() -> Result<Self> {
        Ok(Self {
            article_dir: env::var("GAZETTE_ARTICLE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./articles")),
            workbook_dir: env::var("GAZETTE_WORKBOOK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./news")),
            user_agent: env::var("GAZETTE_USER_AGENT")
                .unwrap_or_else(|_| "gazette/0.1 (news-archive)".to_string()),
        })
    }
}
