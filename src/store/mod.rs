// Article persistence — one text file per article, one directory per
// source, title as filename.

pub mod files;

pub use files::{
    list_articles, read_article, sanitize_title, write_article, StoredArticle, MIN_BODY_LEN,
};
