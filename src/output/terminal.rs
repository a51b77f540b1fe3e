// Colored terminal output for collection summaries and topic reports.
//
// This module handles all terminal-specific formatting: colors, tables,
// legends. The main.rs display functions delegate here.

use colored::Colorize;

use crate::pipeline::collect::CollectStats;
use crate::store::StoredArticle;
use crate::topics::Topic;

/// Display the end-of-run summary for a collection pass.
pub fn display_collect_summary(stats: &CollectStats) {
    println!("\n{}", "=== Collection Summary ===".bold());
    println!("  Links found:   {}", stats.discovered);
    println!("  Fetched:       {}", stats.fetched);
    println!("  Stored:        {}", stats.stored.to_string().green());
    if stats.skipped_short > 0 {
        println!(
            "  Skipped short: {}",
            stats.skipped_short.to_string().yellow()
        );
    }
    if stats.failed > 0 {
        println!("  Failed:        {}", stats.failed.to_string().red());
    }
}

/// Display one article's fitted topics with their token shares.
pub fn display_article_topics(article: &StoredArticle, topics: &[Topic]) {
    println!(
        "\n{} {}",
        article.brand.yellow(),
        super::truncate_chars(&article.name, 64).bold()
    );
    for (i, topic) in topics.iter().enumerate() {
        println!(
            "  Topic {} ({:>3.0}%): {}",
            i + 1,
            topic.share * 100.0,
            topic.terms.join(", ").cyan()
        );
    }
}

/// Display the numbered legend that maps scatter-plot labels back to
/// article names.
pub fn display_map_legend(articles: &[StoredArticle]) {
    if articles.is_empty() {
        println!("No stored articles. Run `gazette collect` first.");
        return;
    }

    println!("\n{}", "=== Article Map Legend ===".bold());
    println!();
    println!(
        "  {:>4}  {:<10} {}",
        "#".dimmed(),
        "Source".dimmed(),
        "Article".dimmed()
    );
    println!("  {}", "-".repeat(72).dimmed());

    for (i, article) in articles.iter().enumerate() {
        let name = super::truncate_chars(&article.name, 56);
        println!("  {:>4}  {:<10} {}", i + 1, article.brand.yellow(), name);
    }
    println!();
}
