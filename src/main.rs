use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use gazette::config::Config;
use gazette::series::SeriesConfig;
use gazette::sources::client::HttpClient;
use gazette::topics::TopicModel;

/// Gazette: a local news archive with topic and similarity analysis,
/// plus a time-series statistics pipeline for CSV data.
#[derive(Parser)]
#[command(name = "gazette", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the registered news sites and store article files
    Collect {
        /// Max articles to pull per source (default: 50)
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Number of articles to fetch in parallel (default: 5)
        #[arg(long, default_value = "5")]
        threads: usize,

        /// Minimum body length in bytes for an article to be stored
        #[arg(long, default_value_t = gazette::store::MIN_BODY_LEN)]
        min_body: usize,
    },

    /// Write a headline workbook: one CSV sheet per source
    Export {
        /// Max articles to survey per source (default: 50)
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Number of articles to fetch in parallel (default: 5)
        #[arg(long, default_value = "5")]
        threads: usize,
    },

    /// Fit topics for every stored article
    Topics,

    /// Project stored articles onto a 2-D similarity map
    Map {
        /// Where to save the scatter plot (default: articles_map.png)
        #[arg(long, default_value = "articles_map.png")]
        out: String,
    },

    /// Run the time-series statistics sequence over a CSV column
    Series {
        /// Path to the CSV file
        csv: String,

        /// Name of the date column
        #[arg(long, default_value = "date")]
        date_column: String,

        /// chrono format of the date column, e.g. "%Y-%m-%d" or "%Y-%m"
        #[arg(long, default_value = "%Y-%m-%d")]
        date_format: String,

        /// Name of the value column to analyze
        #[arg(long)]
        value_column: String,

        /// Rolling window for the stationarity plots (default: 12)
        #[arg(long, default_value = "12")]
        window: usize,

        /// Lag count for the correlograms (default: 20)
        #[arg(long, default_value = "20")]
        lags: usize,

        /// Seasonal period for decomposition (default: 12)
        #[arg(long, default_value = "12")]
        season: usize,

        /// ARIMA autoregressive order p (default: 2)
        #[arg(short, default_value = "2")]
        p: usize,

        /// ARIMA differencing order d (default: 1)
        #[arg(short, default_value = "1")]
        d: usize,

        /// ARIMA moving-average order q (default: 2)
        #[arg(short, default_value = "2")]
        q: usize,

        /// Forecast horizon in steps (default: 12)
        #[arg(long, default_value = "12")]
        forecast: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gazette=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Collect {
            limit,
            threads,
            min_body,
        } => {
            let config = Config::load()?;
            let client = HttpClient::new(&config.user_agent)?;

            info!(limit, threads, "Starting collection run");
            let stats = gazette::pipeline::collect::run(
                &client,
                &config.article_dir,
                limit,
                threads,
                min_body,
            )
            .await?;

            gazette::output::terminal::display_collect_summary(&stats);
            println!(
                "\nArticles stored under {}",
                config.article_dir.display().to_string().bold()
            );
        }

        Commands::Export { limit, threads } => {
            let config = Config::load()?;
            let client = HttpClient::new(&config.user_agent)?;

            let sheets =
                gazette::pipeline::export::run(&client, &config.workbook_dir, limit, threads)
                    .await?;

            println!("\n{}", "Workbook written.".bold());
            for sheet in &sheets {
                println!("  {}", sheet.display());
            }
        }

        Commands::Topics => {
            let config = Config::load()?;
            let stored = gazette::store::list_articles(&config.article_dir)?;

            if stored.is_empty() {
                println!("No stored articles. Run `gazette collect` first.");
                return Ok(());
            }

            println!("Fitting topics for {} articles...", stored.len());

            let model = gazette::topics::lda::LdaModel::default();
            for article in &stored {
                let body = gazette::store::read_article(&article.path)?;
                let documents = gazette::text::preprocess(&body);
                match model.topic_terms(&documents) {
                    Ok(topics) => {
                        gazette::output::terminal::display_article_topics(article, &topics)
                    }
                    Err(e) => {
                        println!(
                            "\n{} {}\n  {}",
                            article.brand.yellow(),
                            article.name.bold(),
                            format!("No topics: {e}").dimmed()
                        );
                    }
                }
            }
            println!();
        }

        Commands::Map { out } => {
            let config = Config::load()?;
            let stored = gazette::store::list_articles(&config.article_dir)?;

            if stored.len() < 2 {
                println!("Need at least two stored articles to build a map.");
                return Ok(());
            }

            println!("Mapping {} articles...", stored.len());

            let mut documents = Vec::with_capacity(stored.len());
            for article in &stored {
                let body = gazette::store::read_article(&article.path)?;
                documents.push((article.name.clone(), body));
            }

            let dtm = gazette::similarity::matrix::vectorize(&documents);
            let distances = gazette::similarity::matrix::cosine_distance_matrix(&dtm);
            let points = gazette::similarity::mds::project_2d(&distances)?;

            gazette::similarity::plot::render_map(&points, out.as_ref(), "Article similarity")?;
            gazette::output::terminal::display_map_legend(&stored);
            println!("Map saved to {}", out.bold());
        }

        Commands::Series {
            csv,
            date_column,
            date_format,
            value_column,
            window,
            lags,
            season,
            p,
            d,
            q,
            forecast,
        } => {
            let config = SeriesConfig {
                csv_path: csv.into(),
                date_column,
                date_format,
                value_column,
                window,
                lags,
                season,
                order: (p, d, q),
                forecast_steps: forecast,
            };
            gazette::series::run(&config)?;
        }
    }

    Ok(())
}
