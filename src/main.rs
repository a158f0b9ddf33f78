//! # Blog Explorer
//!
//! Crawls a blog once, annotates the posts, and writes the artifacts an
//! explorer front end needs: `snapshot.json` and `wordcloud.svg`.
//!
//! ## Usage
//!
//! ```sh
//! blog_explorer -o ./site
//! blog_explorer --topic career --tag thesis
//! ```

use blog_explorer::cli::Cli;
use blog_explorer::config::PipelineConfig;
use blog_explorer::outputs;
use blog_explorer::scrapers::fetcher::HttpFetcher;
use blog_explorer::snapshot::{Snapshot, SnapshotHandle};
use blog_explorer::utils::ensure_writable_dir;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("blog_explorer starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = match PipelineConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Could not load configuration");
            return Err(e.into());
        }
    };
    args.apply_overrides(&mut config);
    config.validate()?;
    info!(
        base_url = %config.base_url,
        listing = %config.listing_path,
        max_posts = config.max_posts,
        "Configuration ready"
    );

    // Early check: ensure output dir is writable before crawling
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Build snapshot ----
    let fetcher = HttpFetcher::from_config(&config)?;
    let snapshot = match Snapshot::build(&config, &fetcher).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, "Corpus build failed; no snapshot produced");
            return Err(e.into());
        }
    };
    let handle = SnapshotHandle::new(snapshot);
    let snapshot = handle.current();

    // ---- Outputs ----
    if let Err(e) = outputs::write_all(&snapshot, Path::new(&args.output_dir)).await {
        error!(error = %e, "Failed writing artifacts");
        return Err(e.into());
    }

    // ---- Listing ----
    let post_filter = args.post_filter();
    let matching = snapshot.filter(&post_filter);
    if post_filter.is_empty() {
        println!(
            "{} posts, {} top terms; topics: {}",
            snapshot.corpus.len(),
            snapshot.visualization.top_terms.len(),
            snapshot.topics.join(", ")
        );
    } else {
        println!("Matching blog posts ({})", matching.len());
    }
    for post in &matching {
        println!("- {} <{}>", post.title, post.link);
        println!(
            "  tags: {}",
            post.tags.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(" ")
        );
        println!(
            "  topics: {}",
            post.topics.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        posts = snapshot.corpus.len(),
        fetch_failures = snapshot.report.fetch_failures,
        extraction_misses = snapshot.report.extraction_misses,
        "Execution complete"
    );

    Ok(())
}
