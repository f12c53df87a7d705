use anyhow::{Context, Result};
use clap::ArgMatches;
use fieldspider_core::{ConcurrencyLevel, ConfigError, CrawlOptions, execute_crawl, load_seeds};
use fieldspider_scanner::fetcher::DEFAULT_TIMEOUT_SECS;
use fieldspider_scanner::{CrawlSummary, OutputFormat, TlsPolicy};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::prelude::*;

/// `-v` count to log level for our own crates. Dependencies stay at warn.
pub fn verbosity_level(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// Logs go to stderr; stdout carries only input records.
pub fn init_tracing(verbosity: u8) {
    let level = verbosity_level(verbosity);
    let filter = Targets::new()
        .with_target("fieldspider", level)
        .with_target("fieldspider_core", level)
        .with_target("fieldspider_scanner", level)
        .with_default(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

/// Build crawl options from parsed arguments. Fails before any network
/// activity when the seeds are missing or unusable.
pub fn crawl_options_from_matches(matches: &ArgMatches) -> Result<CrawlOptions, ConfigError> {
    let urls = matches.get_one::<String>("urls").map(String::as_str);
    let url_file = matches.get_one::<PathBuf>("url-file").map(PathBuf::as_path);
    let seeds = load_seeds(urls, url_file)?;

    let mut options = CrawlOptions::new(seeds);
    options.concurrency = matches
        .get_one::<i64>("concurrency")
        .map(|level| ConcurrencyLevel(*level))
        .unwrap_or_default();
    options.timeout_secs = matches
        .get_one::<u64>("timeout")
        .copied()
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    options.format = matches
        .get_one::<String>("format")
        .and_then(|format| format.parse::<OutputFormat>().ok())
        .unwrap_or_default();
    options.tls = if matches.get_flag("verify-tls") {
        TlsPolicy::Verify
    } else {
        TlsPolicy::AcceptInvalidCerts
    };
    options.show_progress_bars = matches.get_flag("progress");

    Ok(options)
}

pub async fn handle_crawl(matches: &ArgMatches) -> Result<CrawlSummary> {
    let options = crawl_options_from_matches(matches)?;

    info!(
        "Crawling {} seed(s), {} workers",
        options.seeds.len(),
        options.concurrency.worker_limit()
    );

    let summary = execute_crawl(options).await.context("Crawl failed")?;
    info!(
        "{} pages fetched, {} failed, {} inputs on {} pages in {:.1?}",
        summary.pages_fetched,
        summary.pages_failed,
        summary.inputs_found,
        summary.pages_with_inputs,
        summary.elapsed
    );
    Ok(summary)
}
