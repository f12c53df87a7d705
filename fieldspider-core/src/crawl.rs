use fieldspider_scanner::{
    CrawlSummary, Crawler, Fetcher, OutputFormat, ProgressCallback, ResultSink, ScanError,
    StdoutSink, TlsPolicy,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;
use url::Url;

/// Discrete concurrency setting; `worker_limit` maps it to the number of
/// pages fetched at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyLevel(pub i64);

impl ConcurrencyLevel {
    pub const DEFAULT: ConcurrencyLevel = ConcurrencyLevel(3);

    pub fn worker_limit(self) -> usize {
        match self.0 {
            0 => 1,
            1 => 5,
            2 => 10,
            3 => 20,
            4 => 50,
            5 => 100,
            _ => 20,
        }
    }
}

impl Default for ConcurrencyLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub seeds: Vec<Url>,
    pub concurrency: ConcurrencyLevel,
    pub timeout_secs: u64,
    pub tls: TlsPolicy,
    pub format: OutputFormat,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(seeds: Vec<Url>) -> Self {
        Self {
            seeds,
            concurrency: ConcurrencyLevel::DEFAULT,
            timeout_secs: fieldspider_scanner::fetcher::DEFAULT_TIMEOUT_SECS,
            tls: TlsPolicy::Verify,
            format: OutputFormat::Text,
            show_progress_bars: false,
        }
    }
}

/// Execute a crawl with the given options, writing records to stdout.
pub async fn execute_crawl(options: CrawlOptions) -> Result<CrawlSummary, ScanError> {
    let sink: Arc<dyn ResultSink> = Arc::new(StdoutSink::stdout(options.format));
    execute_crawl_with_sink(options, sink).await
}

/// Execute a crawl with the given options, sending records to `sink`.
pub async fn execute_crawl_with_sink(
    options: CrawlOptions,
    sink: Arc<dyn ResultSink>,
) -> Result<CrawlSummary, ScanError> {
    let CrawlOptions {
        seeds,
        concurrency,
        timeout_secs,
        tls,
        format: _,
        show_progress_bars,
    } = options;

    if tls == TlsPolicy::AcceptInvalidCerts {
        info!("TLS certificate verification is disabled");
    }

    let fetcher = Fetcher::with_timeout(tls, timeout_secs)?;
    let mut crawler = Crawler::new(seeds, fetcher)?
        .with_max_workers(concurrency.worker_limit())
        .with_sink(sink);

    // Spinner on stderr so stdout stays clean for records
    let progress_bar = show_progress_bars.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Arc::new(pb)
    });

    if let Some(ref pb) = progress_bar {
        let pb = pb.clone();
        let processed = Arc::new(AtomicUsize::new(0));
        let callback: ProgressCallback = Arc::new(move |url: &Url| {
            let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
            pb.set_message(format!("Crawling... {} URLs processed ({})", count, url.path()));
        });
        crawler = crawler.with_progress_callback(callback);
    }

    let result = crawler.crawl().await;

    if let Some(ref pb) = progress_bar {
        match &result {
            Ok(summary) => pb.finish_with_message(format!(
                "Crawl complete! {} pages fetched, {} with inputs",
                summary.pages_fetched, summary.pages_with_inputs
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}
