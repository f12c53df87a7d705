use crate::document::process_page;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::frontier::Frontier;
use crate::pool::TaskPool;
use crate::result::CrawlSummary;
use crate::scope::ScopeGuard;
use crate::sink::{OutputFormat, ResultSink, StdoutSink};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_MAX_WORKERS: usize = 20;

/// Called by a worker right before it fetches its URL.
pub type ProgressCallback = Arc<dyn Fn(&Url) + Send + Sync>;

#[derive(Debug, Default)]
struct Stats {
    fetched: AtomicUsize,
    failed: AtomicUsize,
    pages_with_inputs: AtomicUsize,
    inputs: AtomicUsize,
}

/// Everything a worker needs to process one URL.
struct Worker {
    fetcher: Fetcher,
    frontier: Arc<Frontier>,
    sink: Arc<dyn ResultSink>,
    progress_callback: Option<ProgressCallback>,
    stats: Arc<Stats>,
}

impl Worker {
    async fn visit(&self, url: Url) {
        if let Some(ref callback) = self.progress_callback {
            callback(&url);
        }

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("[{}] {}", url, e);
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };
        self.stats.fetched.fetch_add(1, Ordering::Relaxed);
        debug!(
            "[{}] {} {}",
            url,
            page.status_code,
            page.content_type.as_deref().unwrap_or("-")
        );

        // All offers for this page happen inside this call, before the
        // worker's slot is released.
        let report = process_page(&page.body, &url, &self.frontier);
        debug!("[{}] {} new link(s) queued", url, report.links_enqueued);

        if let Some(inputs) = report.inputs {
            self.stats.pages_with_inputs.fetch_add(1, Ordering::Relaxed);
            self.stats
                .inputs
                .fetch_add(inputs.inputs.len(), Ordering::Relaxed);
            self.sink.emit(inputs);
        }
    }
}

/// One crawl over the scope defined by its seeds. Each `Crawler` owns its
/// own frontier, so independent crawls can run side by side.
pub struct Crawler {
    seeds: Vec<Url>,
    frontier: Arc<Frontier>,
    fetcher: Fetcher,
    sink: Arc<dyn ResultSink>,
    max_workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(seeds: Vec<Url>, fetcher: Fetcher) -> Result<Self> {
        let scope = Arc::new(ScopeGuard::new(&seeds)?);

        Ok(Self {
            seeds,
            frontier: Arc::new(Frontier::new(scope)),
            fetcher,
            sink: Arc::new(StdoutSink::stdout(OutputFormat::Text)),
            max_workers: DEFAULT_MAX_WORKERS,
            progress_callback: None,
        })
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn frontier(&self) -> &Arc<Frontier> {
        &self.frontier
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Crawl until the frontier is drained and no worker is running.
    ///
    /// The visited set outlives the call: crawling twice with the same
    /// `Crawler` fetches nothing the second time.
    pub async fn crawl(&self) -> Result<CrawlSummary> {
        let start = Instant::now();
        info!(
            "Starting crawl of {} seed(s) with {} workers",
            self.seeds.len(),
            self.max_workers
        );

        for seed in &self.seeds {
            self.frontier.offer(seed.clone());
        }

        let stats = Arc::new(Stats::default());
        let worker = Arc::new(Worker {
            fetcher: self.fetcher.clone(),
            frontier: self.frontier.clone(),
            sink: self.sink.clone(),
            progress_callback: self.progress_callback.clone(),
            stats: stats.clone(),
        });

        let mut pool = TaskPool::new(self.max_workers);
        loop {
            let slot = pool.reserve().await?;
            let Some(url) = self.next_url(&pool).await else {
                break;
            };

            debug!("[{}] Dispatching ({} in flight)", url, pool.in_flight());
            let worker = worker.clone();
            pool.spawn(slot, async move { worker.visit(url).await });
        }
        pool.join().await;

        let summary = CrawlSummary {
            pages_fetched: stats.fetched.load(Ordering::Relaxed),
            pages_failed: stats.failed.load(Ordering::Relaxed),
            pages_with_inputs: stats.pages_with_inputs.load(Ordering::Relaxed),
            inputs_found: stats.inputs.load(Ordering::Relaxed),
            urls_discovered: self.frontier.visited_count(),
            elapsed: start.elapsed(),
        };
        info!(
            "Crawl complete. Fetched {} pages, {} with inputs",
            summary.pages_fetched, summary.pages_with_inputs
        );
        Ok(summary)
    }

    /// Next URL to dispatch, or `None` once the crawl is finished.
    async fn next_url(&self, pool: &TaskPool) -> Option<Url> {
        loop {
            // Sampled before the pop. Only this loop spawns workers, so zero
            // here means nothing can add to the queue any more.
            let outstanding = pool.outstanding();
            if let Some(url) = self.frontier.take() {
                return Some(url);
            }
            if outstanding == 0 {
                return None;
            }
            pool.changed().await;
        }
    }
}
