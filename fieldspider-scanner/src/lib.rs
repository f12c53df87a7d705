pub mod crawler;
pub mod document;
pub mod error;
pub mod fetcher;
pub mod frontier;
pub mod normalize;
pub mod pool;
pub mod result;
pub mod scope;
pub mod sink;

pub use crawler::{Crawler, ProgressCallback};
pub use error::{LinkError, ScanError};
pub use fetcher::{Fetcher, TlsPolicy};
pub use frontier::Frontier;
pub use result::{CrawlSummary, InputElement, PageInputs};
pub use scope::ScopeGuard;
pub use sink::{MemorySink, OutputFormat, ResultSink, StdoutSink, WriterSink};
