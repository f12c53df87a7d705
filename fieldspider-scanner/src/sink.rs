use crate::result::PageInputs;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Mutex as StdMutex, PoisonError};
use tracing::warn;

/// Receives one record per page that had at least one `<input>`.
pub trait ResultSink: Send + Sync {
    fn emit(&self, page: PageInputs);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `[url]` header, tab-indented elements, blank line.
    #[default]
    Text,
    /// One JSON object per page, one per line.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Render a record exactly as it is written to the output stream.
pub fn render(page: &PageInputs, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => page.to_string(),
        OutputFormat::Json => match serde_json::to_string(page) {
            Ok(mut line) => {
                line.push('\n');
                line
            }
            Err(e) => {
                warn!("[{}] Failed to serialize inputs: {}", page.url, e);
                String::new()
            }
        },
    }
}

/// Writes rendered records to any `Write`. Each record is written with a
/// single `write_all` under the sink's lock, so concurrent workers never
/// interleave blocks.
pub struct WriterSink<W> {
    writer: StdMutex<W>,
    format: OutputFormat,
}

pub type StdoutSink = WriterSink<io::Stdout>;

impl WriterSink<io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer: StdMutex::new(writer),
            format,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> ResultSink for WriterSink<W> {
    fn emit(&self, page: PageInputs) {
        let rendered = render(&page, self.format);
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writer
            .write_all(rendered.as_bytes())
            .and_then(|_| writer.flush())
        {
            warn!("[{}] Failed to write inputs: {}", page.url, e);
        }
    }
}

/// Keeps every record in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pages: StdMutex<Vec<PageInputs>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> Vec<PageInputs> {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ResultSink for MemorySink {
    fn emit(&self, page: PageInputs) {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(page);
    }
}
