use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to read response body from {url}: {source}")]
    BodyError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No seed URLs provided")]
    NoSeeds,

    #[error("Worker slot pool closed")]
    PoolClosed,
}

pub type Result<T> = std::result::Result<T, ScanError>;

/// Why a discovered href did not produce a crawlable URL.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LinkError {
    #[error("empty or fragment-only link")]
    Empty,

    #[error("relative link form is not resolved: {0}")]
    Unsupported(String),

    #[error("malformed link {href}: {source}")]
    Malformed {
        href: String,
        #[source]
        source: url::ParseError,
    },
}
