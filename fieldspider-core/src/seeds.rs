// Seed URL loading for the crawl scope

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("At least one seed URL is required (use --urls or --url-file)")]
    NoSeeds,

    #[error("Invalid seed URL '{input}': {reason}")]
    InvalidSeed { input: String, reason: String },

    #[error("Unable to read the seed file {}: {source}", path.display())]
    SeedFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse one seed. It must be an absolute URL with a host; any fragment is dropped.
pub fn parse_seed(input: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidSeed {
        input: input.to_string(),
        reason,
    };

    let mut url = Url::parse(input).map_err(|e| invalid(e.to_string()))?;
    if url.host_str().is_none() {
        return Err(invalid("URL has no host".to_string()));
    }
    url.set_fragment(None);
    Ok(url)
}

/// Parse a comma-separated seed list, e.g. `http://a.com/,https://b.org:8443/`.
pub fn parse_seed_list(list: &str) -> Result<Vec<Url>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_seed)
        .collect()
}

/// Load newline-separated seeds from a file. `~` is expanded and blank
/// lines are skipped; any other unparseable line is an error.
pub fn load_seeds_from_file(path: &Path) -> Result<Vec<Url>, ConfigError> {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::SeedFile {
        path: path.clone(),
        source,
    })?;

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_seed)
        .collect()
}

/// Combine both seed sources; at least one seed must come out of them.
pub fn load_seeds(urls: Option<&str>, url_file: Option<&Path>) -> Result<Vec<Url>, ConfigError> {
    let mut seeds = Vec::new();
    if let Some(list) = urls {
        seeds.extend(parse_seed_list(list)?);
    }
    if let Some(path) = url_file {
        seeds.extend(load_seeds_from_file(path)?);
    }

    if seeds.is_empty() {
        return Err(ConfigError::NoSeeds);
    }
    Ok(seeds)
}
