use crate::error::{Result, ScanError};
use crate::normalize::authority;
use url::Url;

/// A `(scheme, host[:port])` pair taken from a seed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTarget {
    pub scheme: String,
    pub host: String,
}

impl SeedTarget {
    pub fn from_url(url: &Url) -> Result<Self> {
        let host = authority(url)
            .ok_or_else(|| ScanError::InvalidUrl(format!("seed has no host: {}", url)))?;
        Ok(Self {
            scheme: url.scheme().to_lowercase(),
            host: host.to_lowercase(),
        })
    }

    fn matches(&self, url: &Url) -> bool {
        match authority(url) {
            Some(host) => {
                self.scheme.eq_ignore_ascii_case(url.scheme())
                    && self.host.eq_ignore_ascii_case(&host)
            }
            None => false,
        }
    }
}

/// The whitelist a crawl may never leave. Immutable once built.
#[derive(Debug, Clone)]
pub struct ScopeGuard {
    targets: Vec<SeedTarget>,
}

impl ScopeGuard {
    pub fn new(seeds: &[Url]) -> Result<Self> {
        if seeds.is_empty() {
            return Err(ScanError::NoSeeds);
        }

        let mut targets: Vec<SeedTarget> = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let target = SeedTarget::from_url(seed)?;
            if !targets.contains(&target) {
                targets.push(target);
            }
        }

        Ok(Self { targets })
    }

    /// Exact scheme + host match against some seed; no subdomain tolerance.
    pub fn in_scope(&self, url: &Url) -> bool {
        self.targets.iter().any(|target| target.matches(url))
    }

    pub fn targets(&self) -> &[SeedTarget] {
        &self.targets
    }
}
