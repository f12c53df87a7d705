//! Link canonicalization.
//!
//! Only two relative forms are resolved against the page a link was found on:
//! root-relative (`/path`) and scheme-relative (`//host/path`). Anything else
//! without a scheme (`../x`, `./x`, `x.html`) is reported as unsupported and
//! dropped by the caller.

use crate::error::LinkError;
use url::{ParseError, Url};

/// Turn a raw `href` value into a canonical, fragment-free absolute URL.
pub fn normalize(href: &str, base: &Url) -> Result<Url, LinkError> {
    let href = href.trim();
    if href.is_empty() || href == "#" {
        return Err(LinkError::Empty);
    }

    let parsed = if let Some(rest) = href.strip_prefix("//") {
        Url::parse(&format!("{}://{}", base.scheme(), rest))
    } else if href.starts_with('/') {
        let origin = origin_of(base).ok_or_else(|| LinkError::Unsupported(href.to_string()))?;
        Url::parse(&format!("{}{}", origin, href))
    } else {
        Url::parse(href)
    };

    let mut url = parsed.map_err(|source| match source {
        ParseError::RelativeUrlWithoutBase => LinkError::Unsupported(href.to_string()),
        source => LinkError::Malformed {
            href: href.to_string(),
            source,
        },
    })?;

    url.set_fragment(None);
    Ok(url)
}

/// The dedup identity of a canonical URL: its string form without a single
/// trailing slash, so `/x` and `/x/` are the same page.
pub fn identity_key(url: &Url) -> String {
    let full = url.as_str();
    full.strip_suffix('/').unwrap_or(full).to_string()
}

/// `host[:port]` of a URL, the way seed targets and links are compared.
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn origin_of(base: &Url) -> Option<String> {
    authority(base).map(|authority| format!("{}://{}", base.scheme(), authority))
}
