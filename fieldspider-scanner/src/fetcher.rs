use crate::error::{Result, ScanError};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!("fieldspider/", env!("CARGO_PKG_VERSION"));

/// Whether the HTTP client validates server certificates.
///
/// There is deliberately no `Default`: callers state which one they want.
/// `AcceptInvalidCerts` exists because the targets are usually lab and
/// staging hosts running self-signed certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPolicy {
    Verify,
    AcceptInvalidCerts,
}

/// A fetched page. The status is informational only; error pages get
/// parsed like any other body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status_code: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(tls: TlsPolicy) -> Result<Self> {
        Self::with_timeout(tls, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(tls: TlsPolicy, timeout_secs: u64) -> Result<Self> {
        let timeout_secs = timeout_secs.max(1);
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs) / 2)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .danger_accept_invalid_certs(tls == TlsPolicy::AcceptInvalidCerts)
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let response_time = start.elapsed();

        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response
            .bytes()
            .await
            .map_err(|source| ScanError::BodyError {
                url: url.to_string(),
                source,
            })?;

        debug!(
            "[{}] {} ({} bytes in {:?})",
            url,
            status_code,
            body.len(),
            response_time
        );

        Ok(FetchedPage {
            status_code,
            content_type,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[tokio::test]
    async fn test_fetch_returns_body_and_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<input name=\"user\">", "text/html"),
            )
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new(TlsPolicy::Verify).unwrap();
        let url = Url::parse(&format!("{}/login", mock_server.uri())).unwrap();
        let page = fetcher.fetch(&url).await.unwrap();

        assert_eq!(page.status_code, 200);
        assert_eq!(page.content_type.as_deref(), Some("text/html"));
        assert_eq!(page.body, b"<input name=\"user\">");
    }

    #[tokio::test]
    async fn test_error_pages_are_still_returned() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<input name=\"debug\">"))
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new(TlsPolicy::AcceptInvalidCerts).unwrap();
        let url = Url::parse(&mock_server.uri()).unwrap();
        let page = fetcher.fetch(&url).await.unwrap();

        assert_eq!(page.status_code, 500);
        assert!(!page.body.is_empty());
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::with_timeout(TlsPolicy::Verify, 1).unwrap();
        let url = Url::parse(&mock_server.uri()).unwrap();
        let result = fetcher.fetch(&url).await;

        assert!(matches!(result, Err(ScanError::HttpError(_))));
    }

    #[test]
    fn test_huge_timeout_builds_a_client() {
        let fetcher = Fetcher::with_timeout(TlsPolicy::Verify, u64::MAX / 100);
        assert!(fetcher.is_ok());

        let fetcher = Fetcher::with_timeout(TlsPolicy::AcceptInvalidCerts, u64::MAX);
        assert!(fetcher.is_ok());
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        let fetcher = Fetcher::new(TlsPolicy::Verify).unwrap();
        // Port 9 (discard) is closed on test hosts.
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        assert!(fetcher.fetch(&url).await.is_err());
    }
}
