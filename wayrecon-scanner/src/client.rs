use crate::error::{Result, ScanError};
use crate::query::{CdxQuery, DEFAULT_CDX_ENDPOINT};
use reqwest::Client;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = concat!("wayrecon/", env!("CARGO_PKG_VERSION"));

/// Sends CDX queries and returns raw response bodies.
///
/// The pagination driver only depends on this trait, so pages can be
/// scripted in tests without a server.
pub trait ArchiveTransport {
    /// The request URL `query` resolves to
    fn query_url(&self, query: &CdxQuery) -> Url;

    /// Issue `query` and return the response body as text
    fn fetch(&self, query: &CdxQuery) -> impl Future<Output = Result<String>> + Send;
}

/// reqwest-backed transport for a CDX server
pub struct CdxClient {
    client: Client,
    endpoint: Url,
    timeout_secs: u64,
}

impl CdxClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(60, DEFAULT_USER_AGENT)
    }

    pub fn with_timeout(timeout_secs: u64, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        let endpoint = Url::parse(DEFAULT_CDX_ENDPOINT)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", DEFAULT_CDX_ENDPOINT, e)))?;

        Ok(Self {
            client,
            endpoint,
            timeout_secs,
        })
    }

    /// Point the client at a different CDX server
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.endpoint = Url::parse(endpoint)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", endpoint, e)))?;
        Ok(self)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

impl ArchiveTransport for CdxClient {
    fn query_url(&self, query: &CdxQuery) -> Url {
        query.to_url(&self.endpoint)
    }

    async fn fetch(&self, query: &CdxQuery) -> Result<String> {
        let url = self.query_url(query);
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(
            "CDX responded {} with {} bytes in {:?}",
            status,
            body.len(),
            start.elapsed()
        );
        Ok(body)
    }
}
