use async_trait::async_trait;
use blog_mirror_core::{Error, Result};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

/// Source of remote documents.
///
/// The crawler only ever needs "GET this URL"; tests swap in an in-memory
/// implementation.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String>;
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP fetcher sending the configured user agent
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| Error::ConfigParse(format!("Invalid user agent: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ConfigParse(format!("HTTP client error: {}", e)))?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(url, e))?;

        check_status(url, response.status())?;
        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_text(&self, url: &str) -> Result<String> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| fetch_error(url, e))
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| fetch_error(url, e))?;
        Ok(bytes.to_vec())
    }
}

fn fetch_error(url: &str, err: reqwest::Error) -> Error {
    Error::Fetch {
        url: url.to_string(),
        message: err.to_string(),
    }
}

/// Anything but a 2xx answer is a failed fetch
fn check_status(url: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    Err(Error::Fetch {
        url: url.to_string(),
        message: format!("HTTP {}", status),
    })
}
