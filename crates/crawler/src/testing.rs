use crate::fetch::Fetcher;
use async_trait::async_trait;
use blog_mirror_core::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// In-memory fetcher serving canned responses and recording requests
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<(String, Instant)>>,
}

impl FakeFetcher {
    pub fn with_page(self, url: &str, body: &str) -> Self {
        self.with_bytes(url, body.as_bytes())
    }

    pub fn with_bytes(mut self, url: &str, body: &[u8]) -> Self {
        self.pages.insert(url.to_string(), body.to_vec());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Time elapsed between each request and the one before it
    pub fn request_gaps(&self) -> Vec<Duration> {
        let requests = self.requests.lock().unwrap();
        requests
            .windows(2)
            .map(|pair| pair[1].1.duration_since(pair[0].1))
            .collect()
    }

    fn lookup(&self, url: &str) -> Result<Vec<u8>> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));
        self.pages.get(url).cloned().ok_or_else(|| Error::Fetch {
            url: url.to_string(),
            message: "HTTP 404 Not Found".to_string(),
        })
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn get_text(&self, url: &str) -> Result<String> {
        let bytes = self.lookup(url)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.lookup(url)
    }
}
