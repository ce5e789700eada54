use super::error::NewsError;
use crate::config::RuntimeConfig;
use futures_util::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Somewhere listing pages come from.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Returns the full body of `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, NewsError>;
}

/// Fetches pages over HTTP with a size cap on the body.
pub struct HttpSource {
    client: Client,
    max_page_bytes: usize,
}

impl HttpSource {
    pub fn new(cfg: &RuntimeConfig) -> Result<Self, NewsError> {
        let client = Client::builder()
            .gzip(true)
            .connect_timeout(Duration::from_secs(5))
            .timeout(cfg.timeout)
            .build()?;
        Ok(HttpSource {
            client,
            max_page_bytes: cfg.max_page_bytes,
        })
    }
}

impl PageSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, NewsError> {
        let resp = self.client.get(url).send().await?.error_for_status()?;
        debug!(%url, status = %resp.status(), "response received");

        // Stream with a max size limit
        let mut stream = resp.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if buf.len() + chunk.len() > self.max_page_bytes {
                return Err(NewsError::PageTooLarge {
                    url: url.to_string(),
                    limit: self.max_page_bytes,
                });
            }
            buf.extend_from_slice(&chunk);
        }
        debug!(%url, bytes = buf.len(), "body read");
        Ok(buf)
    }
}
