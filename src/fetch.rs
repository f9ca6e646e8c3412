//! Metadata download
//!
//! One GET per call, no retries; the poller decides when to try again.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::MetadataConfig;
use crate::error::{Error, Result};
use crate::metadata::RawDocument;

/// Source of metadata documents
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Download the document at `endpoint` once
    async fn fetch(&self, endpoint: &str, cancel: &CancellationToken) -> Result<RawDocument>;
}

/// Downloads metadata over HTTP with an injected client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a fetcher with a client configured from `config`
    pub fn from_config(config: &MetadataConfig) -> Result<Self> {
        Ok(Self::new(config.http_client()?))
    }

    async fn get(&self, endpoint: &str) -> Result<RawDocument> {
        let response = self.client.get(endpoint).send().await?;

        let status = response.status().as_u16();
        if !(200..400).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus { status, body });
        }

        let body = response.bytes().await?;
        Ok(RawDocument::new(body.to_vec()))
    }
}

#[async_trait]
impl MetadataSource for HttpFetcher {
    async fn fetch(&self, endpoint: &str, cancel: &CancellationToken) -> Result<RawDocument> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        tracing::debug!(endpoint, "downloading metadata");

        tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = self.get(endpoint) => result,
        }
    }
}
