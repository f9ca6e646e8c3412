//! Metadata client: download, verify, stabilize
//!
//! Each call to [`MetadataClient::get_metadata`]:
//! 1. Polls the endpoint until the metadata lists the expected signing key
//! 2. Compares the verified document with the previously stored one
//! 3. Returns the stored document if only `ID`/`Signature` changed, else the fresh one
//!
//! The client keeps no state between calls; concurrent calls for different
//! endpoints are independent.

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::MetadataConfig;
use crate::error::Result;
use crate::fetch::{HttpFetcher, MetadataSource};
use crate::poll::{Clock, Poller, TokioClock};
use crate::request::FetchRequest;
use crate::stabilize::stabilize;

pub struct MetadataClient<S = HttpFetcher, C = TokioClock> {
    poller: Poller<S, C>,
}

impl MetadataClient {
    /// Create a client with the default settings
    pub fn new() -> Result<Self> {
        Self::with_config(MetadataConfig::default())
    }

    /// Create a client whose HTTP client is built from `config`
    pub fn with_config(config: MetadataConfig) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(&config)?;
        Ok(Self::from_parts(fetcher, TokioClock, &config))
    }

    /// Create a client that downloads through an existing HTTP client
    pub fn with_http_client(client: reqwest::Client, config: &MetadataConfig) -> Self {
        Self::from_parts(HttpFetcher::new(client), TokioClock, config)
    }
}

impl<S: MetadataSource, C: Clock> MetadataClient<S, C> {
    pub fn from_parts(source: S, clock: C, config: &MetadataConfig) -> Self {
        Self {
            poller: Poller::with_clock(source, clock, config),
        }
    }

    /// Retrieve the metadata document to store for `request`
    pub async fn get_metadata(
        &self,
        request: &FetchRequest,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let span = tracing::info_span!(
            "get_metadata",
            endpoint = request.endpoint(),
            thumbprint = %request.expected_thumbprint(),
        );

        async move {
            let resolved = self
                .poller
                .resolve(request.endpoint(), request.expected_thumbprint(), cancel)
                .await?;

            stabilize(
                resolved.document,
                &resolved.descriptor,
                request.previous_document(),
            )
        }
        .instrument(span)
        .await
    }
}
