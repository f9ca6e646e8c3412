//! Polling an IdP until it publishes the expected signing key
//!
//! Freshly issued signing certificates can take minutes to show up in an
//! IdP's metadata, so the poller keeps downloading the document until one of
//! its signing certificates has the expected thumbprint or the time budget
//! runs out.
//!
//! Every per-attempt failure (transport error, non-success status, malformed
//! document) is treated as "not there yet". The last failure is kept as the
//! source of the final [`Error::SigningKeyNotFound`].

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::MetadataConfig;
use crate::error::{Error, Result};
use crate::fetch::MetadataSource;
use crate::metadata::{MetadataDescriptor, RawDocument};
use crate::thumbprint::Thumbprint;

/// Time source for the poller
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A document whose signing certificates include the expected key
#[derive(Debug, Clone)]
pub struct Resolved {
    pub document: RawDocument,
    pub descriptor: MetadataDescriptor,
    /// Number of downloads it took, starting at 1
    pub attempts: u32,
}

pub struct Poller<S, C = TokioClock> {
    source: S,
    clock: C,
    timeout: Duration,
    interval: Duration,
}

impl<S: MetadataSource> Poller<S, TokioClock> {
    pub fn new(source: S, config: &MetadataConfig) -> Self {
        Self::with_clock(source, TokioClock, config)
    }
}

impl<S: MetadataSource, C: Clock> Poller<S, C> {
    pub fn with_clock(source: S, clock: C, config: &MetadataConfig) -> Self {
        Self {
            source,
            clock,
            timeout: config.timeout,
            interval: config.interval,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Download `endpoint` until it lists `expected` as a signing key.
    ///
    /// A new attempt only starts if it would begin before the deadline, so
    /// with instantaneous downloads this makes `timeout / interval` attempts.
    pub async fn resolve(
        &self,
        endpoint: &str,
        expected: &Thumbprint,
        cancel: &CancellationToken,
    ) -> Result<Resolved> {
        let started = self.clock.now();
        let mut attempts = 0u32;
        let mut last_error = None;

        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            attempts += 1;
            match self.attempt(endpoint, expected, cancel).await {
                Ok(Some((document, descriptor))) => {
                    tracing::info!(endpoint, attempts, thumbprint = %expected, "token signing key is available");
                    return Ok(Resolved {
                        document,
                        descriptor,
                        attempts,
                    });
                }
                Ok(None) => {
                    tracing::debug!(endpoint, attempt = attempts, thumbprint = %expected, "token signing key not published yet");
                    last_error = None;
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!(endpoint, attempt = attempts, error = %e, "metadata download attempt failed");
                    last_error = Some(Box::new(e));
                }
                Err(e) => return Err(e),
            }

            let elapsed = self.clock.now().saturating_duration_since(started);
            if elapsed + self.interval >= self.timeout {
                return Err(Error::SigningKeyNotFound {
                    thumbprint: *expected,
                    attempts,
                    last_error,
                });
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = self.clock.sleep(self.interval) => {}
            }
        }
    }

    /// One fetch → parse → verify round
    async fn attempt(
        &self,
        endpoint: &str,
        expected: &Thumbprint,
        cancel: &CancellationToken,
    ) -> Result<Option<(RawDocument, MetadataDescriptor)>> {
        let document = self.source.fetch(endpoint, cancel).await?;
        let descriptor = document.parse()?;

        if descriptor.has_signing_key(expected) {
            Ok(Some((document, descriptor)))
        } else {
            Ok(None)
        }
    }
}
