//! Validated input of one metadata retrieval

use crate::error::{Error, Result};
use crate::thumbprint::Thumbprint;

/// What to download, which key to wait for, and what is already stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    endpoint: String,
    expected_thumbprint: Thumbprint,
    previous_document: Option<String>,
}

impl FetchRequest {
    /// Validate and build a request.
    ///
    /// `endpoint` must be an absolute `http` or `https` URL and `thumbprint`
    /// 40 hexadecimal characters. An empty `previous_document` counts as none.
    pub fn new(
        endpoint: impl Into<String>,
        thumbprint: &str,
        previous_document: Option<String>,
    ) -> Result<Self> {
        let expected_thumbprint = Thumbprint::decode(thumbprint)?;

        let endpoint = endpoint.into();
        let url = reqwest::Url::parse(&endpoint)
            .map_err(|_| Error::InvalidEndpoint(endpoint.clone()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidEndpoint(endpoint));
        }

        Ok(Self {
            endpoint,
            expected_thumbprint,
            previous_document: previous_document.filter(|d| !d.is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn expected_thumbprint(&self) -> &Thumbprint {
        &self.expected_thumbprint
    }

    pub fn previous_document(&self) -> Option<&str> {
        self.previous_document.as_deref()
    }
}
