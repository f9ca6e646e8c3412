//! # SAML IdP metadata retrieval
//!
//! Downloads a SAML Identity Provider metadata document, waits until it
//! advertises an expected token-signing certificate, and returns a copy that
//! stays byte-stable across the IdP re-signing its metadata.
//!
//! ## Retrieval
//!
//! ### Step 1: Download and verify
//! - Fetches the `EntityDescriptor` from the metadata URL
//! - Decodes every `KeyDescriptor use="signing"` certificate of each `IDPSSODescriptor`
//! - Compares their SHA1 thumbprints with the expected one
//! - Retries every 10 seconds for up to 10 minutes while the key is missing
//!
//! ### Step 2: Stabilize
//! - Parses the previously stored document, if any
//! - Ignores the `ID` attribute and enveloped `Signature`
//! - Keeps the stored document when nothing else changed
//!
//! ## Example
//!
//! ```rust,ignore
//! use saml_metadata::{FetchRequest, MetadataClient};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MetadataClient::new()?;
//!
//!     let request = FetchRequest::new(
//!         "https://login.microsoftonline.com/<tenant>/federationmetadata/2007-06/federationmetadata.xml",
//!         "0123456789abcdef0123456789abcdef01234567",
//!         stored_document,
//!     )?;
//!
//!     let document = client.get_metadata(&request, &CancellationToken::new()).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod metadata;
pub mod poll;
pub mod request;
pub mod stabilize;
pub mod thumbprint;

pub use client::MetadataClient;
pub use config::MetadataConfig;
pub use error::{Error, Result};
pub use fetch::{HttpFetcher, MetadataSource};
pub use metadata::{MetadataDescriptor, RawDocument};
pub use poll::{Clock, Poller, Resolved, TokioClock};
pub use request::FetchRequest;
pub use stabilize::stabilize;
pub use thumbprint::Thumbprint;
