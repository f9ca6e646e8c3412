//! Error types for SAML metadata retrieval

use thiserror::Error;

use crate::thumbprint::Thumbprint;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid token signing key thumbprint {input:?}: must be an hexadecimal encoded sha1")]
    InvalidThumbprintFormat { input: String },

    #[error("invalid metadata endpoint {0:?}: must be an http url")]
    InvalidEndpoint(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response failed with status code {status} and body: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("malformed metadata document: {0}")]
    MalformedDocument(String),

    /// The poll budget ran out before the expected key showed up.
    ///
    /// `last_error` keeps the failure of the final attempt, if it failed
    /// rather than simply not listing the key.
    #[error("timed out after {attempts} attempts waiting for the token signing key {thumbprint} to be available in the metadata document")]
    SigningKeyNotFound {
        thumbprint: Thumbprint,
        attempts: u32,
        #[source]
        last_error: Option<Box<Error>>,
    },

    #[error("metadata retrieval cancelled")]
    Cancelled,
}

impl Error {
    /// Whether a single poll attempt failing with this error should be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::UpstreamStatus { .. } | Error::MalformedDocument(_)
        )
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedDocument(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
