//! SAML metadata parsing and signing key verification
//!
//! A metadata document is parsed into a [`MetadataDescriptor`]:
//! - the `ID` attribute and enveloped `Signature` of the `EntityDescriptor`
//! - the DER certificates of every `KeyDescriptor use="signing"` under each
//!   `IDPSSODescriptor`
//!
//! Certificates are matched by SHA1 [`Thumbprint`](crate::Thumbprint).

pub mod descriptor;
pub mod document;

pub use descriptor::{verify, MetadataDescriptor};

/// Raw metadata document as returned by the IdP, unparsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument(Vec<u8>);

impl RawDocument {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse into a descriptor
    pub fn parse(&self) -> crate::Result<MetadataDescriptor> {
        MetadataDescriptor::parse(&self.0)
    }

    /// The document text, verbatim
    pub fn into_string(self) -> crate::Result<String> {
        String::from_utf8(self.0)
            .map_err(|e| crate::Error::MalformedDocument(format!("document is not UTF-8: {e}")))
    }
}

impl From<String> for RawDocument {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&str> for RawDocument {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}
