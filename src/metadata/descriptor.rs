//! Parsed SAML `EntityDescriptor` and signing key verification

use base64::Engine;

use super::document::{self, Element, Node};
use crate::error::{Error, Result};
use crate::thumbprint::Thumbprint;

const ENTITY_DESCRIPTOR: &str = "EntityDescriptor";
const SIGNATURE: &str = "Signature";
const ID: &str = "ID";

/// Structured view of a metadata document.
///
/// Holds the identity (`ID` attribute), the enveloped signature and the
/// decoded signing certificates of every IdP SSO descriptor, plus the full
/// element tree for canonical comparison.
#[derive(Debug, Clone)]
pub struct MetadataDescriptor {
    root: Element,
    signing_certificates: Vec<Vec<u8>>,
}

impl MetadataDescriptor {
    /// Parse a raw metadata document
    pub fn parse(document: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(document)
            .map_err(|e| Error::MalformedDocument(format!("document is not UTF-8: {e}")))?;
        Self::parse_str(xml)
    }

    pub fn parse_str(xml: &str) -> Result<Self> {
        let root = document::parse(xml)?;

        if root.local_name() != ENTITY_DESCRIPTOR {
            return Err(Error::MalformedDocument(format!(
                "expected an EntityDescriptor root element, got {}",
                root.name
            )));
        }

        let signing_certificates = extract_signing_certificates(&root);

        Ok(Self {
            root,
            signing_certificates,
        })
    }

    /// The `ID` attribute of the entity descriptor
    pub fn id(&self) -> Option<&str> {
        self.root.attribute(ID)
    }

    /// The enveloped `Signature` element, if the document is signed
    pub fn signature(&self) -> Option<&Element> {
        self.root.children_named(SIGNATURE).next()
    }

    /// DER blobs of every decodable signing certificate, in document order
    pub fn signing_certificates(&self) -> &[Vec<u8>] {
        &self.signing_certificates
    }

    pub fn has_signing_key(&self, expected: &Thumbprint) -> bool {
        verify(self, expected)
    }

    /// Replace this descriptor's identity and signature with `other`'s.
    ///
    /// When `other` carries no signature the local one is removed; when only
    /// `other` has one it is inserted at the same child position.
    pub(crate) fn adopt_identity_of(&mut self, other: &MetadataDescriptor) {
        self.root.set_attribute(ID, other.id());

        let ours = self.root.child_position(SIGNATURE);
        match (ours, other.signature()) {
            (Some(i), Some(sig)) => self.root.children[i] = Node::Element(sig.clone()),
            (Some(i), None) => {
                self.root.children.remove(i);
            }
            (None, Some(sig)) => {
                let at = other
                    .root
                    .child_position(SIGNATURE)
                    .unwrap_or(0)
                    .min(self.root.children.len());
                self.root.children.insert(at, Node::Element(sig.clone()));
            }
            (None, None) => {}
        }
    }

    pub(crate) fn canonical(&self) -> Vec<u8> {
        self.root.canonical()
    }
}

/// Check whether any signing certificate of `descriptor` has the expected thumbprint
pub fn verify(descriptor: &MetadataDescriptor, expected: &Thumbprint) -> bool {
    let found = descriptor
        .signing_certificates
        .iter()
        .find(|der| Thumbprint::of(der) == *expected);

    match found {
        Some(der) => {
            let subject = describe_certificate(der);
            tracing::debug!(
                thumbprint = %expected,
                subject = subject.as_deref().unwrap_or("<unparsable>"),
                "found token signing key"
            );
            true
        }
        None => false,
    }
}

/// IDPSSODescriptor/KeyDescriptor[@use="signing"]/KeyInfo/X509Data/X509Certificate
fn extract_signing_certificates(root: &Element) -> Vec<Vec<u8>> {
    let mut certificates = Vec::new();

    for idp in root.children_named("IDPSSODescriptor") {
        for key in idp.children_named("KeyDescriptor") {
            if key.attribute("use") != Some("signing") {
                continue;
            }
            for key_info in key.children_named("KeyInfo") {
                for x509_data in key_info.children_named("X509Data") {
                    for cert in x509_data.children_named("X509Certificate") {
                        if let Some(der) = decode_certificate(&cert.text()) {
                            certificates.push(der);
                        }
                    }
                }
            }
        }
    }

    certificates
}

/// Decode a base64 certificate body; line breaks inside the payload are allowed.
fn decode_certificate(encoded: &str) -> Option<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    match base64::engine::general_purpose::STANDARD.decode(compact) {
        Ok(der) => Some(der),
        Err(e) => {
            tracing::debug!(error = %e, "skipping undecodable signing certificate");
            None
        }
    }
}

/// Subject DN of a DER certificate, for diagnostics only
fn describe_certificate(certificate: &[u8]) -> Option<String> {
    use der::Decode;
    use x509_cert::Certificate;

    let cert = Certificate::from_der(certificate).ok()?;
    Some(cert.tbs_certificate.subject.to_string())
}
