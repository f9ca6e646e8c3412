//! Token-signing key thumbprints
//!
//! A thumbprint is the SHA1 digest of a certificate's DER encoding, the same
//! value IdPs such as Azure AD display next to their signing certificates.

use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Length of a SHA1 digest in bytes
pub const THUMBPRINT_LEN: usize = 20;

/// SHA1 thumbprint of a certificate
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Thumbprint([u8; THUMBPRINT_LEN]);

impl Thumbprint {
    /// Decode a thumbprint from 40 hexadecimal characters (any case)
    pub fn decode(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidThumbprintFormat {
            input: input.to_string(),
        };

        if input.len() != THUMBPRINT_LEN * 2 {
            return Err(invalid());
        }

        let mut bytes = [0u8; THUMBPRINT_LEN];
        hex::decode_to_slice(input, &mut bytes).map_err(|_| invalid())?;

        Ok(Self(bytes))
    }

    /// Compute the thumbprint of a DER encoded certificate
    pub fn of(certificate_der: &[u8]) -> Self {
        let digest = Sha1::digest(certificate_der);
        let mut bytes = [0u8; THUMBPRINT_LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; THUMBPRINT_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; THUMBPRINT_LEN] {
        &self.0
    }
}

impl FromStr for Thumbprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl fmt::Display for Thumbprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Thumbprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thumbprint({})", self)
    }
}
