//! Keeping a stored metadata document stable
//!
//! Some IdPs (Azure AD among them) re-sign their metadata on every request,
//! so two downloads of unchanged metadata differ in their `ID` attribute and
//! `Signature` element. Storing each fresh copy would show up as perpetual
//! drift in declarative state, so when the only differences are those two
//! fields the previously stored document is kept.

use crate::error::Result;
use crate::metadata::{MetadataDescriptor, RawDocument};

/// Pick the document to store.
///
/// Returns `previous` verbatim when it is semantically equal to the fresh
/// document once identity and signature are ignored, otherwise the fresh
/// document text. A `previous` document that no longer parses is an error.
pub fn stabilize(
    fresh: RawDocument,
    fresh_descriptor: &MetadataDescriptor,
    previous: Option<&str>,
) -> Result<String> {
    let Some(previous) = previous else {
        return fresh.into_string();
    };

    let mut previous_descriptor = MetadataDescriptor::parse_str(previous)?;
    let previous_id = previous_descriptor.id().map(str::to_string);
    previous_descriptor.adopt_identity_of(fresh_descriptor);

    if previous_descriptor.canonical() == fresh_descriptor.canonical() {
        tracing::debug!("metadata only differs by its signature, keeping the stored document");
        return Ok(previous.to_string());
    }

    tracing::info!(
        previous_id = previous_id.as_deref().unwrap_or_default(),
        fresh_id = fresh_descriptor.id().unwrap_or_default(),
        "metadata content changed"
    );
    fresh.into_string()
}
