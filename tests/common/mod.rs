//! Shared fixtures for integration tests

#![allow(dead_code)]

use base64::Engine;
use saml_metadata::Thumbprint;

/// Fake DER payloads; only their SHA1 matters to the verifier
pub const CURRENT_CERT: &[u8] = b"current signing certificate";
pub const NEXT_CERT: &[u8] = b"next signing certificate";

pub fn thumbprint_hex(cert: &[u8]) -> String {
    Thumbprint::of(cert).to_string().to_uppercase()
}

/// Azure AD style federation metadata, signed with `signature`
pub fn federation_metadata(id: &str, signature: &str, certs: &[&[u8]]) -> String {
    let keys: String = certs
        .iter()
        .map(|cert| {
            format!(
                r#"
    <KeyDescriptor use="signing">
      <KeyInfo xmlns="http://www.w3.org/2000/09/xmldsig#">
        <X509Data>
          <X509Certificate>{}</X509Certificate>
        </X509Data>
      </KeyInfo>
    </KeyDescriptor>"#,
                base64::engine::general_purpose::STANDARD.encode(cert)
            )
        })
        .collect();

    format!(
        r##"<?xml version="1.0" encoding="utf-8"?>
<EntityDescriptor ID="{id}" entityID="https://sts.windows.net/00000000-0000-0000-0000-000000000000/" xmlns="urn:oasis:names:tc:SAML:2.0:metadata">
  <Signature xmlns="http://www.w3.org/2000/09/xmldsig#">
    <SignedInfo>
      <CanonicalizationMethod Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#"/>
      <SignatureMethod Algorithm="http://www.w3.org/2001/04/xmldsig-more#rsa-sha256"/>
      <Reference URI="#{id}">
        <DigestValue>{signature}</DigestValue>
      </Reference>
    </SignedInfo>
    <SignatureValue>{signature}</SignatureValue>
  </Signature>
  <IDPSSODescriptor protocolSupportEnumeration="urn:oasis:names:tc:SAML:2.0:protocol">{keys}
    <SingleLogoutService Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect" Location="https://login.microsoftonline.com/00000000-0000-0000-0000-000000000000/saml2"/>
    <SingleSignOnService Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect" Location="https://login.microsoftonline.com/00000000-0000-0000-0000-000000000000/saml2"/>
    <SingleSignOnService Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST" Location="https://login.microsoftonline.com/00000000-0000-0000-0000-000000000000/saml2"/>
  </IDPSSODescriptor>
</EntityDescriptor>"##
    )
}
