//! Download and verify an IdP metadata document
//!
//! Usage: fetch_metadata <metadata-url> <signing-key-thumbprint> [stored-document.xml]
//!
//! Polls the URL until the metadata lists the given signing key, then prints
//! the document to store. When a stored document is given and only the
//! signature changed, the stored document is printed unchanged.
//!
//! Set `RUST_LOG=saml_metadata=debug` to follow each attempt.

use saml_metadata::{FetchRequest, MetadataClient};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(url), Some(thumbprint)) = (args.next(), args.next()) else {
        eprintln!("usage: fetch_metadata <metadata-url> <signing-key-thumbprint> [stored-document.xml]");
        std::process::exit(2);
    };
    let stored = args.next().map(std::fs::read_to_string).transpose()?;

    let request = FetchRequest::new(url, &thumbprint, stored)?;
    let client = MetadataClient::new()?;

    // Ctrl-C stops polling
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let document = client.get_metadata(&request, &cancel).await?;
    println!("{document}");

    Ok(())
}
