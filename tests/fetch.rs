//! HTTP fetcher against a mock IdP

mod common;

use std::time::{Duration, Instant};

use saml_metadata::{Error, HttpFetcher, MetadataConfig, MetadataSource};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{federation_metadata, CURRENT_CERT};

fn fetcher() -> HttpFetcher {
    HttpFetcher::from_config(&MetadataConfig::default()).expect("http client")
}

#[tokio::test]
async fn test_returns_body_verbatim() {
    let server = MockServer::start().await;
    let body = federation_metadata("_1", "sig", &[CURRENT_CERT]);
    Mock::given(method("GET"))
        .and(path("/federationmetadata.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let doc = fetcher()
        .fetch(&format!("{}/federationmetadata.xml", server.uri()), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(doc.as_bytes(), body.as_bytes());
}

#[tokio::test]
async fn test_not_found_is_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch(&format!("{}/missing", server.uri()), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        Error::UpstreamStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_redirect_status_is_success() {
    let server = MockServer::start().await;
    // 3xx without a Location header is not followed and still counts as success
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let doc = fetcher()
        .fetch(&server.uri(), &CancellationToken::new())
        .await
        .unwrap();
    assert!(doc.is_empty());
}

#[tokio::test]
async fn test_server_error_is_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch(&server.uri(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UpstreamStatus { status: 503, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = fetcher()
        .fetch(&format!("http://{addr}/metadata"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn test_cancel_aborts_in_flight_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<EntityDescriptor/>")
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = fetcher().fetch(&server.uri(), &cancel).await.unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(10));
}
