//! HttpClient against a wiremock upstream.

use std::time::Duration;

use diskzip::{FetchError, FileSource, HttpClient, ListingSource, ResourceKind};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/v1/disk/public/resources";

fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::new(
        format!("{}{}", server.uri(), LISTING_PATH),
        500,
        Duration::from_secs(5),
    )
    .unwrap()
}

fn listing_body() -> serde_json::Value {
    serde_json::json!({
        "public_key": "https://disk.yandex.ru/d/shared folder",
        "_embedded": {
            "limit": 500,
            "total": 3,
            "items": [
                { "name": "report.pdf", "type": "file", "file": "https://downloader.example/report", "size": 10 },
                { "name": "photos", "type": "dir" },
                { "name": "notes.txt", "type": "file", "file": "https://downloader.example/notes", "size": 3 }
            ]
        }
    })
}

#[tokio::test]
async fn listing_encodes_public_key_and_sends_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("public_key", "https://disk.yandex.ru/d/shared folder?x=1&y=2"))
        .and(query_param("limit", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_body()))
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server)
        .fetch_listing("https://disk.yandex.ru/d/shared folder?x=1&y=2")
        .await
        .unwrap();

    let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["report.pdf", "photos", "notes.txt"]);
    assert_eq!(items[1].kind, ResourceKind::Folder);

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default();
    assert!(query.contains("public_key=https%3A%2F%2Fdisk.yandex.ru%2Fd%2Fshared+folder"));
}

#[tokio::test]
async fn listing_without_items_container_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "single.txt",
            "type": "file"
        })))
        .mount(&server)
        .await;

    let items = client_for(&server).fetch_listing("link").await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn listing_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": "DiskNotFoundError"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_listing("link").await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn listing_with_non_json_body_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_listing("link").await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidBody { .. }));
}

#[tokio::test]
async fn listing_is_never_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client_for(&server).fetch_listing("link").await.is_err());
}

#[tokio::test]
async fn fetch_bytes_returns_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 data".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = client_for(&server)
        .fetch_bytes(&format!("{}/files/report.pdf", server.uri()))
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.7 data");
}

#[tokio::test]
async fn fetch_bytes_failure_names_the_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let url = format!("{}/files/gone", server.uri());
    let err = client_for(&server).fetch_bytes(&url).await.unwrap_err();

    assert_eq!(err.url(), url);
    assert!(err.to_string().contains("410"));
}

#[tokio::test]
async fn fetch_bytes_transport_failure() {
    let client =
        HttpClient::new("http://127.0.0.1:9/resources", 10, Duration::from_secs(2)).unwrap();
    let err = client.fetch_bytes("http://127.0.0.1:9/file").await.unwrap_err();
    assert!(matches!(err, FetchError::RequestFailed { .. }));
}
