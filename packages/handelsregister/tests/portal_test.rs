//! End-to-end tests against a mock portal.
//!
//! The client is blocking, so every call runs on a blocking thread while the
//! mock server lives on the test runtime.

use std::fs;
use std::path::Path;
use std::time::Duration;

use handelsregister::{
    ClientConfig, HandelsregisterClient, ListKind, RegisterType, RegistryError, SearchQuery,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENTRY_PATH: &str = "/rp_web/erweitertesuche/welcome.xhtml";
const RESULTS_PATH: &str = "/rp_web/sucheErgebnisse/welcome.xhtml";

fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn client_for(server: &MockServer) -> HandelsregisterClient {
    HandelsregisterClient::new(
        ClientConfig::default()
            .with_base_url(server.uri())
            .with_retry_delay(Duration::ZERO),
    )
}

async fn mount_entry_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(ENTRY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=abc123; Path=/")
                .insert_header("content-type", "text/html; charset=UTF-8")
                .set_body_string(load_fixture("welcome.html")),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_round_trip() {
    let server = MockServer::start().await;
    mount_entry_page(&server).await;

    Mock::given(method("POST"))
        .and(path(ENTRY_PATH))
        .and(header("cookie", "JSESSIONID=abc123"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains(
            "javax.faces.ViewState=-5412378723914231654%3A8913746290127364512",
        ))
        .and(body_string_contains("form%3Aschlagwoerter=Beispiel"))
        .and(body_string_contains("form%3AbtnSuche="))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=UTF-8")
                .set_body_string(load_fixture("results.html")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = tokio::task::spawn_blocking(move || {
        client.search(&SearchQuery::new().with_keywords(["Beispiel"]))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(response.items.len(), 3);
    assert!(response.truncated);
    assert_eq!(response.items[0].registry_id, "61732");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_document_round_trip() {
    let server = MockServer::start().await;
    mount_entry_page(&server).await;

    Mock::given(method("POST"))
        .and(path(ENTRY_PATH))
        .and(body_string_contains("form%3AregisterArt_input=HRB"))
        .and(body_string_contains("form%3AregisterNummer=61732"))
        .and(body_string_contains("form%3Aregistergericht_input=F1103"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=UTF-8")
                .set_body_string(load_fixture("results.html")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(RESULTS_PATH))
        .and(header("cookie", "JSESSIONID=abc123"))
        .and(body_string_contains("property=Global.Dokumentart.SI"))
        .and(body_string_contains(
            "javax.faces.ViewState=-5412378723914231654%3A1122334455667788990",
        ))
        .and(body_string_contains(
            "ergebnissForm%3AselectedSuchErgebnisFormTable%3A0%3Aj_idt219%3A6%3Afade=",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/xml; charset=UTF-8")
                .set_body_string(load_fixture("document.xml")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let document = tokio::task::spawn_blocking(move || {
        client.fetch_document(RegisterType::Hrb, "61732", "F1103")
    })
    .await
    .unwrap()
    .unwrap();

    assert!(document.as_str().contains("<tns:registernummer>61732</tns:registernummer>"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_document_row_without_document() {
    let server = MockServer::start().await;
    mount_entry_page(&server).await;

    Mock::given(method("POST"))
        .and(path(ENTRY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("results.html")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("unexpected"))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = tokio::task::spawn_blocking(move || {
        client.fetch_document(RegisterType::Vr, "5752", "D3201")
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(matches!(err, RegistryError::NoDocument(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_document_not_found() {
    let server = MockServer::start().await;
    mount_entry_page(&server).await;

    Mock::given(method("POST"))
        .and(path(ENTRY_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("results_empty.html")),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = tokio::task::spawn_blocking(move || {
        client.fetch_document(RegisterType::Hrb, "99999", "F1103")
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(matches!(err, RegistryError::NotFound(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_status_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENTRY_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = tokio::task::spawn_blocking(move || client.list(ListKind::Courts))
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, RegistryError::HttpStatus { status: 503, .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_redirect_loop_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENTRY_PATH))
        .respond_with(ResponseTemplate::new(302).insert_header("location", ENTRY_PATH))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = tokio::task::spawn_blocking(move || client.list(ListKind::Courts))
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, RegistryError::Client(_)));
    assert!(!err.is_transient());

    // One attempt follows the redirect chain until the client's limit.
    let requests = server.received_requests().await.unwrap();
    assert!(requests.len() <= 11, "retried: {} requests", requests.len());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_markup_drift_is_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENTRY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = tokio::task::spawn_blocking(move || client.search(&SearchQuery::new()))
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, RegistryError::Protocol { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_courts() {
    let server = MockServer::start().await;
    mount_entry_page(&server).await;

    let client = client_for(&server);
    let courts = tokio::task::spawn_blocking(move || client.list(ListKind::Courts))
        .await
        .unwrap()
        .unwrap();

    let codes: Vec<&str> = courts.iter().map(|(code, _)| code.as_str()).collect();
    assert_eq!(codes, vec!["D2601", "D3201", "F1103", "M1201", "R2101"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_each_operation_loads_its_own_context() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENTRY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("welcome.html")))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    tokio::task::spawn_blocking(move || {
        client.list(ListKind::Courts)?;
        client.list(ListKind::Types)
    })
    .await
    .unwrap()
    .unwrap();
}

#[test]
fn test_connection_failure_is_transport_error() {
    // Nothing listens on the discard port; connections are refused.
    let client = HandelsregisterClient::new(
        ClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_max_retries(1)
            .with_retry_delay(Duration::ZERO),
    );
    let err = client.search(&SearchQuery::new()).unwrap_err();

    assert!(matches!(err, RegistryError::Transport { .. }));
}
