//! Common test utilities

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use feederwatch::client::FeederClient;

/// Stats body for a feeder tracking 12 aircraft, up for 1d 2h
#[allow(dead_code)]
pub fn stage2_stats_body() -> Value {
    json!([{
        "planes": 12,
        "tplanes": 340,
        "mps": 55.2,
        "pps": 8.1,
        "uptime": 93_600
    }])
}

/// Homepage markup naming the feeder
#[allow(dead_code)]
pub fn homepage_html(name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Feeder Homepage for {name}</title></head>
<body><h1>Feeder Homepage for {name}</h1></body>
</html>"#
    )
}

/// Mount a JSON endpoint
pub async fn mount_json(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount an aggregator status endpoint
#[allow(dead_code)]
pub async fn mount_status(server: &MockServer, id: &str, beast: &str, mlat: &str) {
    mount_json(
        server,
        &format!("/api/status/{id}"),
        json!({ "0": { "beast": beast, "mlat": mlat } }),
    )
    .await;
}

/// Mount the homepage
#[allow(dead_code)]
pub async fn mount_homepage(server: &MockServer, html: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html.to_string()))
        .mount(server)
        .await;
}

/// Client pointed at a mock server
pub fn client_for(server: &MockServer) -> FeederClient {
    FeederClient::with_timeout(&server.uri(), Duration::from_secs(2)).unwrap()
}

/// Client pointed at a port nothing listens on
#[allow(dead_code)]
pub fn unreachable_client() -> FeederClient {
    FeederClient::with_timeout("http://127.0.0.1:1", Duration::from_millis(500)).unwrap()
}

/// Number of requests the server received for `endpoint`
#[allow(dead_code)]
pub async fn request_count(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == endpoint)
        .count()
}
