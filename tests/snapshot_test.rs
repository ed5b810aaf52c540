//! End-to-end fetch cycle tests against a mock feeder

mod common;

use feederwatch::models::{DataSource, QuadState, TriState};
use feederwatch::snapshot::fetch_snapshot;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test structured endpoints populate stats and temperature
#[tokio::test]
async fn test_structured_stats() {
    let mock_server = MockServer::start().await;
    common::mount_json(&mock_server, "/api/stage2_stats", common::stage2_stats_body()).await;
    common::mount_json(
        &mock_server,
        "/api/get_temperatures.json",
        json!({ "cpu": "51" }),
    )
    .await;
    common::mount_homepage(&mock_server, &common::homepage_html("rooftop")).await;

    let snapshot = fetch_snapshot(&common::client_for(&mock_server)).await;

    assert!(snapshot.connected);
    assert!(snapshot.fetch_error.is_none());
    assert_eq!(snapshot.feeder_name.as_deref(), Some("rooftop"));

    let stats = snapshot.stats.as_ref().unwrap();
    assert_eq!(stats.planes_now, Some(12));
    assert_eq!(stats.planes_today, Some(340));
    assert_eq!(stats.message_rate, Some(55.2));
    assert_eq!(stats.position_rate, Some(8.1));
    assert_eq!(stats.uptime_display().as_deref(), Some("1d 2h"));
    assert_eq!(snapshot.cpu_temperature_c, Some(51.0));

    assert!(snapshot.has_source(DataSource::Stats));
    assert!(snapshot.has_source(DataSource::Temperature));
    assert!(snapshot.has_source(DataSource::Homepage));
    assert!(!snapshot.has_source(DataSource::HtmlFallback));
    assert!(snapshot.aggregators.is_empty());
}

/// Test aggregator statuses are reconciled in catalog order
#[tokio::test]
async fn test_aggregator_statuses() {
    let mock_server = MockServer::start().await;
    common::mount_status(&mock_server, "adsblol", "good", "intermittent").await;
    common::mount_status(&mock_server, "opensky", "disconnected", "unknown").await;
    common::mount_status(&mock_server, "adsbx", "good", "down").await;

    // Missing "0" key means the aggregator is skipped
    common::mount_json(&mock_server, "/api/status/alive", json!({ "1": {} })).await;

    let snapshot = fetch_snapshot(&common::client_for(&mock_server)).await;

    assert!(snapshot.connected);
    let names: Vec<&str> = snapshot
        .aggregators
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(names, vec!["adsb.lol", "ADSBExchange", "OpenSky"]);

    let lol = &snapshot.aggregators[0];
    assert_eq!(lol.enabled_indicator, TriState::On);
    assert_eq!(lol.data_indicator, TriState::On);
    assert_eq!(lol.mlat_indicator, QuadState::Warning);

    let adsbx = &snapshot.aggregators[1];
    assert_eq!(adsbx.enabled_indicator, TriState::Warning);
    assert_eq!(adsbx.mlat_indicator, QuadState::Error);

    let opensky = &snapshot.aggregators[2];
    assert_eq!(opensky.enabled_indicator, TriState::Off);
    assert_eq!(opensky.data_indicator, TriState::Off);
    assert_eq!(opensky.mlat_indicator, QuadState::Off);
}

/// Test homepage facts fill in when every structured endpoint fails
#[tokio::test]
async fn test_html_fallback() {
    let mock_server = MockServer::start().await;
    let html = r#"<html><body>
<h1>Feeder Homepage for garage</h1>
<div class="stats">2 planes / 50 today</div>
<div class="rates">3.5 pos / 120.4 msg per sec</div>
<div>CPU: 61°C</div>
<ul><li><a href="https://adsb.lol/">adsb.lol</a></li></ul>
</body></html>"#;
    common::mount_homepage(&mock_server, html).await;

    let snapshot = fetch_snapshot(&common::client_for(&mock_server)).await;

    assert!(snapshot.connected);
    assert_eq!(snapshot.feeder_name.as_deref(), Some("garage"));
    assert!(snapshot.has_source(DataSource::HtmlFallback));

    let stats = snapshot.stats.as_ref().unwrap();
    assert_eq!(stats.planes_now, Some(2));
    assert_eq!(stats.planes_today, Some(50));
    assert_eq!(stats.position_rate, Some(3.5));
    assert_eq!(stats.message_rate, Some(120.4));
    assert_eq!(stats.uptime_seconds, None);
    assert_eq!(snapshot.cpu_temperature_c, Some(61.0));

    assert_eq!(snapshot.aggregators.len(), 1);
    let lol = &snapshot.aggregators[0];
    assert_eq!(lol.name, "adsb.lol");
    assert_eq!(lol.enabled_indicator, TriState::On);
    assert_eq!(lol.data_indicator, TriState::On);
    assert_eq!(lol.mlat_indicator, QuadState::Off);
}

/// Test a temperature reading alone does not suppress the homepage fallback
#[tokio::test]
async fn test_temperature_only_still_falls_back() {
    let mock_server = MockServer::start().await;
    common::mount_json(&mock_server, "/api/get_temperatures.json", json!({ "cpu": 40 })).await;
    common::mount_homepage(
        &mock_server,
        "<p>Feeder Homepage for attic</p><p>2 planes / 50 today</p><p>CPU: 61°C</p><p>adsb.lol</p>",
    )
    .await;

    let snapshot = fetch_snapshot(&common::client_for(&mock_server)).await;

    assert!(snapshot.connected);
    assert_eq!(snapshot.feeder_name.as_deref(), Some("attic"));
    let stats = snapshot.stats.as_ref().unwrap();
    assert_eq!(stats.planes_now, Some(2));
    assert_eq!(stats.planes_today, Some(50));
    assert_eq!(snapshot.cpu_temperature_c, Some(40.0));
    assert_eq!(snapshot.aggregators.len(), 1);
    assert_eq!(snapshot.aggregators[0].name, "adsb.lol");
    assert!(snapshot.has_source(DataSource::Temperature));
    assert!(snapshot.has_source(DataSource::HtmlFallback));
}

/// Test homepage counts are ignored once stats are reported
#[tokio::test]
async fn test_structured_stats_suppress_fallback() {
    let mock_server = MockServer::start().await;
    common::mount_json(&mock_server, "/api/stage2_stats", common::stage2_stats_body()).await;
    common::mount_homepage(
        &mock_server,
        "<p>Feeder Homepage for attic</p><p>2 planes / 50 today</p><p>CPU: 61°C</p><p>adsb.lol</p>",
    )
    .await;

    let snapshot = fetch_snapshot(&common::client_for(&mock_server)).await;

    assert!(snapshot.connected);
    assert_eq!(snapshot.feeder_name.as_deref(), Some("attic"));
    let stats = snapshot.stats.as_ref().unwrap();
    assert_eq!(stats.planes_now, Some(12));
    assert_eq!(stats.planes_today, Some(340));
    assert!(snapshot.cpu_temperature_c.is_none());
    assert!(snapshot.aggregators.is_empty());
    assert!(!snapshot.has_source(DataSource::HtmlFallback));
}

/// Test a failing stats endpoint leaves only stats empty
#[tokio::test]
async fn test_partial_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/stage2_stats"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    common::mount_status(&mock_server, "tat", "good", "good").await;

    let snapshot = fetch_snapshot(&common::client_for(&mock_server)).await;

    assert!(snapshot.connected);
    assert!(snapshot.stats.is_none());
    assert_eq!(snapshot.aggregators.len(), 1);
    assert_eq!(snapshot.aggregators[0].name, "TheAirTraffic");
    assert_eq!(snapshot.aggregators[0].enabled_indicator, TriState::On);
}

/// Test an unreachable feeder yields a disconnected snapshot
#[tokio::test]
async fn test_total_failure() {
    let snapshot = fetch_snapshot(&common::unreachable_client()).await;

    assert!(!snapshot.connected);
    let error = snapshot.fetch_error.as_deref().unwrap();
    assert!(error.starts_with("Connection failed"), "got {error}");
    assert!(error.contains("127.0.0.1:1"));
    assert!(snapshot.stats.is_none());
    assert!(snapshot.aggregators.is_empty());
    assert!(snapshot.sources.is_empty());
}
