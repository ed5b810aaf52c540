//! Snapshot assembly
//!
//! One fetch cycle is split in two halves:
//!
//! - [`collect`] performs the endpoint calls, sequentially and in a fixed
//!   order (stats, temperature, each catalog aggregator, homepage), and keeps
//!   every outcome in a [`CycleResults`].
//! - [`assemble`] merges those outcomes into an immutable [`FeederSnapshot`]
//!   without any I/O.
//!
//! A failing endpoint only leaves its own field empty. The homepage always
//! supplies the feeder name; its other facts are used only when none of the
//! structured endpoints produced data.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::{AggregatorEntry, AGGREGATORS};
use crate::client::FeederClient;
use crate::models::{AggregatorRecord, AggregatorStatus, DataSource, FeederSnapshot, StageStats};
use crate::parser::HomepageParser;
use crate::reconcile::reconcile;
use crate::utils::error::FetchError;

pub const STATS_PATH: &str = "/api/stage2_stats";
pub const TEMPERATURES_PATH: &str = "/api/get_temperatures.json";
pub const HOMEPAGE_PATH: &str = "/";

/// Outcome of one status endpoint call
#[derive(Debug)]
pub struct StatusResult {
    pub entry: AggregatorEntry,
    pub result: Result<Value, FetchError>,
}

/// Raw outcomes of every call made during one cycle
#[derive(Debug)]
pub struct CycleResults {
    pub base_url: String,
    pub stats: Result<Value, FetchError>,
    pub temperatures: Result<Value, FetchError>,
    pub statuses: Vec<StatusResult>,
    pub homepage: Result<String, FetchError>,
}

/// Run every endpoint call of one cycle against `client`
pub async fn collect(client: &FeederClient, catalog: &[AggregatorEntry]) -> CycleResults {
    let stats = client.fetch_json(STATS_PATH).await;
    log_failure(STATS_PATH, &stats);

    let temperatures = client.fetch_json(TEMPERATURES_PATH).await;
    log_failure(TEMPERATURES_PATH, &temperatures);

    let mut statuses = Vec::with_capacity(catalog.len());
    for entry in catalog {
        let path = entry.status_path();
        let result = client.fetch_json(&path).await;
        log_failure(&path, &result);
        statuses.push(StatusResult {
            entry: *entry,
            result,
        });
    }

    let homepage = client.fetch_text(HOMEPAGE_PATH).await;
    log_failure(HOMEPAGE_PATH, &homepage);

    CycleResults {
        base_url: client.base_url().to_string(),
        stats,
        temperatures,
        statuses,
        homepage,
    }
}

fn log_failure<T>(path: &str, result: &Result<T, FetchError>) {
    if let Err(e) = result {
        debug!(path, kind = %e.kind(), error = %e, "Endpoint unavailable");
    }
}

/// Run a full cycle with the default catalog and stamp it now
pub async fn fetch_snapshot(client: &FeederClient) -> FeederSnapshot {
    let results = collect(client, AGGREGATORS).await;
    assemble(&results, Utc::now())
}

/// Merge cycle outcomes into a snapshot captured at `captured_at`
pub fn assemble(results: &CycleResults, captured_at: DateTime<Utc>) -> FeederSnapshot {
    let mut sources = Vec::new();

    let mut stats = results.stats.as_ref().ok().and_then(stats_from_json);
    if stats.is_some() {
        sources.push(DataSource::Stats);
    }

    let mut cpu_temperature_c = results
        .temperatures
        .as_ref()
        .ok()
        .and_then(cpu_temperature_from_json);
    if cpu_temperature_c.is_some() {
        sources.push(DataSource::Temperature);
    }

    let mut records: Vec<AggregatorRecord> = results
        .statuses
        .iter()
        .filter_map(|status| {
            let value = status.result.as_ref().ok()?;
            record_from_json(&status.entry, value)
        })
        .collect();
    if !records.is_empty() {
        sources.push(DataSource::AggregatorStatus);
    }

    let structured_empty = stats.is_none() && records.is_empty();

    let mut feeder_name = None;
    if let Ok(html) = &results.homepage {
        sources.push(DataSource::Homepage);
        let facts = HomepageParser::new().parse(html);
        feeder_name = facts.feeder_name.clone();

        if structured_empty {
            let mut used = false;

            if let Some(page_stats) = facts.stats() {
                stats
                    .get_or_insert_with(StageStats::default)
                    .fill_missing(&page_stats);
                used = true;
            }
            if cpu_temperature_c.is_none() && facts.cpu_temperature_c.is_some() {
                cpu_temperature_c = facts.cpu_temperature_c;
                used = true;
            }
            if records.is_empty() && !facts.aggregators.is_empty() {
                records = facts.aggregators;
                used = true;
            }

            if used {
                sources.push(DataSource::HtmlFallback);
            }
        }
    }

    let responded = results.stats.is_ok()
        || results.temperatures.is_ok()
        || results.statuses.iter().any(|s| s.result.is_ok())
        || results.homepage.is_ok();

    if !responded {
        let reason = results
            .homepage
            .as_ref()
            .err()
            .map(ToString::to_string)
            .unwrap_or_else(|| "no endpoint responded".to_string());
        warn!(base_url = %results.base_url, error = %reason, "Feeder unreachable");
        return FeederSnapshot::disconnected(
            results.base_url.clone(),
            format!("Connection failed: {reason} ({})", results.base_url),
            captured_at,
        );
    }

    FeederSnapshot {
        base_url: results.base_url.clone(),
        connected: true,
        feeder_name,
        stats,
        cpu_temperature_c,
        aggregators: reconcile(&records),
        fetch_error: None,
        sources,
        timestamp: captured_at,
    }
}

/// Stats from the first element of the `stage2_stats` array
pub fn stats_from_json(value: &Value) -> Option<StageStats> {
    let first = value.as_array()?.first()?;

    let stats = StageStats {
        planes_now: first.get("planes").and_then(non_negative_integer),
        planes_today: first.get("tplanes").and_then(non_negative_integer),
        message_rate: first.get("mps").and_then(non_negative_float),
        position_rate: first.get("pps").and_then(non_negative_float),
        uptime_seconds: first.get("uptime").and_then(non_negative_integer),
    };

    (!stats.is_empty()).then_some(stats)
}

/// CPU temperature in Celsius from the temperatures object
pub fn cpu_temperature_from_json(value: &Value) -> Option<f64> {
    let celsius = match value.get("cpu")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    celsius.filter(|t| t.is_finite())
}

/// Record from a status response keyed by `"0"`
///
/// Missing channel fields read as `unknown`.
pub fn record_from_json(entry: &AggregatorEntry, value: &Value) -> Option<AggregatorRecord> {
    let info = value.get("0")?;
    if !info.is_object() {
        return None;
    }

    let channel = |key: &str| {
        info.get(key)
            .and_then(Value::as_str)
            .map_or(AggregatorStatus::Unknown, AggregatorStatus::from_wire)
    };

    Some(AggregatorRecord::new(
        entry.id,
        entry.display_name,
        channel("beast"),
        channel("mlat"),
    ))
}

fn non_negative_integer(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

fn non_negative_float(value: &Value) -> Option<f64> {
    value.as_f64().filter(|f| f.is_finite() && *f >= 0.0)
}
