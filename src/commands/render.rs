//! Plain-text rendering of feeder snapshots

use chrono::Local;
use std::fmt::Write;

use crate::models::{AggregatorView, FeederSnapshot};

/// Placeholder for a value the feeder did not report
pub const MISSING: &str = "—";

const FEEDER_TITLE: &str = "ADS-B Feeder";

/// Render one snapshot as a status panel
pub fn render_snapshot(snapshot: &FeederSnapshot) -> String {
    let mut out = String::new();

    if !snapshot.connected {
        let banner = snapshot
            .fetch_error
            .as_deref()
            .unwrap_or("Connection failed");
        let _ = writeln!(out, "{banner}");
        let _ = writeln!(out, "Disconnected");
        return out;
    }

    let updated = snapshot.timestamp.with_timezone(&Local).format("%H:%M:%S");
    let _ = writeln!(out, "Connected to {}", snapshot.base_url);
    let _ = writeln!(out, "Updated: {updated}");
    match snapshot.feeder_name.as_deref() {
        Some(name) => {
            let _ = writeln!(out, "{FEEDER_TITLE}: {name}");
        }
        None => {
            let _ = writeln!(out, "{FEEDER_TITLE}");
        }
    }
    out.push('\n');

    let stats = snapshot.stats.clone().unwrap_or_default();
    let cards = [
        ("Aircraft Now", display(stats.planes_now), "tracking"),
        ("Aircraft Today", display(stats.planes_today), "total seen"),
        ("Message Rate", display(stats.message_rate), "msg/sec"),
        ("Position Rate", display(stats.position_rate), "pos/sec"),
        (
            "Temperature",
            snapshot
                .cpu_temperature_c
                .map_or_else(|| MISSING.to_string(), |t| format!("{t}°C")),
            "",
        ),
        (
            "Uptime",
            stats
                .uptime_display()
                .unwrap_or_else(|| MISSING.to_string()),
            "",
        ),
    ];
    for (title, value, unit) in cards {
        let line = format!("  {title:<16}{value:<10}{unit}");
        let _ = writeln!(out, "{}", line.trim_end());
    }

    if !snapshot.aggregators.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "Aggregators");
        let _ = writeln!(out, "  {:<20}{:<13}{:<17}MLAT", "Name", "Enabled", "Data");
        for view in &snapshot.aggregators {
            let _ = writeln!(out, "{}", aggregator_row(view));
        }
    }

    out
}

fn aggregator_row(view: &AggregatorView) -> String {
    let enabled = format!("{} {}", view.enabled_indicator.label(), view.enabled_tooltip());
    let data = format!("{} {}", view.data_indicator.label(), view.data_tooltip());
    format!(
        "  {:<20}{:<13}{:<17}{} {}",
        view.name,
        enabled,
        data,
        view.mlat_indicator.label(),
        view.mlat_tooltip()
    )
}

fn display<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}
