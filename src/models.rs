// Core data structures for the feederwatch engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::format_uptime;

/// Channel state reported by the feeder for one aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregatorStatus {
    #[default]
    Unknown,
    Good,
    Degraded,
    Intermittent,
    Disconnected,
    Down,
    Bad,
    Error,
}

impl AggregatorStatus {
    /// Parse a wire status string; anything unrecognized is `Unknown`
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "good" => Self::Good,
            "degraded" => Self::Degraded,
            "intermittent" => Self::Intermittent,
            "disconnected" => Self::Disconnected,
            "down" => Self::Down,
            "bad" => Self::Bad,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }

    pub fn is_good(self) -> bool {
        self == Self::Good
    }

    /// Degraded or intermittent
    pub fn is_impaired(self) -> bool {
        matches!(self, Self::Degraded | Self::Intermittent)
    }

    /// Disconnected, down, bad or error
    pub fn is_failed(self) -> bool {
        matches!(self, Self::Disconnected | Self::Down | Self::Bad | Self::Error)
    }
}

impl std::fmt::Display for AggregatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Good => "good",
            Self::Degraded => "degraded",
            Self::Intermittent => "intermittent",
            Self::Disconnected => "disconnected",
            Self::Down => "down",
            Self::Bad => "bad",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// Raw per-aggregator status as obtained from the status endpoint or the
/// homepage scrape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorRecord {
    pub id: String,
    pub display_name: String,
    pub beast_status: AggregatorStatus,
    pub mlat_status: AggregatorStatus,
}

impl AggregatorRecord {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        beast_status: AggregatorStatus,
        mlat_status: AggregatorStatus,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            beast_status,
            mlat_status,
        }
    }
}

/// Three-valued status light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    On,
    Off,
    Warning,
}

impl TriState {
    /// Single-character label for text output
    pub fn label(self) -> &'static str {
        match self {
            Self::On => "✓",
            Self::Warning => "!",
            Self::Off => "✗",
        }
    }
}

/// Four-valued status light (MLAT column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuadState {
    On,
    Off,
    Warning,
    Error,
}

impl QuadState {
    /// Single-character label for text output
    pub fn label(self) -> &'static str {
        match self {
            Self::On => "✓",
            Self::Warning => "!",
            Self::Error => "✗",
            Self::Off => "-",
        }
    }
}

/// Reconciled indicators for one aggregator row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorView {
    pub name: String,
    pub enabled_indicator: TriState,
    pub data_indicator: TriState,
    pub mlat_indicator: QuadState,
}

impl AggregatorView {
    pub fn enabled_tooltip(&self) -> &'static str {
        match self.enabled_indicator {
            TriState::On => "Enabled",
            TriState::Warning => "Degraded",
            TriState::Off => "Disabled",
        }
    }

    pub fn data_tooltip(&self) -> &'static str {
        match self.data_indicator {
            TriState::On => "Sending Data",
            TriState::Warning => "Data Degraded",
            TriState::Off => "No Data",
        }
    }

    pub fn mlat_tooltip(&self) -> &'static str {
        match self.mlat_indicator {
            QuadState::On => "MLAT Active",
            QuadState::Warning => "MLAT Degraded",
            QuadState::Error => "MLAT Down",
            QuadState::Off => "MLAT Not Available",
        }
    }
}

/// Aggregated receiver statistics
///
/// Every field is optional: the stats endpoint may omit keys, and the HTML
/// fallback never reports uptime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageStats {
    pub planes_now: Option<u64>,
    pub planes_today: Option<u64>,
    pub message_rate: Option<f64>,
    pub position_rate: Option<f64>,
    pub uptime_seconds: Option<u64>,
}

impl StageStats {
    /// True when no field is known
    pub fn is_empty(&self) -> bool {
        self.planes_now.is_none()
            && self.planes_today.is_none()
            && self.message_rate.is_none()
            && self.position_rate.is_none()
            && self.uptime_seconds.is_none()
    }

    /// Fill fields that are still unknown from `other`
    pub fn fill_missing(&mut self, other: &StageStats) {
        self.planes_now = self.planes_now.or(other.planes_now);
        self.planes_today = self.planes_today.or(other.planes_today);
        self.message_rate = self.message_rate.or(other.message_rate);
        self.position_rate = self.position_rate.or(other.position_rate);
        self.uptime_seconds = self.uptime_seconds.or(other.uptime_seconds);
    }

    /// Uptime formatted for display, e.g. `1d 2h`
    pub fn uptime_display(&self) -> Option<String> {
        self.uptime_seconds.map(format_uptime)
    }
}

/// Source that contributed data to a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Stats,
    Temperature,
    AggregatorStatus,
    Homepage,
    HtmlFallback,
}

/// Normalized feeder status captured by one fetch cycle
///
/// Built once by the snapshot builder and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeederSnapshot {
    /// Feeder the cycle fetched from
    pub base_url: String,
    pub connected: bool,
    pub feeder_name: Option<String>,
    pub stats: Option<StageStats>,
    pub cpu_temperature_c: Option<f64>,
    pub aggregators: Vec<AggregatorView>,
    pub fetch_error: Option<String>,
    pub sources: Vec<DataSource>,
    pub timestamp: DateTime<Utc>,
}

impl FeederSnapshot {
    /// Snapshot for a cycle in which nothing answered
    pub fn disconnected(
        base_url: impl Into<String>,
        fetch_error: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            connected: false,
            feeder_name: None,
            stats: None,
            cpu_temperature_c: None,
            aggregators: Vec::new(),
            fetch_error: Some(fetch_error.into()),
            sources: Vec::new(),
            timestamp,
        }
    }

    pub fn has_source(&self, source: DataSource) -> bool {
        self.sources.contains(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_wire() {
        assert_eq!(AggregatorStatus::from_wire("good"), AggregatorStatus::Good);
        assert_eq!(AggregatorStatus::from_wire(" Down "), AggregatorStatus::Down);
        assert_eq!(
            AggregatorStatus::from_wire("INTERMITTENT"),
            AggregatorStatus::Intermittent
        );
        assert_eq!(AggregatorStatus::from_wire(""), AggregatorStatus::Unknown);
        assert_eq!(AggregatorStatus::from_wire("n/a"), AggregatorStatus::Unknown);
    }

    #[test]
    fn test_status_classes_are_disjoint() {
        for status in [
            AggregatorStatus::Unknown,
            AggregatorStatus::Good,
            AggregatorStatus::Degraded,
            AggregatorStatus::Intermittent,
            AggregatorStatus::Disconnected,
            AggregatorStatus::Down,
            AggregatorStatus::Bad,
            AggregatorStatus::Error,
        ] {
            let classes = [status.is_good(), status.is_impaired(), status.is_failed()];
            assert!(classes.iter().filter(|c| **c).count() <= 1, "{status}");
        }
    }

    #[test]
    fn test_stats_fill_missing_keeps_existing() {
        let mut stats = StageStats {
            planes_now: Some(12),
            ..Default::default()
        };
        let html = StageStats {
            planes_now: Some(2),
            planes_today: Some(50),
            ..Default::default()
        };
        stats.fill_missing(&html);

        assert_eq!(stats.planes_now, Some(12));
        assert_eq!(stats.planes_today, Some(50));
        assert!(stats.uptime_seconds.is_none());
    }

    #[test]
    fn test_uptime_display() {
        let stats = StageStats {
            uptime_seconds: Some(93_784),
            ..Default::default()
        };
        assert_eq!(stats.uptime_display().as_deref(), Some("1d 2h"));
        assert!(StageStats::default().uptime_display().is_none());
        assert!(StageStats::default().is_empty());
    }

    #[test]
    fn test_disconnected_snapshot() {
        let snapshot = FeederSnapshot::disconnected(
            "http://10.0.0.5",
            "Connection failed: refused",
            Utc::now(),
        );
        assert!(!snapshot.connected);
        assert_eq!(snapshot.base_url, "http://10.0.0.5");
        assert!(snapshot.stats.is_none());
        assert!(snapshot.aggregators.is_empty());
        assert_eq!(
            snapshot.fetch_error.as_deref(),
            Some("Connection failed: refused")
        );
    }
}
