//! feederwatch - ADS-B feeder status monitor
//!
//! Polls the web interface of an ADS-B feeder appliance, normalizes what it
//! finds into immutable snapshots and hands each snapshot to a consumer.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`client`] - Timed HTTP requests against a feeder
//! - [`catalog`] - Known aggregators and their endpoint ids
//! - [`parser`] - Homepage scraping for the name and fallback facts
//! - [`reconcile`] - Status pairs to indicator lights
//! - [`snapshot`] - One fetch cycle, collected and assembled
//! - [`scheduler`] - Background poller with a refresh cadence
//! - [`models`] - Core data structures and types
//! - [`commands`] - Terminal rendering and commands
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use feederwatch::client::FeederClient;
//! use feederwatch::snapshot::fetch_snapshot;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = FeederClient::new("http://adsb-feeder.local")?;
//!     let snapshot = fetch_snapshot(&client).await;
//!     println!("connected: {}", snapshot.connected);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod reconcile;
pub mod scheduler;
pub mod snapshot;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::client::FeederClient;
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::{AggregatorView, FeederSnapshot, QuadState, StageStats, TriState};
    pub use crate::scheduler::{ChannelSink, Poller, PollerHandle, PollerSettings, SnapshotSink};
    pub use crate::snapshot::fetch_snapshot;
}

// Direct re-exports for convenience
pub use models::{AggregatorView, FeederSnapshot, StageStats};
