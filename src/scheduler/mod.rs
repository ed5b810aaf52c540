//! Refresh scheduling
//!
//! Drives fetch cycles against a feeder on a fixed cadence and delivers each
//! completed snapshot to a consumer.
//!
//! # Modules
//!
//! - [`cadence`] - Timer deadline bookkeeping
//! - [`poller`] - Background task, command channel and handle
//! - [`error`] - Control operation errors
//!
//! # Example
//!
//! ```no_run
//! use feederwatch::client::FeederClient;
//! use feederwatch::scheduler::{ChannelSink, Poller, PollerSettings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = FeederClient::new("http://adsb-feeder.local")?;
//! let (sink, mut snapshots) = ChannelSink::new();
//! let handle = Poller::spawn(client, PollerSettings::default(), sink)?;
//!
//! if let Some(snapshot) = snapshots.recv().await {
//!     println!("connected: {}", snapshot.connected);
//! }
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod cadence;
pub mod error;
pub mod poller;

pub use cadence::Cadence;
pub use error::{PollerError, SchedulerResult};
pub use poller::{
    ChannelSink, Poller, PollerCommand, PollerHandle, PollerSettings, PollerState, SnapshotSink,
};
