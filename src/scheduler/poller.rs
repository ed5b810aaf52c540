//! Background poller
//!
//! A single task owns the refresh timer, the current client and the cycle
//! state. Everything else talks to it through a [`PollerHandle`], which only
//! enqueues commands. At most one fetch cycle runs at a time: timer ticks and
//! manual refreshes that arrive while a cycle is in flight are dropped.
//!
//! ```text
//!            tick / RefreshNow
//!   ┌──────┐ ─────────────────▶ ┌───────────────┐
//!   │ Idle │                    │ FetchInFlight │
//!   └──────┘ ◀───────────────── └───────────────┘
//!            cycle completes
//!            (snapshot delivered)
//! ```

use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::cadence::Cadence;
use super::error::{PollerError, SchedulerResult};
use crate::catalog::{AggregatorEntry, AGGREGATORS};
use crate::client::FeederClient;
use crate::config::Config;
use crate::models::FeederSnapshot;
use crate::snapshot::{assemble, collect};
use crate::utils::normalize_base_url;

// ============================================================================
// State and Commands
// ============================================================================

/// Cycle state of the poller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollerState {
    /// No cycle running
    #[default]
    Idle,

    /// A fetch cycle is running
    FetchInFlight,
}

impl std::fmt::Display for PollerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::FetchInFlight => write!(f, "fetching"),
        }
    }
}

/// Commands accepted by the poller task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerCommand {
    /// Start a cycle now unless one is already running
    RefreshNow,

    /// Change the refresh interval
    SetInterval(Duration),

    /// Point subsequent cycles at another feeder
    SetBaseUrl(String),

    /// Stop the poller, abandoning any in-flight cycle
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
enum CycleTrigger {
    Timer,
    Manual,
}

// ============================================================================
// Snapshot Delivery
// ============================================================================

/// Receiver of completed snapshots
///
/// Called from the poller task, once per completed cycle. Implementations
/// should hand the snapshot off quickly.
pub trait SnapshotSink: Send + Sync + 'static {
    fn deliver(&self, snapshot: FeederSnapshot);
}

impl<F> SnapshotSink for F
where
    F: Fn(FeederSnapshot) + Send + Sync + 'static,
{
    fn deliver(&self, snapshot: FeederSnapshot) {
        self(snapshot)
    }
}

/// Sink that forwards snapshots over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<FeederSnapshot>,
}

impl ChannelSink {
    /// Create a sink and the receiver its snapshots arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FeederSnapshot>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SnapshotSink for ChannelSink {
    fn deliver(&self, snapshot: FeederSnapshot) {
        if self.tx.send(snapshot).is_err() {
            debug!("Snapshot receiver dropped; discarding snapshot");
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Timing settings for a poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerSettings {
    /// Time between timer ticks
    pub interval: Duration,

    /// Time between spawning and the first tick
    pub startup_delay: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            startup_delay: Duration::from_millis(500),
        }
    }
}

impl PollerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.refresh_interval(),
            startup_delay: config.startup_delay(),
        }
    }

    /// Set the refresh interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the startup delay
    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }
}

// ============================================================================
// Poller
// ============================================================================

/// Owner of the refresh loop; consumed by [`Poller::spawn`]
pub struct Poller {
    client: FeederClient,
    catalog: &'static [AggregatorEntry],
    cadence: Cadence,
    state: PollerState,
    state_tx: watch::Sender<PollerState>,
    command_rx: mpsc::UnboundedReceiver<PollerCommand>,
    sink: Box<dyn SnapshotSink>,
    completed_cycles: u64,
}

impl Poller {
    /// Spawn the poller task for `client` and return its handle
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `PollerError::InvalidInterval` if `settings.interval` is zero
    pub fn spawn<S>(
        client: FeederClient,
        settings: PollerSettings,
        sink: S,
    ) -> SchedulerResult<PollerHandle>
    where
        S: SnapshotSink,
    {
        Self::spawn_with_catalog(client, settings, AGGREGATORS, sink)
    }

    /// Spawn a poller that probes only the aggregators in `catalog`
    ///
    /// # Errors
    ///
    /// Returns `PollerError::InvalidInterval` if `settings.interval` is zero
    pub fn spawn_with_catalog<S>(
        client: FeederClient,
        settings: PollerSettings,
        catalog: &'static [AggregatorEntry],
        sink: S,
    ) -> SchedulerResult<PollerHandle>
    where
        S: SnapshotSink,
    {
        validate_interval(settings.interval)?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PollerState::Idle);

        let poller = Self {
            client,
            catalog,
            cadence: Cadence::new(settings.interval, settings.startup_delay, Instant::now()),
            state: PollerState::Idle,
            state_tx,
            command_rx,
            sink: Box::new(sink),
            completed_cycles: 0,
        };

        let task = tokio::spawn(poller.run());

        Ok(PollerHandle {
            command_tx,
            state_rx,
            task,
        })
    }

    /// Build a client from `config` and spawn a poller with its settings
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is unusable or the
    /// configured interval is zero
    pub fn from_config<S>(config: &Config, sink: S) -> crate::error::Result<PollerHandle>
    where
        S: SnapshotSink,
    {
        let client = FeederClient::from_config(&config.feeder)?;
        Ok(Self::spawn(client, PollerSettings::from_config(config), sink)?)
    }

    async fn run(mut self) {
        info!(
            base_url = %self.client.base_url(),
            interval_secs = self.cadence.interval().as_secs_f64(),
            "Poller started"
        );

        let mut cycles: JoinSet<FeederSnapshot> = JoinSet::new();
        let timer = tokio::time::sleep_until(self.cadence.next_deadline());
        tokio::pin!(timer);

        loop {
            tokio::select! {
                () = &mut timer => {
                    self.cadence.record_tick(Instant::now());
                    timer.as_mut().reset(self.cadence.next_deadline());
                    self.start_cycle(CycleTrigger::Timer, &mut cycles);
                }

                Some(joined) = cycles.join_next() => {
                    self.set_state(PollerState::Idle);
                    match joined {
                        Ok(snapshot) => self.deliver(snapshot),
                        Err(e) => error!(error = %e, "Fetch cycle task failed"),
                    }
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(PollerCommand::Shutdown) | None => break,
                        Some(PollerCommand::RefreshNow) => {
                            self.start_cycle(CycleTrigger::Manual, &mut cycles);
                        }
                        Some(PollerCommand::SetInterval(interval)) => {
                            self.cadence.set_interval(interval);
                            timer.as_mut().reset(self.cadence.next_deadline());
                            info!(interval_secs = interval.as_secs_f64(), "Refresh interval changed");
                        }
                        Some(PollerCommand::SetBaseUrl(url)) => self.switch_base_url(&url),
                    }
                }
            }
        }

        if !cycles.is_empty() {
            debug!("Abandoning in-flight fetch cycle");
            cycles.abort_all();
        }
        self.set_state(PollerState::Idle);

        info!(completed_cycles = self.completed_cycles, "Poller stopped");
    }

    fn start_cycle(&mut self, trigger: CycleTrigger, cycles: &mut JoinSet<FeederSnapshot>) {
        if self.state == PollerState::FetchInFlight {
            warn!(?trigger, "Fetch cycle already in flight, skipping");
            return;
        }

        debug!(?trigger, base_url = %self.client.base_url(), "Starting fetch cycle");
        self.set_state(PollerState::FetchInFlight);

        let client = self.client.clone();
        let catalog = self.catalog;
        cycles.spawn(async move {
            let results = collect(&client, catalog).await;
            assemble(&results, Utc::now())
        });
    }

    fn deliver(&mut self, snapshot: FeederSnapshot) {
        self.completed_cycles += 1;
        info!(
            cycle = self.completed_cycles,
            connected = snapshot.connected,
            aggregators = snapshot.aggregators.len(),
            "Delivering snapshot"
        );
        self.sink.deliver(snapshot);
    }

    fn switch_base_url(&mut self, url: &str) {
        match self.client.with_base_url(url) {
            Ok(client) => {
                info!(
                    from = %self.client.base_url(),
                    to = %client.base_url(),
                    "Feeder URL changed"
                );
                self.client = client;
            }
            Err(e) => warn!(error = %e, "Ignoring feeder URL change"),
        }
    }

    fn set_state(&mut self, state: PollerState) {
        self.state = state;
        self.state_tx.send_replace(state);
    }
}

fn validate_interval(interval: Duration) -> SchedulerResult<()> {
    if interval.is_zero() {
        return Err(PollerError::InvalidInterval { interval });
    }
    Ok(())
}

// ============================================================================
// Handle
// ============================================================================

/// Control surface for a running poller
///
/// Methods only enqueue commands and return immediately; their effects are
/// applied by the poller task in the order they were sent.
#[derive(Debug)]
pub struct PollerHandle {
    command_tx: mpsc::UnboundedSender<PollerCommand>,
    state_rx: watch::Receiver<PollerState>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Request an immediate cycle; ignored while one is in flight
    ///
    /// Does not move the timer schedule.
    ///
    /// # Errors
    ///
    /// Returns `PollerError::Stopped` if the poller task has exited
    pub fn refresh_now(&self) -> SchedulerResult<()> {
        self.send(PollerCommand::RefreshNow)
    }

    /// Change the refresh interval
    ///
    /// The next tick fires `interval` after the previous one; an in-flight
    /// cycle is not interrupted.
    ///
    /// # Errors
    ///
    /// Returns `PollerError::InvalidInterval` for a zero interval, or
    /// `PollerError::Stopped` if the poller task has exited
    pub fn set_interval(&self, interval: Duration) -> SchedulerResult<()> {
        validate_interval(interval)?;
        self.send(PollerCommand::SetInterval(interval))
    }

    /// Point subsequent cycles at another feeder
    ///
    /// An in-flight cycle finishes against the old URL.
    ///
    /// # Errors
    ///
    /// Returns `PollerError::InvalidBaseUrl` if `url` is not an http(s) URL,
    /// or `PollerError::Stopped` if the poller task has exited
    pub fn set_base_url(&self, url: &str) -> SchedulerResult<()> {
        let url = normalize_base_url(url).map_err(PollerError::invalid_base_url)?;
        self.send(PollerCommand::SetBaseUrl(url))
    }

    /// Current cycle state
    pub fn state(&self) -> PollerState {
        *self.state_rx.borrow()
    }

    /// Watch cycle state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<PollerState> {
        self.state_rx.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the poller and wait for its task to exit
    ///
    /// An in-flight cycle is abandoned and its snapshot is never delivered.
    pub async fn shutdown(self) {
        let _ = self.command_tx.send(PollerCommand::Shutdown);
        if let Err(e) = self.task.await {
            error!(error = %e, "Poller task ended abnormally");
        }
    }

    fn send(&self, command: PollerCommand) -> SchedulerResult<()> {
        self.command_tx
            .send(command)
            .map_err(|_| PollerError::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn unreachable_client() -> FeederClient {
        FeederClient::with_timeout("http://127.0.0.1:1", Duration::from_millis(200)).unwrap()
    }

    #[test]
    fn test_validate_interval() {
        assert!(validate_interval(Duration::from_secs(1)).is_ok());
        assert_eq!(
            validate_interval(Duration::ZERO),
            Err(PollerError::InvalidInterval {
                interval: Duration::ZERO
            })
        );
    }

    #[test]
    fn test_settings_builders() {
        let settings = PollerSettings::default()
            .with_interval(Duration::from_secs(10))
            .with_startup_delay(Duration::ZERO);
        assert_eq!(settings.interval, Duration::from_secs(10));
        assert_eq!(settings.startup_delay, Duration::ZERO);

        let from_config = PollerSettings::from_config(&Config::default());
        assert_eq!(from_config, PollerSettings::default());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PollerState::Idle.to_string(), "idle");
        assert_eq!(PollerState::FetchInFlight.to_string(), "fetching");
    }

    #[test]
    fn test_closure_sink() {
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        let sink = move |_snapshot: FeederSnapshot| {
            *counter.lock().unwrap() += 1;
        };
        sink.deliver(FeederSnapshot::disconnected("http://10.0.0.5", "down", Utc::now()));
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.deliver(FeederSnapshot::disconnected("http://10.0.0.5", "down", Utc::now()));
    }

    #[tokio::test]
    async fn test_spawn_rejects_zero_interval() {
        let settings = PollerSettings::default().with_interval(Duration::ZERO);
        let (sink, _rx) = ChannelSink::new();
        let result = Poller::spawn(unreachable_client(), settings, sink);
        assert!(matches!(result, Err(PollerError::InvalidInterval { .. })));
    }

    #[tokio::test]
    async fn test_handle_validates_before_sending() {
        let settings = PollerSettings::default().with_startup_delay(Duration::from_secs(60));
        let (sink, _rx) = ChannelSink::new();
        let handle = Poller::spawn(unreachable_client(), settings, sink).unwrap();

        assert!(matches!(
            handle.set_interval(Duration::ZERO),
            Err(PollerError::InvalidInterval { .. })
        ));
        assert!(matches!(
            handle.set_base_url("adsb-feeder.local"),
            Err(PollerError::InvalidBaseUrl { .. })
        ));
        assert!(handle.set_base_url("http://10.0.0.5/").is_ok());
        assert!(handle.set_interval(Duration::from_secs(30)).is_ok());
        assert_eq!(handle.state(), PollerState::Idle);
        assert!(handle.is_running());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_total_failure_is_delivered() {
        let settings = PollerSettings::default().with_startup_delay(Duration::ZERO);
        let (sink, mut rx) = ChannelSink::new();
        let handle =
            Poller::spawn_with_catalog(unreachable_client(), settings, &AGGREGATORS[..1], sink)
                .unwrap();

        let snapshot = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(!snapshot.connected);
        assert!(snapshot
            .fetch_error
            .as_deref()
            .unwrap()
            .starts_with("Connection failed"));

        handle.shutdown().await;
    }
}
