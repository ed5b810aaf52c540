//! Single fetch cycle command

use anyhow::{Context, Result};

use super::watch::print_snapshot;
use crate::client::FeederClient;
use crate::config::Config;
use crate::snapshot::fetch_snapshot;

/// Run one fetch cycle against the configured feeder and print it
pub async fn once(config: &Config, json: bool) -> Result<()> {
    let client = FeederClient::from_config(&config.feeder).context("Failed to create client")?;

    let snapshot = fetch_snapshot(&client).await;
    tracing::info!(
        connected = snapshot.connected,
        aggregators = snapshot.aggregators.len(),
        "Fetch cycle complete"
    );

    print_snapshot(&snapshot, json)
}
