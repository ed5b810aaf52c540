//! Continuous monitoring command
//!
//! Runs the poller and prints every delivered snapshot. Lines typed on stdin
//! control the poller while it runs.

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::render::render_snapshot;
use crate::config::{Config, REFRESH_INTERVAL_RANGE};
use crate::models::FeederSnapshot;
use crate::scheduler::{ChannelSink, Poller, PollerHandle};
use crate::utils::normalize_base_url;

/// Control command typed on stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// `r`: refresh now
    Refresh,
    /// `i <secs>`: change the refresh interval
    Interval(Duration),
    /// `u <url>`: switch to another feeder
    BaseUrl(String),
    /// `q`: quit
    Quit,
}

/// Parse one stdin line; blank lines yield `Ok(None)`
pub fn parse_control_line(line: &str) -> std::result::Result<Option<ControlCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();

    let command = match (verb, arg) {
        ("r" | "refresh", None) => ControlCommand::Refresh,
        ("q" | "quit", None) => ControlCommand::Quit,
        ("i" | "interval", Some(secs)) => {
            let secs: u64 = secs
                .parse()
                .map_err(|_| format!("not a number of seconds: {secs}"))?;
            if !REFRESH_INTERVAL_RANGE.contains(&secs) {
                return Err(format!(
                    "interval must be between {} and {} seconds",
                    REFRESH_INTERVAL_RANGE.start(),
                    REFRESH_INTERVAL_RANGE.end()
                ));
            }
            ControlCommand::Interval(Duration::from_secs(secs))
        }
        ("u" | "url", Some(url)) => ControlCommand::BaseUrl(url.to_string()),
        _ => return Err(format!("unknown command: {}", line.trim())),
    };

    if parts.next().is_some() {
        return Err(format!("unexpected arguments: {}", line.trim()));
    }
    Ok(Some(command))
}

/// Watch a feeder until `q`, end of input or Ctrl-C
pub async fn watch(config: &Config, json: bool) -> Result<()> {
    let base_url = normalize_base_url(&config.feeder.base_url)
        .map_err(|e| anyhow::anyhow!("Invalid feeder URL: {e}"))?;

    let (sink, mut snapshots) = ChannelSink::new();
    let handle = Poller::from_config(config, sink).context("Failed to start poller")?;

    println!(
        "Watching {base_url} every {}s (r: refresh, i <secs>: interval, u <url>: feeder, q: quit)",
        config.poller.refresh_interval_secs
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            Some(snapshot) = snapshots.recv() => {
                print_snapshot(&snapshot, json)?;
            }

            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match parse_control_line(&line) {
                    Ok(Some(ControlCommand::Quit)) => break,
                    Ok(Some(command)) => apply(&handle, command),
                    Ok(None) => {}
                    Err(msg) => eprintln!("{msg}"),
                },
                Ok(None) => {
                    tracing::debug!("stdin closed; control commands disabled");
                    stdin_open = false;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stdin");
                    stdin_open = false;
                }
            },

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn apply(handle: &PollerHandle, command: ControlCommand) {
    let result = match command {
        ControlCommand::Refresh => handle.refresh_now(),
        ControlCommand::Interval(interval) => handle.set_interval(interval),
        ControlCommand::BaseUrl(url) => handle.set_base_url(&url),
        ControlCommand::Quit => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("{e}");
    }
}

pub(crate) fn print_snapshot(snapshot: &FeederSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(snapshot)?);
    } else {
        println!("{}", render_snapshot(snapshot));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_control_line("r"), Ok(Some(ControlCommand::Refresh)));
        assert_eq!(parse_control_line("  q  "), Ok(Some(ControlCommand::Quit)));
        assert_eq!(parse_control_line(""), Ok(None));
        assert_eq!(parse_control_line("   "), Ok(None));
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(
            parse_control_line("i 10"),
            Ok(Some(ControlCommand::Interval(Duration::from_secs(10))))
        );
        assert!(parse_control_line("i 0").is_err());
        assert!(parse_control_line("i 61").is_err());
        assert!(parse_control_line("i ten").is_err());
        assert!(parse_control_line("i").is_err());
    }

    #[test]
    fn test_parse_base_url() {
        assert_eq!(
            parse_control_line("u http://10.0.0.5"),
            Ok(Some(ControlCommand::BaseUrl("http://10.0.0.5".to_string())))
        );
        assert!(parse_control_line("u").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_control_line("x").is_err());
        assert!(parse_control_line("r now").is_err());
        assert!(parse_control_line("i 5 6").is_err());
    }
}
