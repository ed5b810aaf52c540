//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

    let re = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

    re.replace_all(text.trim(), " ").to_string()
}

/// Validate a feeder base URL and strip any trailing slash
///
/// Only `http` and `https` URLs with a host are accepted.
pub fn normalize_base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| format!("{trimmed}: {e}"))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("{trimmed}: unsupported scheme '{}'", parsed.scheme()));
    }
    if parsed.host_str().is_none() {
        return Err(format!("{trimmed}: missing host"));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Format an uptime in seconds the way the status card shows it
///
/// Days and hours once the feeder has been up a day, hours and minutes once
/// it has been up an hour, minutes otherwise.
pub fn format_uptime(uptime_secs: u64) -> String {
    let days = uptime_secs / 86_400;
    let hours = (uptime_secs % 86_400) / 3_600;
    let mins = (uptime_secs % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}
