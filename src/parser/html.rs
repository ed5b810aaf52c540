//! Feeder homepage scraper
//!
//! Pattern-based extraction of feeder facts from the homepage markup. Every
//! extraction is independent: a miss only leaves its own field empty.

use regex::{Captures, Regex};
use scraper::Html;
use std::cell::OnceCell;
use std::sync::OnceLock;

use crate::catalog::{HtmlAggregatorEntry, HTML_AGGREGATORS};
use crate::models::{AggregatorRecord, AggregatorStatus, StageStats};
use crate::utils::normalize_whitespace;

/// Compiled homepage patterns
struct PagePatterns {
    feeder_name: Regex,
    rates: Regex,
    counts: Regex,
    cpu_temperature: Regex,
}

fn patterns() -> &'static PagePatterns {
    static PATTERNS: OnceLock<PagePatterns> = OnceLock::new();

    PATTERNS.get_or_init(|| PagePatterns {
        feeder_name: Regex::new(r"Homepage for (\w+)").expect("Invalid regex pattern"),
        rates: Regex::new(r"([\d.]+)\s*pos\s*/\s*([\d.]+)\s*msg per sec")
            .expect("Invalid regex pattern"),
        counts: Regex::new(r"(\d+)\s*planes?\s*/\s*(\d+)\s*today").expect("Invalid regex pattern"),
        cpu_temperature: Regex::new(r"(?i)CPU[:\s]*(\d+)°?C?").expect("Invalid regex pattern"),
    })
}

/// Facts recovered from the homepage; anything not found stays `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFacts {
    pub feeder_name: Option<String>,
    pub planes_now: Option<u64>,
    pub planes_today: Option<u64>,
    pub message_rate: Option<f64>,
    pub position_rate: Option<f64>,
    pub cpu_temperature_c: Option<f64>,
    pub aggregators: Vec<AggregatorRecord>,
}

impl PageFacts {
    /// Counts and rates as stats, or `None` when the page had neither
    pub fn stats(&self) -> Option<StageStats> {
        let stats = StageStats {
            planes_now: self.planes_now,
            planes_today: self.planes_today,
            message_rate: self.message_rate,
            position_rate: self.position_rate,
            uptime_seconds: None,
        };
        (!stats.is_empty()).then_some(stats)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Raw markup plus its visible text, extracted on first use
struct Page<'a> {
    raw: &'a str,
    text: OnceCell<String>,
}

impl<'a> Page<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            text: OnceCell::new(),
        }
    }

    fn text(&self) -> &str {
        self.text.get_or_init(|| {
            let document = Html::parse_document(self.raw);
            let text: Vec<&str> = document.root_element().text().collect();
            normalize_whitespace(&text.join(" "))
        })
    }

    /// Match against the markup first, then against the visible text
    fn captures(&self, re: &Regex) -> Option<Captures<'_>> {
        re.captures(self.raw).or_else(|| re.captures(self.text()))
    }
}

/// Homepage parser for the HTML fallback path
#[derive(Debug, Clone)]
pub struct HomepageParser {
    catalog: &'static [HtmlAggregatorEntry],
}

impl Default for HomepageParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HomepageParser {
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(HTML_AGGREGATORS)
    }

    #[must_use]
    pub fn with_catalog(catalog: &'static [HtmlAggregatorEntry]) -> Self {
        Self { catalog }
    }

    /// Extract every fact the page offers. Never fails.
    pub fn parse(&self, html: &str) -> PageFacts {
        let page = Page::new(html);
        let patterns = patterns();

        let feeder_name = page
            .captures(&patterns.feeder_name)
            .map(|caps| caps[1].to_string());

        let (position_rate, message_rate) = page
            .captures(&patterns.rates)
            .and_then(|caps| Some((caps[1].parse::<f64>().ok()?, caps[2].parse::<f64>().ok()?)))
            .map_or((None, None), |(pos, msg)| (Some(pos), Some(msg)));

        let (planes_now, planes_today) = page
            .captures(&patterns.counts)
            .and_then(|caps| Some((caps[1].parse::<u64>().ok()?, caps[2].parse::<u64>().ok()?)))
            .map_or((None, None), |(now, today)| (Some(now), Some(today)));

        let cpu_temperature_c = page
            .captures(&patterns.cpu_temperature)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .map(f64::from);

        PageFacts {
            feeder_name,
            planes_now,
            planes_today,
            message_rate,
            position_rate,
            cpu_temperature_c,
            aggregators: self.detect_aggregators(html),
        }
    }

    /// Aggregators whose search token appears anywhere in the page
    ///
    /// The page cannot tell feed quality apart, so a hit is reported as a
    /// good beast feed with unknown MLAT.
    pub fn detect_aggregators(&self, html: &str) -> Vec<AggregatorRecord> {
        let haystack = html.to_lowercase();

        self.catalog
            .iter()
            .filter(|entry| haystack.contains(entry.search_token))
            .map(|entry| {
                AggregatorRecord::new(
                    entry.id,
                    entry.display_name,
                    AggregatorStatus::Good,
                    AggregatorStatus::Unknown,
                )
            })
            .collect()
    }
}

/// Parse a homepage with the default catalog
pub fn parse_homepage(html: &str) -> PageFacts {
    HomepageParser::new().parse(html)
}
