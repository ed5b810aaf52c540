//! HTML parsing and data extraction
//!
//! This module handles scraping the feeder homepage when the structured
//! JSON endpoints are unavailable.

pub mod html;

pub use html::{parse_homepage, HomepageParser, PageFacts};
