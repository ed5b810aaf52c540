//! Fixed aggregator catalogs
//!
//! Two lists: the aggregators queried through `/api/status/{id}`, in query
//! order, and the search tokens used to spot aggregators on the homepage when
//! the status API is unavailable.

/// Aggregator known to the feeder's status API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorEntry {
    /// Identifier used in `/api/status/{id}`
    pub id: &'static str,
    /// Name shown in the status table
    pub display_name: &'static str,
}

impl AggregatorEntry {
    pub fn status_path(&self) -> String {
        format!("/api/status/{}", self.id)
    }
}

/// Aggregator recognizable on the feeder homepage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlAggregatorEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Matched case-insensitively against the page body
    pub search_token: &'static str,
}

const fn entry(id: &'static str, display_name: &'static str) -> AggregatorEntry {
    AggregatorEntry { id, display_name }
}

const fn html_entry(
    id: &'static str,
    display_name: &'static str,
    search_token: &'static str,
) -> HtmlAggregatorEntry {
    HtmlAggregatorEntry {
        id,
        display_name,
        search_token,
    }
}

/// Status API catalog, in query order
pub const AGGREGATORS: &[AggregatorEntry] = &[
    entry("adsblol", "adsb.lol"),
    entry("flyitaly", "Fly Italy ADSB"),
    entry("avdelphi", "AVDelphi"),
    entry("planespotters", "Planespotters"),
    entry("theairtraffic", "TheAirTraffic"),
    entry("adsbfi", "adsb.fi"),
    entry("adsbx", "ADSBExchange"),
    entry("hpradar", "HPRadar"),
    entry("alive", "airplanes.live"),
    entry("flightradar", "flightradar24"),
    entry("radarbox", "RadarBox"),
    entry("planewatch", "Plane.watch"),
    entry("adsbhub", "ADSBHub"),
    entry("opensky", "OpenSky"),
    entry("radarplane", "RadarPlane"),
    entry("tat", "TheAirTraffic"),
];

/// Homepage catalog, in display order
pub const HTML_AGGREGATORS: &[HtmlAggregatorEntry] = &[
    html_entry("adsblol", "adsb.lol", "adsb.lol"),
    html_entry("flyitaly", "Fly Italy ADSB", "flyitalyadsb"),
    html_entry("avdelphi", "AVDelphi", "avdelphi"),
    html_entry("planespotters", "Planespotters", "planespotters"),
    html_entry("theairtraffic", "TheAirTraffic", "theairtraffic"),
    html_entry("adsbfi", "adsb.fi", "adsb.fi"),
    html_entry("adsbx", "ADSBExchange", "adsbexchange"),
    html_entry("hpradar", "HPRadar", "hpradar"),
    html_entry("flightradar", "flightradar24", "flightradar24"),
    html_entry("flightaware", "FlightAware", "flightaware"),
    html_entry("radarbox", "RadarBox", "radarbox"),
    html_entry("adsbhub", "ADSB Hub", "adsbhub"),
];
