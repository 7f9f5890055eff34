use chrono::Local;
use serde::{Deserialize, Serialize};

pub const FALLBACK_LAT: f64 = 51.33176012978327;
pub const FALLBACK_LON: f64 = 12.610844615278952;
pub const FALLBACK_ALTITUDE: f64 = 34.0;
pub const FALLBACK_LOCATION: &str = "Brandis, Deutschland";

/// A single GPS fix as served by the dashboard API.
///
/// Field names on the wire are the short `lat`/`lon` forms the front-end reads.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PositionRecord {
    pub lat: f64,
    pub lon: f64,
    pub location: String,
    pub speed: f64,
    pub altitude: f64,
    // verbatim from the export for loaded rows, otherwise `now_timestamp()`
    pub timestamp: String,
}

impl PositionRecord {
    /// Hardcoded position used when no export data is available.
    pub fn fallback() -> Self {
        PositionRecord {
            lat: FALLBACK_LAT,
            lon: FALLBACK_LON,
            location: FALLBACK_LOCATION.to_string(),
            speed: 0.0,
            altitude: FALLBACK_ALTITUDE,
            timestamp: now_timestamp(),
        }
    }
}

/// Local time as `YYYY-MM-DDTHH:MM:SS.ffffff`, without an offset.
pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
