//! Synthetic data for the history and status panels of the dashboard.

use rand::Rng;
use serde::Serialize;

use crate::model::now_timestamp;

const BASE_LAT: f64 = 52.520008;
const BASE_LON: f64 = 13.404954;
const HISTORY_LEN: usize = 10;
const HISTORY_STEP: f64 = 0.001;

#[derive(Debug, Clone, Serialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub speed: u32,
    pub altitude: u32,
    pub timestamp: String,
}

/// A diagonal track heading north-east from a fixed base point, with random speed and
/// altitude on each point.
pub fn synthetic_history<R: Rng>(rng: &mut R) -> Vec<TrackPoint> {
    (0..HISTORY_LEN)
        .map(|i| {
            let offset = i as f64 * HISTORY_STEP;
            TrackPoint {
                lat: BASE_LAT + offset,
                lon: BASE_LON + offset,
                speed: rng.gen_range(0..=80),
                altitude: rng.gen_range(30..=50),
                timestamp: now_timestamp(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackerStatus {
    pub online: bool,
    pub battery: u32,
    pub signal_strength: u32,
    pub last_update: String,
    pub device_id: String,
}

impl TrackerStatus {
    pub fn sample<R: Rng>(rng: &mut R, device_id: &str) -> Self {
        TrackerStatus {
            online: true,
            battery: rng.gen_range(60..=100),
            signal_strength: rng.gen_range(70..=100),
            last_update: now_timestamp(),
            device_id: device_id.to_string(),
        }
    }
}
