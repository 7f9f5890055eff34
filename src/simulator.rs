use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::Rng;

use crate::model::{now_timestamp, PositionRecord};

/// Largest change in latitude/longitude applied by a single tick, in degrees
pub const MAX_DRIFT: f64 = 0.001;
pub const MAX_SPEED: u32 = 60;

/// Holds the simulated current position of the tracker.
///
/// Every status query moves the position by a small random amount. The drift is unbounded
/// over the life of the process.
pub struct Simulator {
    current: Mutex<PositionRecord>,
}

impl Simulator {
    pub fn new(initial: PositionRecord) -> Self {
        Self {
            current: Mutex::new(initial),
        }
    }

    pub fn tick(&self) -> PositionRecord {
        self.tick_with(&mut rand::thread_rng())
    }

    /// Perturb the current position and return a snapshot of it.
    pub fn tick_with<R: Rng>(&self, rng: &mut R) -> PositionRecord {
        let mut current = self.lock();
        current.lat += rng.gen_range(-MAX_DRIFT..=MAX_DRIFT);
        current.lon += rng.gen_range(-MAX_DRIFT..=MAX_DRIFT);
        current.speed = f64::from(rng.gen_range(0..=MAX_SPEED));
        current.timestamp = now_timestamp();
        current.clone()
    }

    pub fn current(&self) -> PositionRecord {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PositionRecord> {
        // every write leaves the record complete, so a panicked holder can't corrupt it
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
