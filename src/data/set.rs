//! The batch of readings a view is currently showing.

use std::time::Instant;

use soilwatch_types::{Reading, Stats};

use super::aggregate::{compute_stats, window_latest};
use super::range::TimeRange;

/// Where a reading set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A snapshot delivered by a realtime feed.
    Live,
    /// The result of a range query.
    Historical(TimeRange),
}

/// Readings ready for display, with their stats computed.
///
/// Readings are always held oldest first. Stats are `None` only when
/// `readings` is empty.
#[derive(Debug, Clone)]
pub struct ReadingSet {
    pub device_id: String,
    pub readings: Vec<Reading>,
    pub stats: Option<Stats>,
    pub origin: Origin,
    pub received_at: Instant,
}

impl ReadingSet {
    /// Build a set from a live batch, keeping the `window` most recent readings.
    pub fn live(device_id: &str, batch: &[Reading], window: usize) -> Self {
        Self::new(device_id, window_latest(batch, window), Origin::Live)
    }

    /// Build a set from an already filtered and ordered query result.
    pub fn historical(device_id: &str, readings: Vec<Reading>, range: TimeRange) -> Self {
        Self::new(device_id, readings, Origin::Historical(range))
    }

    fn new(device_id: &str, readings: Vec<Reading>, origin: Origin) -> Self {
        let stats = compute_stats(&readings);
        Self {
            device_id: device_id.to_string(),
            readings,
            stats,
            origin,
            received_at: Instant::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// The most recent reading, if any.
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.last()
    }
}
