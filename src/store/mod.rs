//! Data access for soil readings.
//!
//! This module provides a trait-based abstraction over the realtime
//! datastore. A [`ReadingStore`] is constructed explicitly and handed to
//! the application, so a fake can stand in for the real backend in tests.
//!
//! Realtime updates are delivered through a [`ReadingFeed`]: a lazy,
//! unbounded sequence of full-snapshot batches for one device. Each batch
//! is the device's current reading set (capped at [`FEED_LIMIT`]), never
//! a delta.

mod error;
mod file;
mod memory;
mod schema;
mod stream;

pub use error::StoreError;
pub use file::{FileFeed, FileStore};
pub use memory::{ChannelFeed, MemoryStore};
pub use schema::{DatastoreTree, DeviceInfo, DeviceNode};
pub use stream::{DeviceBatch, StreamStore};

use std::fmt::Debug;

use soilwatch_types::Reading;

use crate::data::{filter_by_range, window_latest, TimeRange};

/// Maximum number of readings in a feed batch.
pub const FEED_LIMIT: usize = 50;

/// Trait for reading soil telemetry from a datastore.
///
/// Implementations only need to fetch a device's raw readings; range
/// queries and latest-reading lookups are derived from that.
///
/// # Example
///
/// ```
/// use soilwatch::{MemoryStore, ReadingStore, TimeRange};
/// use soilwatch_types::Reading;
///
/// let store = MemoryStore::new("example");
/// store.push("device_001", Reading::at(100));
/// store.push("device_001", Reading::at(300));
///
/// let readings = store.query_range("device_001", &TimeRange::new(0, 200)).unwrap();
/// assert_eq!(readings.len(), 1);
/// ```
pub trait ReadingStore: Send + Sync + Debug {
    /// Returns a human-readable description of the store.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;

    /// The last error encountered by background work, if any.
    fn error(&self) -> Option<String> {
        None
    }

    /// All known device ids, sorted. No pagination.
    fn list_devices(&self) -> Result<Vec<String>, StoreError>;

    /// Metadata stored for a device, if any.
    fn device_info(&self, device_id: &str) -> Result<Option<DeviceInfo>, StoreError>;

    /// Every stored reading for a device, in no particular order.
    ///
    /// Unknown devices yield an empty Vec.
    fn fetch_readings(&self, device_id: &str) -> Result<Vec<Reading>, StoreError>;

    /// Readings inside `range` (inclusive), oldest first.
    fn query_range(&self, device_id: &str, range: &TimeRange) -> Result<Vec<Reading>, StoreError> {
        Ok(filter_by_range(&self.fetch_readings(device_id)?, range))
    }

    /// The most recent reading for a device.
    fn latest_reading(&self, device_id: &str) -> Result<Option<Reading>, StoreError> {
        Ok(window_latest(&self.fetch_readings(device_id)?, 1).pop())
    }

    /// Start a realtime feed for a device.
    ///
    /// Each call starts a fresh feed whose first poll delivers the current
    /// snapshot, so resubscribing restarts the sequence.
    fn subscribe(&self, device_id: &str) -> Result<Box<dyn ReadingFeed>, StoreError>;
}

/// A realtime subscription to one device's readings.
///
/// Dropping a feed unsubscribes it.
pub trait ReadingFeed: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(batch)` if the device's readings changed since the
    /// last poll, `None` otherwise. Batches are sorted oldest first and
    /// hold at most [`FEED_LIMIT`] readings. This method must not block.
    fn poll(&mut self) -> Option<Vec<Reading>>;

    /// Returns a human-readable description of the feed.
    fn description(&self) -> &str;

    /// Returns the error message if an error occurred during the last poll.
    fn error(&self) -> Option<&str>;

    /// Stop receiving updates. Calling this more than once is a no-op.
    fn unsubscribe(&mut self);

    /// Whether the feed can still deliver batches.
    fn is_active(&self) -> bool;
}
