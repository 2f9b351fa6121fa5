//! In-memory store and channel-based feeds.
//!
//! The memory store holds device readings in a shared map and publishes
//! every change through a tokio watch channel per device. It backs the
//! stream store and doubles as the fake datastore in tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use soilwatch_types::Reading;
use tokio::sync::watch;
use tracing::debug;

use super::{DatastoreTree, DeviceInfo, ReadingFeed, ReadingStore, StoreError, FEED_LIMIT};
use crate::data::window_latest;

/// A store that keeps all readings in memory.
///
/// Cloning is cheap: clones share the same underlying data, so a producer
/// task can push readings while the application queries and subscribes.
///
/// # Example
///
/// ```
/// use soilwatch::{MemoryStore, ReadingStore};
/// use soilwatch_types::Reading;
///
/// let store = MemoryStore::new("demo");
/// let mut feed = store.subscribe("device_001").unwrap();
///
/// store.push("device_001", Reading::at(1_000));
/// assert_eq!(feed.poll().map(|batch| batch.len()), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    devices: Arc<RwLock<BTreeMap<String, DeviceEntry>>>,
    description: String,
}

#[derive(Debug)]
struct DeviceEntry {
    info: Option<DeviceInfo>,
    readings: Vec<Reading>,
    sender: watch::Sender<Vec<Reading>>,
}

impl DeviceEntry {
    fn new() -> Self {
        let (sender, _) = watch::channel(Vec::new());
        Self {
            info: None,
            readings: Vec::new(),
            sender,
        }
    }

    /// Push the current snapshot to every subscriber.
    fn publish(&self) {
        self.sender.send_replace(window_latest(&self.readings, FEED_LIMIT));
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new(description: &str) -> Self {
        Self {
            devices: Arc::new(RwLock::new(BTreeMap::new())),
            description: format!("memory: {}", description),
        }
    }

    /// Create a store seeded from a datastore tree.
    pub fn from_tree(description: &str, tree: DatastoreTree) -> Self {
        let store = Self::new(description);
        for (device_id, node) in tree.devices {
            store.replace(&device_id, node.readings.into_values().collect());
            if let Some(info) = node.info {
                store.set_info(&device_id, info);
            }
        }
        store
    }

    /// Append one reading and notify subscribers.
    pub fn push(&self, device_id: &str, reading: Reading) {
        let mut devices = self.devices.write();
        let entry = devices.entry(device_id.to_string()).or_insert_with(DeviceEntry::new);
        entry.readings.push(reading);
        entry.publish();
    }

    /// Replace a device's readings with a full snapshot and notify subscribers.
    pub fn replace(&self, device_id: &str, readings: Vec<Reading>) {
        let mut devices = self.devices.write();
        let entry = devices.entry(device_id.to_string()).or_insert_with(DeviceEntry::new);
        entry.readings = readings;
        entry.publish();
    }

    /// Attach metadata to a device.
    pub fn set_info(&self, device_id: &str, info: DeviceInfo) {
        let mut devices = self.devices.write();
        devices.entry(device_id.to_string()).or_insert_with(DeviceEntry::new).info = Some(info);
    }
}

impl ReadingStore for MemoryStore {
    fn description(&self) -> &str {
        &self.description
    }

    fn list_devices(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.devices.read().keys().cloned().collect())
    }

    fn device_info(&self, device_id: &str) -> Result<Option<DeviceInfo>, StoreError> {
        Ok(self.devices.read().get(device_id).and_then(|e| e.info.clone()))
    }

    fn fetch_readings(&self, device_id: &str) -> Result<Vec<Reading>, StoreError> {
        Ok(self.devices.read().get(device_id).map(|e| e.readings.clone()).unwrap_or_default())
    }

    fn subscribe(&self, device_id: &str) -> Result<Box<dyn ReadingFeed>, StoreError> {
        // Subscribing to an unknown device registers it, so readings pushed
        // later still reach this feed.
        let mut devices = self.devices.write();
        let entry = devices.entry(device_id.to_string()).or_insert_with(DeviceEntry::new);
        debug!(device_id, "subscribing to memory feed");
        Ok(Box::new(ChannelFeed::new(
            entry.sender.subscribe(),
            &format!("{} [{}]", self.description, device_id),
        )))
    }
}

/// A feed that receives reading snapshots via a watch channel.
///
/// # Example
///
/// ```
/// use soilwatch::{ChannelFeed, ReadingFeed};
/// use soilwatch_types::Reading;
///
/// let (tx, mut feed) = ChannelFeed::create("bridge");
/// tx.send_replace(vec![Reading::at(5)]);
/// assert!(feed.poll().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelFeed {
    receiver: Option<watch::Receiver<Vec<Reading>>>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelFeed {
    /// Create a new channel feed.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `description` - Where snapshots come from
    pub fn new(receiver: watch::Receiver<Vec<Reading>>, description: &str) -> Self {
        Self {
            receiver: Some(receiver),
            description: format!("channel: {}", description),
            initial_returned: false,
        }
    }

    /// Create a channel pair for pushing snapshots into a ChannelFeed.
    pub fn create(description: &str) -> (watch::Sender<Vec<Reading>>, Self) {
        let (tx, rx) = watch::channel(Vec::new());
        (tx, Self::new(rx, description))
    }
}

impl ReadingFeed for ChannelFeed {
    fn poll(&mut self) -> Option<Vec<Reading>> {
        let receiver = self.receiver.as_mut()?;

        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            receiver.mark_changed();
        }

        // Check if there's a new value without blocking
        if !receiver.has_changed().unwrap_or(false) {
            return None;
        }

        let snapshot = receiver.borrow_and_update().clone();
        if snapshot.is_empty() {
            None
        } else {
            Some(window_latest(&snapshot, FEED_LIMIT))
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        // Channel feeds have no error state of their own; producer errors
        // surface through the owning store
        None
    }

    fn unsubscribe(&mut self) {
        self.receiver = None;
    }

    fn is_active(&self) -> bool {
        self.receiver.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TimeRange;
    use soilwatch_types::Field;

    fn timestamps(readings: &[Reading]) -> Vec<i64> {
        readings.iter().map(|r| r.timestamp).collect()
    }

    #[test]
    fn test_channel_feed_poll() {
        let (tx, mut feed) = ChannelFeed::create("test");

        // Initial value is an empty snapshot, which is not delivered
        assert!(feed.poll().is_none());

        tx.send_replace(vec![Reading::at(200), Reading::at(100)]);

        let batch = feed.poll().unwrap();
        assert_eq!(timestamps(&batch), vec![100, 200]);

        // No change, so poll returns None
        assert!(feed.poll().is_none());
    }

    #[test]
    fn test_channel_feed_unsubscribe_is_idempotent() {
        let (tx, mut feed) = ChannelFeed::create("test");
        feed.unsubscribe();
        feed.unsubscribe();

        tx.send_replace(vec![Reading::at(1)]);
        assert!(!feed.is_active());
        assert!(feed.poll().is_none());
    }

    #[test]
    fn test_memory_store_queries() {
        let store = MemoryStore::new("test");
        store.push("device_b", Reading::at(10));
        for ts in [300, 100, 200] {
            store.push("device_a", Reading::at(ts).with(Field::Moisture, ts as f64 / 10.0));
        }

        assert_eq!(store.list_devices().unwrap(), vec!["device_a", "device_b"]);
        assert_eq!(store.fetch_readings("device_a").unwrap().len(), 3);
        assert!(store.fetch_readings("device_c").unwrap().is_empty());

        let ranged = store.query_range("device_a", &TimeRange::new(150, 300)).unwrap();
        assert_eq!(timestamps(&ranged), vec![200, 300]);

        assert_eq!(store.latest_reading("device_a").unwrap().unwrap().timestamp, 300);
    }

    #[test]
    fn test_memory_store_device_info() {
        let store = MemoryStore::new("test");
        let info = DeviceInfo {
            name: Some("Bed 4".to_string()),
            ..DeviceInfo::default()
        };
        store.set_info("device_001", info.clone());

        assert_eq!(store.device_info("device_001").unwrap(), Some(info));
        assert!(store.device_info("device_002").unwrap().is_none());
    }

    #[test]
    fn test_subscription_sees_full_snapshots() {
        let store = MemoryStore::new("test");
        store.push("device_001", Reading::at(100));

        let mut feed = store.subscribe("device_001").unwrap();
        assert_eq!(timestamps(&feed.poll().unwrap()), vec![100]);
        assert!(feed.poll().is_none());

        store.push("device_001", Reading::at(200));
        assert_eq!(timestamps(&feed.poll().unwrap()), vec![100, 200]);
    }

    #[test]
    fn test_subscription_before_device_exists() {
        let store = MemoryStore::new("test");
        let mut feed = store.subscribe("device_new").unwrap();
        assert!(feed.poll().is_none());

        store.push("device_new", Reading::at(7));
        assert_eq!(timestamps(&feed.poll().unwrap()), vec![7]);
    }

    #[test]
    fn test_subscription_caps_at_feed_limit() {
        let store = MemoryStore::new("test");
        store.replace("d", (0..120).map(Reading::at).collect());

        let mut feed = store.subscribe("d").unwrap();
        let batch = feed.poll().unwrap();
        assert_eq!(batch.len(), FEED_LIMIT);
        assert_eq!(batch[0].timestamp, 70);

        // Queries are not capped
        assert_eq!(store.fetch_readings("d").unwrap().len(), 120);
    }

    #[test]
    fn test_resubscribe_restarts_sequence() {
        let store = MemoryStore::new("test");
        store.push("d", Reading::at(1));

        let mut first = store.subscribe("d").unwrap();
        assert!(first.poll().is_some());
        first.unsubscribe();
        store.push("d", Reading::at(2));
        assert!(first.poll().is_none());

        let mut second = store.subscribe("d").unwrap();
        assert_eq!(timestamps(&second.poll().unwrap()), vec![1, 2]);
    }

    #[test]
    fn test_from_tree() {
        let json = r#"{"devices":{"d1":{"info":{"name":"x"},"readings":{
            "-a":{"timestamp":5,"moisture":1,"temperature":2,"ec":3,"ph":7}}}}}"#;
        let tree: DatastoreTree = serde_json::from_str(json).unwrap();

        let store = MemoryStore::from_tree("seed", tree);
        assert_eq!(store.list_devices().unwrap(), vec!["d1"]);
        assert_eq!(store.fetch_readings("d1").unwrap()[0].timestamp, 5);
        assert_eq!(store.device_info("d1").unwrap().unwrap().name.as_deref(), Some("x"));
        assert_eq!(store.description(), "memory: seed");
    }
}
