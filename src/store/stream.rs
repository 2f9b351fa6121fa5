//! Stream-based store.
//!
//! Receives device snapshots from an async byte stream and keeps them in
//! a [`MemoryStore`]. This is useful for network sources like a TCP relay
//! that forwards the datastore's change events.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use soilwatch_types::Reading;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{DeviceInfo, MemoryStore, ReadingFeed, ReadingStore, StoreError};

/// One line of the stream: a device's full current reading set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceBatch {
    pub device_id: String,
    pub readings: Vec<Reading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<DeviceInfo>,
}

/// A store fed by newline-delimited JSON [`DeviceBatch`] snapshots.
///
/// A background task reads the stream and replaces each device's readings
/// as snapshots arrive; queries and feeds are served from memory. The
/// background task is aborted when the store is dropped.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use soilwatch::StreamStore;
///
/// # tokio_test::block_on(async {
/// let data = br#"{"device_id":"device_001","readings":[]}"#.to_vec();
/// let store = StreamStore::spawn(Cursor::new(data), "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamStore {
    store: MemoryStore,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
    task: JoinHandle<()>,
}

impl StreamStore {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// The reader should provide newline-delimited JSON, one
    /// [`DeviceBatch`] per line. Must be called within a tokio runtime.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let store = MemoryStore::new(description);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();
        let sink = store.clone();

        let task = tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        // EOF
                        *error_handle.lock() = Some("Connection closed".to_string());
                        break;
                    }
                    Ok(_) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        let result = serde_json::from_str::<DeviceBatch>(line.trim())
                            .map_err(StoreError::from);
                        record(&sink, &error_handle, result);
                    }
                    Err(e) => {
                        warn!(error = %e, "stream read failed");
                        *error_handle.lock() = Some(StoreError::from(e).to_string());
                        break;
                    }
                }
            }
        });

        Self {
            store,
            description: format!("stream: {}", description),
            last_error,
            task,
        }
    }

    /// Create a StreamStore from a raw bytes channel.
    ///
    /// Each message is one JSON [`DeviceBatch`]. This is useful when
    /// another component already frames the messages.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let store = MemoryStore::new(description);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();
        let sink = store.clone();

        let task = tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                let result = serde_json::from_slice::<DeviceBatch>(&bytes).map_err(StoreError::from);
                record(&sink, &error_handle, result);
            }
        });

        Self {
            store,
            description: format!("stream: {}", description),
            last_error,
            task,
        }
    }
}

fn record(
    sink: &MemoryStore,
    error_handle: &Mutex<Option<String>>,
    result: Result<DeviceBatch, StoreError>,
) {
    match result {
        Ok(batch) => {
            debug!(
                device_id = %batch.device_id,
                readings = batch.readings.len(),
                "received device snapshot"
            );
            *error_handle.lock() = None;
            if let Some(info) = batch.info {
                sink.set_info(&batch.device_id, info);
            }
            sink.replace(&batch.device_id, batch.readings);
        }
        Err(e) => {
            warn!(error = %e, "skipping malformed device snapshot");
            *error_handle.lock() = Some(e.to_string());
        }
    }
}

impl Drop for StreamStore {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl ReadingStore for StreamStore {
    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    fn list_devices(&self) -> Result<Vec<String>, StoreError> {
        self.store.list_devices()
    }

    fn device_info(&self, device_id: &str) -> Result<Option<DeviceInfo>, StoreError> {
        self.store.device_info(device_id)
    }

    fn fetch_readings(&self, device_id: &str) -> Result<Vec<Reading>, StoreError> {
        self.store.fetch_readings(device_id)
    }

    fn subscribe(&self, device_id: &str) -> Result<Box<dyn ReadingFeed>, StoreError> {
        self.store.subscribe(device_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_line(device_id: &str, timestamps: &[i64]) -> String {
        let readings: Vec<String> = timestamps
            .iter()
            .map(|ts| {
                format!(r#"{{"timestamp":{},"moisture":30,"temperature":20,"ec":800,"ph":6.5}}"#, ts)
            })
            .collect();
        format!(r#"{{"device_id":"{}","readings":[{}]}}"#, device_id, readings.join(","))
    }

    async fn settle() {
        // Give the background task time to process
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_stream_store_spawn() {
        let data = format!("{}\n", sample_line("device_001", &[100, 200]));
        let store = StreamStore::spawn(Cursor::new(data), "test");

        settle().await;

        assert_eq!(store.list_devices().unwrap(), vec!["device_001"]);
        assert_eq!(store.fetch_readings("device_001").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_later_snapshot_replaces_earlier() {
        let data = format!(
            "{}\n\n{}\n",
            sample_line("device_001", &[100, 200]),
            sample_line("device_001", &[300])
        );
        let store = StreamStore::spawn(Cursor::new(data), "test");

        settle().await;

        let readings = store.fetch_readings("device_001").unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].timestamp, 300);
    }

    #[tokio::test]
    async fn test_feed_receives_stream_snapshots() {
        let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
        let store = StreamStore::from_bytes_channel(rx, "test-channel");
        let mut feed = store.subscribe("device_001").unwrap();

        tx.send(sample_line("device_001", &[100]).into_bytes()).await.unwrap();
        settle().await;

        let batch = feed.poll().unwrap();
        assert_eq!(batch.len(), 1);
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_invalid_json_is_skipped() {
        let data = format!("not valid json\n{}\n", sample_line("device_001", &[1]));
        let store = StreamStore::spawn(Cursor::new(data), "test");

        settle().await;

        // The valid line after the bad one is still ingested
        assert_eq!(store.fetch_readings("device_001").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_parse_error_is_reported() {
        let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
        let store = StreamStore::from_bytes_channel(rx, "test");

        tx.send(b"{\"device_id\":".to_vec()).await.unwrap();
        settle().await;

        assert!(store.error().unwrap().contains("Parse error"));
    }

    #[tokio::test]
    async fn test_eof_reports_closed() {
        let store = StreamStore::spawn(Cursor::new(""), "test");
        settle().await;

        assert_eq!(store.error().as_deref(), Some("Connection closed"));
        assert!(store.list_devices().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stream_store_description() {
        let store = StreamStore::spawn(Cursor::new(""), "tcp://localhost:9090");
        assert_eq!(store.description(), "stream: tcp://localhost:9090");
    }
}
