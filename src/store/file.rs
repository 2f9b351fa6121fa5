//! File-based store.
//!
//! Reads a JSON export of the datastore tree from disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use soilwatch_types::Reading;
use tracing::debug;

use super::{DatastoreTree, DeviceInfo, ReadingFeed, ReadingStore, StoreError, FEED_LIMIT};
use crate::data::window_latest;

/// A store backed by a JSON export of the datastore tree.
///
/// Every query re-reads the file, so edits made by an external sync job
/// are picked up without restarting. Feeds poll the file's modification
/// time and only deliver a batch when the file has been updated.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    description: String,
}

impl FileStore {
    /// Create a new file store for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole tree.
    pub fn load(&self) -> Result<DatastoreTree, StoreError> {
        read_tree(&self.path)
    }
}

fn read_tree(path: &Path) -> Result<DatastoreTree, StoreError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

impl ReadingStore for FileStore {
    fn description(&self) -> &str {
        &self.description
    }

    fn list_devices(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.load()?.device_ids())
    }

    fn device_info(&self, device_id: &str) -> Result<Option<DeviceInfo>, StoreError> {
        let mut tree = self.load()?;
        Ok(tree.devices.remove(device_id).and_then(|node| node.info))
    }

    fn fetch_readings(&self, device_id: &str) -> Result<Vec<Reading>, StoreError> {
        Ok(self.load()?.readings(device_id))
    }

    fn subscribe(&self, device_id: &str) -> Result<Box<dyn ReadingFeed>, StoreError> {
        debug!(path = %self.path.display(), device_id, "subscribing to file feed");
        Ok(Box::new(FileFeed::new(&self.path, device_id)))
    }
}

/// A feed that polls a datastore export for one device's readings.
#[derive(Debug)]
pub struct FileFeed {
    path: PathBuf,
    device_id: String,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    active: bool,
}

impl FileFeed {
    /// Create a feed for `device_id` in the export at `path`.
    pub fn new<P: AsRef<Path>>(path: P, device_id: &str) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {} [{}]", path.display(), device_id);
        Self {
            path,
            device_id: device_id.to_string(),
            description,
            last_error: None,
            last_modified: None,
            active: true,
        }
    }

    /// Get the file's modification time.
    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }
}

impl ReadingFeed for FileFeed {
    fn poll(&mut self) -> Option<Vec<Reading>> {
        if !self.active {
            return None;
        }

        let current_modified = self.get_modified_time();

        // Check if file has been modified since last read
        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep the last batch
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }

        match read_tree(&self.path) {
            Ok(tree) => {
                self.last_error = None;
                self.last_modified = current_modified;
                let readings = tree.readings(&self.device_id);
                // A device node that doesn't exist yet produces no batch
                if readings.is_empty() {
                    return None;
                }
                Some(window_latest(&readings, FEED_LIMIT))
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn unsubscribe(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
