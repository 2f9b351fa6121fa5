//! Serialized shape of the realtime datastore.
//!
//! The datastore is a JSON tree. Each device lives under
//! `devices/{device_id}` with an optional `info` node and a `readings`
//! node keyed by push ids:
//!
//! ```json
//! {
//!   "devices": {
//!     "device_001": {
//!       "info": { "name": "North bed", "location": "Greenhouse 2" },
//!       "readings": {
//!         "-NxA1": { "timestamp": 1714550400000, "moisture": 34.2, ... }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Push ids do not sort by time, so readings taken from a node are
//! unordered until passed through the aggregation functions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use soilwatch_types::Reading;

/// The root of a datastore export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatastoreTree {
    /// Device nodes, keyed by device id.
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceNode>,
}

impl DatastoreTree {
    /// Device ids in the tree, sorted.
    pub fn device_ids(&self) -> Vec<String> {
        self.devices.keys().cloned().collect()
    }

    /// Raw readings for a device, unordered. Unknown devices have none.
    pub fn readings(&self, device_id: &str) -> Vec<Reading> {
        self.devices
            .get(device_id)
            .map(|node| node.readings.values().copied().collect())
            .unwrap_or_default()
    }
}

/// Everything stored for one device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<DeviceInfo>,

    /// Readings keyed by push id.
    #[serde(default)]
    pub readings: BTreeMap<String, Reading>,
}

/// Descriptive metadata for a device.
///
/// Only a few keys are interpreted; anything else the ingestion pipeline
/// writes is preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tree() {
        let json = r#"{
            "devices": {
                "device_001": {
                    "info": { "name": "North bed", "battery": 87 },
                    "readings": {
                        "-b": { "timestamp": 200, "moisture": 20, "temperature": 18, "ec": 700, "ph": 6.5,
                                "nitrogen": 10, "phosphorus": 5, "potassium": 80 },
                        "-a": { "timestamp": 100, "moisture": 10, "temperature": 17, "ec": 650, "ph": 6.4,
                                "nitrogen": 11, "phosphorus": 6, "potassium": 81 }
                    }
                },
                "device_002": {}
            }
        }"#;

        let tree: DatastoreTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.device_ids(), vec!["device_001", "device_002"]);

        let node = tree.devices.get("device_001").unwrap();
        let info = node.info.as_ref().unwrap();
        assert_eq!(info.name.as_deref(), Some("North bed"));
        assert_eq!(info.extra.get("battery"), Some(&serde_json::json!(87)));

        assert_eq!(tree.readings("device_001").len(), 2);
        assert!(tree.readings("device_002").is_empty());
        assert!(tree.readings("missing").is_empty());
    }

    #[test]
    fn test_empty_object_is_empty_tree() {
        let tree: DatastoreTree = serde_json::from_str("{}").unwrap();
        assert!(tree.devices.is_empty());
    }
}
