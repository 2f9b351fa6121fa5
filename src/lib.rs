// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # soilwatch
//!
//! A terminal dashboard and library for soil-sensor telemetry.
//!
//! Field devices periodically write readings (moisture, temperature,
//! electrical conductivity, pH and N/P/K nutrients) into a realtime
//! datastore. This crate reads them back through a [`ReadingStore`],
//! summarises them into per-field min/avg/max [`Stats`](soilwatch_types::Stats)
//! and shows live and historical views in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(aggregate)    │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │  store  │◀── FileStore | StreamStore | MemoryStore       │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation and subscription lifetime
//! - **[`store`]**: Data access ([`ReadingStore`] / [`ReadingFeed`] traits) with
//!   implementations for datastore exports on disk, NDJSON streams and memory
//! - **[`data`]**: Aggregation ([`compute_stats`], [`filter_by_range`],
//!   [`window_latest`]), time ranges and trends
//! - **[`export`]**: CSV and JSON export
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a datastore export on disk
//! soilwatch --file soil.json --device device_001
//!
//! # Receive snapshots from a TCP relay
//! soilwatch --connect localhost:9090
//!
//! # Export last week's readings and exit
//! soilwatch --file soil.json --since 7d --export week.csv
//! ```
//!
//! ### Computing statistics
//!
//! ```
//! use soilwatch::{compute_stats, window_latest};
//! use soilwatch_types::{Field, Reading};
//!
//! let readings: Vec<Reading> = (0..10)
//!     .map(|i| Reading::at(i * 60_000).with(Field::Moisture, 30.0 + i as f64))
//!     .collect();
//!
//! let latest = window_latest(&readings, 4);
//! let stats = compute_stats(&latest).unwrap();
//! assert_eq!(stats.count, 4);
//! assert_eq!(stats.moisture.min, 36.0);
//! assert_eq!(stats.moisture.max, 39.0);
//! ```
//!
//! ### Driving the app from a store
//!
//! ```
//! use soilwatch::{App, AppOptions, MemoryStore};
//! use soilwatch_types::Reading;
//!
//! let store = MemoryStore::new("demo");
//! store.push("device_001", Reading::at(1_000));
//!
//! let mut app = App::new(Box::new(store.clone()), AppOptions::default());
//! app.start();
//! assert_eq!(app.live.as_ref().map(|s| s.len()), Some(1));
//! ```
//!
//! ### Bridging from another component
//!
//! ```no_run
//! use soilwatch::StreamStore;
//! use tokio::sync::mpsc;
//!
//! # tokio_test::block_on(async {
//! let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
//! let store = StreamStore::from_bytes_channel(rx, "relay");
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod export;
pub mod logging;
pub mod store;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, AppOptions, View};
pub use data::{compute_stats, filter_by_range, window_latest, Origin, ReadingSet, TimeRange};
pub use export::ExportFormat;
pub use store::{
    ChannelFeed, DeviceInfo, FileStore, MemoryStore, ReadingFeed, ReadingStore, StoreError,
    StreamStore,
};
