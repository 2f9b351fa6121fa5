//! Data models and processing for soil readings.
//!
//! This module turns raw reading batches from a store into structured,
//! summarised data suitable for display.
//!
//! ## Submodules
//!
//! - [`aggregate`]: Per-field min/avg/max, range filtering and latest-N windows
//! - [`duration`]: Parsing and formatting of span strings (e.g., "7d", "30m")
//! - [`range`]: Inclusive time ranges and date parsing for historical queries
//! - [`set`]: The [`ReadingSet`] a view displays
//! - [`trend`]: Sparklines and rates of change
//!
//! ## Data Flow
//!
//! ```text
//! ReadingFeed::poll() / ReadingStore::query_range()
//!        │
//!        ▼
//! window_latest() / filter_by_range()
//!        │
//!        ▼
//! ReadingSet (with compute_stats())
//!        │
//!        └──▶ trend::field_sparkline() (for the UI)
//! ```

pub mod aggregate;
pub mod duration;
pub mod range;
pub mod set;
pub mod trend;

pub use aggregate::{compute_stats, filter_by_range, window_latest};
pub use range::TimeRange;
pub use set::{Origin, ReadingSet};
