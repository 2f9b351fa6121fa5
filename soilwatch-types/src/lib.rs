//! # soilwatch-types
//!
//! Core value types for soil-sensor telemetry. A [`Reading`] is one
//! timestamped sample with seven numeric fields; [`Stats`] is the
//! min/avg/max summary of a batch of readings over the tracked fields.
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON serialization via serde, matching the datastore's
//!   `devices/{id}/readings/{key}` node shape
//!
//! ## Example
//!
//! ```rust
//! use soilwatch_types::{Field, Reading};
//!
//! let reading = Reading::at(1_700_000_000_000)
//!     .with(Field::Moisture, 31.5)
//!     .with(Field::Ph, 6.8);
//!
//! assert_eq!(reading.get(Field::Moisture), 31.5);
//! assert_eq!(Field::Ph.format(reading.ph), "6.80");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod field;
mod reading;
mod stats;

pub use field::*;
pub use reading::*;
pub use stats::*;
