//! Reading - one timestamped soil sample.

use crate::Field;

/// A single sensor sample.
///
/// Readings carry no identity beyond their timestamp, which is also the
/// only ordering key. They are immutable once received from the datastore.
///
/// # Example
///
/// ```rust
/// use soilwatch_types::{Field, Reading};
///
/// let r = Reading::at(1_000).with(Field::Temperature, 18.25);
/// assert_eq!(r.timestamp, 1_000);
/// assert_eq!(r.temperature, 18.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,

    /// Volumetric water content, percent.
    pub moisture: f64,

    /// Soil temperature, degrees Celsius.
    pub temperature: f64,

    /// Electrical conductivity, microsiemens per centimetre.
    pub ec: f64,

    pub ph: f64,

    // Older probes report no NPK channels at all.
    #[cfg_attr(feature = "serde", serde(default))]
    pub nitrogen: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phosphorus: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub potassium: f64,
}

impl Reading {
    /// Create a reading at the given timestamp with every field zeroed.
    pub fn at(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// Return a copy with one field replaced.
    pub fn with(mut self, field: Field, value: f64) -> Self {
        self.set(field, value);
        self
    }

    /// Get the value of a field.
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Moisture => self.moisture,
            Field::Temperature => self.temperature,
            Field::Ec => self.ec,
            Field::Ph => self.ph,
            Field::Nitrogen => self.nitrogen,
            Field::Phosphorus => self.phosphorus,
            Field::Potassium => self.potassium,
        }
    }

    /// Set the value of a field.
    pub fn set(&mut self, field: Field, value: f64) {
        let slot = match field {
            Field::Moisture => &mut self.moisture,
            Field::Temperature => &mut self.temperature,
            Field::Ec => &mut self.ec,
            Field::Ph => &mut self.ph,
            Field::Nitrogen => &mut self.nitrogen,
            Field::Phosphorus => &mut self.phosphorus,
            Field::Potassium => &mut self.potassium,
        };
        *slot = value;
    }
}
