//! Summary statistics over a batch of readings.

use crate::Field;

/// Minimum, mean and maximum of one field across a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

impl FieldStats {
    /// Stats for a batch where every value equals `value`.
    pub fn constant(value: f64) -> Self {
        Self {
            avg: value,
            min: value,
            max: value,
        }
    }
}

/// Per-field summary of a non-empty batch of readings.
///
/// Only the [`Field::TRACKED`] fields are summarised. A `Stats` value is
/// derived and transient: it is recomputed from scratch for every batch and
/// never updated incrementally.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Number of readings the summary was computed from. Always non-zero.
    pub count: usize,
    pub moisture: FieldStats,
    pub temperature: FieldStats,
    pub ph: FieldStats,
    pub ec: FieldStats,
}

impl Stats {
    /// Get the summary for a field, if that field is tracked.
    pub fn get(&self, field: Field) -> Option<&FieldStats> {
        match field {
            Field::Moisture => Some(&self.moisture),
            Field::Temperature => Some(&self.temperature),
            Field::Ph => Some(&self.ph),
            Field::Ec => Some(&self.ec),
            Field::Nitrogen | Field::Phosphorus | Field::Potassium => None,
        }
    }

    /// Iterate over the tracked fields and their summaries.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldStats)> {
        Field::TRACKED.into_iter().filter_map(move |f| self.get(f).map(|s| (f, s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Stats {
        Stats {
            count: 3,
            moisture: FieldStats { avg: 20.0, min: 10.0, max: 30.0 },
            temperature: FieldStats::constant(18.0),
            ph: FieldStats { avg: 6.5, min: 6.0, max: 7.0 },
            ec: FieldStats { avg: 800.0, min: 700.0, max: 900.0 },
        }
    }

    #[test]
    fn get_returns_only_tracked_fields() {
        let stats = sample();
        assert_eq!(stats.get(Field::Moisture).unwrap().avg, 20.0);
        assert_eq!(stats.get(Field::Ec).unwrap().max, 900.0);
        assert!(stats.get(Field::Nitrogen).is_none());
    }

    #[test]
    fn iter_follows_tracked_order() {
        let stats = sample();
        let fields: Vec<Field> = stats.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, Field::TRACKED.to_vec());
    }
}
