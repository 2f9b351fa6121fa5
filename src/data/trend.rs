//! Trend indicators: sparklines and rates of change.

use soilwatch_types::{Field, Reading};

/// Number of sparkline bar levels.
pub const SPARKLINE_LEVELS: u8 = 8;

/// Sparkline levels (0-7) for the last `width` values.
///
/// Values are normalized to the min/max of the slice shown, so a flat
/// series renders as a row of lowest bars. Returns an empty Vec if there
/// are fewer than two values.
pub fn sparkline(values: &[f64], width: usize) -> Vec<u8> {
    let start = values.len().saturating_sub(width);
    let values = &values[start..];

    if values.len() < 2 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let top = f64::from(SPARKLINE_LEVELS - 1);

    values
        .iter()
        .map(|&v| {
            if range > 0.0 {
                (((v - min) / range) * top).round() as u8
            } else {
                0
            }
        })
        .collect()
}

/// Sparkline levels for one field of a reading sequence.
pub fn field_sparkline(readings: &[Reading], field: Field, width: usize) -> Vec<u8> {
    let values: Vec<f64> = readings.iter().map(|r| r.get(field)).collect();
    sparkline(&values, width)
}

/// Change per hour between the last two readings.
///
/// Returns None if there's not enough history or no time elapsed.
pub fn rate_per_hour(readings: &[Reading], field: Field) -> Option<f64> {
    let [.., previous, current] = readings else {
        return None;
    };

    let elapsed_ms = current.timestamp.checked_sub(previous.timestamp)?;
    if elapsed_ms <= 0 {
        return None;
    }

    let delta = current.get(field) - previous.get(field);
    Some(delta / (elapsed_ms as f64 / 3_600_000.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparkline_needs_two_values() {
        assert!(sparkline(&[], 8).is_empty());
        assert!(sparkline(&[3.0], 8).is_empty());
    }

    #[test]
    fn sparkline_spans_all_levels() {
        let levels = sparkline(&[10.0, 15.0, 20.0], 8);
        assert_eq!(levels, vec![0, 4, 7]);
    }

    #[test]
    fn sparkline_flat_series_is_lowest_level() {
        assert_eq!(sparkline(&[5.0, 5.0, 5.0], 8), vec![0, 0, 0]);
    }

    #[test]
    fn sparkline_keeps_only_last_width_values() {
        let values: Vec<f64> = (0..20).map(f64::from).collect();
        let levels = sparkline(&values, 8);
        assert_eq!(levels.len(), 8);
        assert_eq!(levels.first(), Some(&0));
        assert_eq!(levels.last(), Some(&7));
    }

    #[test]
    fn rate_per_hour_uses_last_two_readings() {
        let readings = vec![
            Reading::at(0).with(Field::Moisture, 50.0),
            Reading::at(3_600_000).with(Field::Moisture, 40.0),
            Reading::at(5_400_000).with(Field::Moisture, 39.0),
        ];
        assert_eq!(rate_per_hour(&readings, Field::Moisture), Some(-2.0));
    }

    #[test]
    fn rate_per_hour_needs_elapsed_time() {
        let same_instant = vec![Reading::at(10), Reading::at(10)];
        assert!(rate_per_hour(&same_instant, Field::Ph).is_none());
        assert!(rate_per_hour(&[Reading::at(1)], Field::Ph).is_none());
    }

    #[test]
    fn rate_per_hour_rejects_overflowing_gap() {
        let readings = vec![Reading::at(i64::MIN), Reading::at(i64::MAX)];
        assert!(rate_per_hour(&readings, Field::Moisture).is_none());
    }
}
