//! Aggregation and range queries over reading batches.
//!
//! Everything here is a pure function of its inputs: no I/O, no shared
//! state. Callers hand over a fully collected batch and get a fresh result
//! back every time the batch changes.

use soilwatch_types::{Field, FieldStats, Reading, Stats};

use super::range::TimeRange;

/// Summarise the tracked fields of a batch.
///
/// Returns `None` for an empty batch; callers must branch on that before
/// rendering. The result does not depend on the order of `readings`.
///
/// Non-finite values (NaN, infinities) are left out of a field's summary.
/// A field with no finite values at all summarises as zero, the same as a
/// channel the device never reported.
pub fn compute_stats(readings: &[Reading]) -> Option<Stats> {
    if readings.is_empty() {
        return None;
    }

    let field = |f: Field| field_stats(readings, f);

    Some(Stats {
        count: readings.len(),
        moisture: field(Field::Moisture),
        temperature: field(Field::Temperature),
        ph: field(Field::Ph),
        ec: field(Field::Ec),
    })
}

fn field_stats(readings: &[Reading], field: Field) -> FieldStats {
    let mut values: Vec<f64> =
        readings.iter().map(|r| r.get(field)).filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return FieldStats::constant(0.0);
    }

    // Summing in sorted order keeps the mean bit-identical across permutations.
    values.sort_by(f64::total_cmp);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = values.iter().sum::<f64>() / values.len() as f64;

    FieldStats {
        avg: avg.clamp(min, max),
        min,
        max,
    }
}

/// Keep the readings whose timestamp falls inside `range` (both ends
/// inclusive), sorted ascending by timestamp.
///
/// The sort is stable, so readings sharing a timestamp keep their relative
/// order. A range with `start > end` matches nothing.
pub fn filter_by_range(readings: &[Reading], range: &TimeRange) -> Vec<Reading> {
    let mut matched: Vec<Reading> =
        readings.iter().filter(|r| range.contains(r.timestamp)).copied().collect();
    matched.sort_by_key(|r| r.timestamp);
    matched
}

/// The `n` most recent readings, oldest first.
pub fn window_latest(readings: &[Reading], n: usize) -> Vec<Reading> {
    let mut sorted = readings.to_vec();
    sorted.sort_by_key(|r| r.timestamp);
    let skip = sorted.len().saturating_sub(n);
    sorted.split_off(skip)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(ts: i64, moisture: f64) -> Reading {
        Reading::at(ts)
            .with(Field::Moisture, moisture)
            .with(Field::Temperature, 15.0 + moisture / 10.0)
            .with(Field::Ph, 6.0 + moisture / 100.0)
            .with(Field::Ec, moisture * 40.0)
    }

    fn sample() -> Vec<Reading> {
        vec![reading(100, 10.0), reading(200, 20.0), reading(300, 30.0)]
    }

    fn timestamps(readings: &[Reading]) -> Vec<i64> {
        readings.iter().map(|r| r.timestamp).collect()
    }

    // ========================================================================
    // compute_stats
    // ========================================================================

    #[test]
    fn empty_batch_has_no_stats() {
        assert!(compute_stats(&[]).is_none());
    }

    #[test]
    fn single_reading_collapses_to_its_values() {
        let r = reading(42, 33.3);
        let stats = compute_stats(&[r]).unwrap();

        assert_eq!(stats.count, 1);
        for field in Field::TRACKED {
            let s = stats.get(field).unwrap();
            assert_eq!(s.avg, r.get(field), "avg of {:?}", field);
            assert_eq!(s.min, r.get(field), "min of {:?}", field);
            assert_eq!(s.max, r.get(field), "max of {:?}", field);
        }
    }

    #[test]
    fn moisture_example() {
        let stats = compute_stats(&sample()).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.moisture.avg, 20.0);
        assert_eq!(stats.moisture.min, 10.0);
        assert_eq!(stats.moisture.max, 30.0);
    }

    #[test]
    fn avg_lies_between_min_and_max() {
        // 0.1 * 3 / 3 rounds above 0.1 without clamping
        let readings: Vec<Reading> = (0..3)
            .map(|i| Reading::at(i).with(Field::Ph, 0.1).with(Field::Ec, 1e-7 * i as f64))
            .chain([reading(10, 12.7), reading(11, 99.1), reading(12, 0.3)])
            .collect();

        let stats = compute_stats(&readings).unwrap();
        for (field, s) in stats.iter() {
            assert!(s.min <= s.avg, "{:?}: min {} > avg {}", field, s.min, s.avg);
            assert!(s.avg <= s.max, "{:?}: avg {} > max {}", field, s.avg, s.max);
        }
    }

    #[test]
    fn stats_are_permutation_invariant() {
        let readings = vec![
            reading(1, 0.1),
            reading(2, 0.7),
            reading(3, 13.37),
            reading(4, 99.99),
            reading(5, 0.2),
        ];
        let expected = compute_stats(&readings).unwrap();

        let mut reversed = readings.clone();
        reversed.reverse();
        assert_eq!(compute_stats(&reversed).unwrap(), expected);

        let mut rotated = readings.clone();
        rotated.rotate_left(2);
        assert_eq!(compute_stats(&rotated).unwrap(), expected);

        let mut swapped = readings;
        swapped.swap(0, 3);
        assert_eq!(compute_stats(&swapped).unwrap(), expected);
    }

    #[test]
    fn negative_temperatures() {
        let readings = vec![
            Reading::at(1).with(Field::Temperature, -4.0),
            Reading::at(2).with(Field::Temperature, 2.0),
        ];
        let stats = compute_stats(&readings).unwrap();
        assert_eq!(stats.temperature.min, -4.0);
        assert_eq!(stats.temperature.max, 2.0);
        assert_eq!(stats.temperature.avg, -1.0);
    }

    // ========================================================================
    // filter_by_range
    // ========================================================================

    #[test]
    fn filter_example() {
        let filtered = filter_by_range(&sample(), &TimeRange::new(150, 300));
        assert_eq!(timestamps(&filtered), vec![200, 300]);
    }

    #[test]
    fn filter_is_inclusive_on_both_ends() {
        let filtered = filter_by_range(&sample(), &TimeRange::new(100, 300));
        assert_eq!(timestamps(&filtered), vec![100, 200, 300]);

        let filtered = filter_by_range(&sample(), &TimeRange::new(200, 200));
        assert_eq!(timestamps(&filtered), vec![200]);
    }

    #[test]
    fn filter_sorts_unordered_input() {
        let readings = vec![reading(300, 3.0), reading(50, 0.5), reading(100, 1.0), reading(200, 2.0)];
        let range = TimeRange::new(60, 1_000);
        let filtered = filter_by_range(&readings, &range);

        assert_eq!(timestamps(&filtered), vec![100, 200, 300]);
        assert!(filtered.iter().all(|r| range.contains(r.timestamp)));
    }

    #[test]
    fn filter_is_stable_for_equal_timestamps() {
        let readings = vec![reading(200, 2.0), reading(100, 1.0), reading(200, 9.0)];
        let filtered = filter_by_range(&readings, &TimeRange::new(0, 1_000));

        assert_eq!(timestamps(&filtered), vec![100, 200, 200]);
        assert_eq!(filtered[1].moisture, 2.0);
        assert_eq!(filtered[2].moisture, 9.0);
    }

    #[test]
    fn filter_is_idempotent() {
        let readings = vec![reading(5, 0.0), reading(300, 3.0), reading(150, 1.5), reading(900, 9.0)];
        let range = TimeRange::new(100, 500);

        let once = filter_by_range(&readings, &range);
        let twice = filter_by_range(&once, &range);
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_with_no_matches_is_empty() {
        assert!(filter_by_range(&sample(), &TimeRange::new(400, 500)).is_empty());
        assert!(filter_by_range(&[], &TimeRange::new(0, 500)).is_empty());
    }

    #[test]
    fn inverted_range_matches_nothing() {
        assert!(filter_by_range(&sample(), &TimeRange::new(300, 100)).is_empty());
    }

    // ========================================================================
    // window_latest
    // ========================================================================

    #[test]
    fn window_example() {
        let latest = window_latest(&sample(), 2);
        assert_eq!(timestamps(&latest), vec![200, 300]);
    }

    #[test]
    fn window_larger_than_input_returns_everything_sorted() {
        let readings = vec![reading(300, 3.0), reading(100, 1.0)];
        assert_eq!(timestamps(&window_latest(&readings, 50)), vec![100, 300]);
    }

    #[test]
    fn window_of_zero_is_empty() {
        assert!(window_latest(&sample(), 0).is_empty());
    }

    #[test]
    fn window_orders_unsorted_input() {
        let readings = vec![reading(200, 2.0), reading(400, 4.0), reading(100, 1.0), reading(300, 3.0)];
        assert_eq!(timestamps(&window_latest(&readings, 3)), vec![200, 300, 400]);
    }

    #[test]
    fn field_with_only_nan_summarises_as_zero() {
        let readings = vec![
            Reading::at(1).with(Field::Ph, f64::NAN),
            Reading::at(2).with(Field::Ph, f64::NAN),
        ];
        let stats = compute_stats(&readings).unwrap();

        assert_eq!(stats.count, 2);
        assert_eq!(stats.ph, FieldStats::constant(0.0));
    }

    #[test]
    fn non_finite_values_are_left_out() {
        let readings = vec![
            reading(1, 10.0).with(Field::Ph, f64::NAN),
            reading(2, 20.0).with(Field::Ph, 6.0),
            reading(3, 30.0).with(Field::Ph, f64::INFINITY),
            reading(4, 40.0).with(Field::Ph, 7.0),
        ];
        let stats = compute_stats(&readings).unwrap();

        assert_eq!(stats.count, 4);
        assert_eq!(stats.ph.min, 6.0);
        assert_eq!(stats.ph.max, 7.0);
        assert_eq!(stats.ph.avg, 6.5);
        assert_eq!(stats.moisture.avg, 25.0);
    }
}
