//! The numeric fields carried by a reading.

use alloc::format;
use alloc::string::String;

/// One of the seven numeric fields of a [`Reading`](crate::Reading).
///
/// Each field knows its display label, unit and the fixed number of
/// decimal places used when it is rendered or exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Field {
    Moisture,
    Temperature,
    Ec,
    Ph,
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Field {
    /// Every field, in display/export column order.
    pub const ALL: [Field; 7] = [
        Field::Moisture,
        Field::Temperature,
        Field::Ec,
        Field::Ph,
        Field::Nitrogen,
        Field::Phosphorus,
        Field::Potassium,
    ];

    /// The fields summarised by [`Stats`](crate::Stats).
    pub const TRACKED: [Field; 4] = [Field::Moisture, Field::Temperature, Field::Ph, Field::Ec];

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Moisture => "Moisture",
            Field::Temperature => "Temperature",
            Field::Ec => "EC",
            Field::Ph => "pH",
            Field::Nitrogen => "Nitrogen",
            Field::Phosphorus => "Phosphorus",
            Field::Potassium => "Potassium",
        }
    }

    /// Unit suffix, empty for dimensionless fields.
    pub fn unit(&self) -> &'static str {
        match self {
            Field::Moisture => "%",
            Field::Temperature => "°C",
            Field::Ec => "µS/cm",
            Field::Ph | Field::Nitrogen | Field::Phosphorus | Field::Potassium => "",
        }
    }

    /// Decimal places used for display and CSV export.
    pub fn precision(&self) -> usize {
        match self {
            Field::Moisture | Field::Temperature => 1,
            Field::Ph => 2,
            Field::Ec | Field::Nitrogen | Field::Phosphorus | Field::Potassium => 0,
        }
    }

    /// Format a value at this field's precision.
    ///
    /// Exact ties round away from zero (`812.5` gives `813`).
    pub fn format(&self, value: f64) -> String {
        let precision = self.precision();
        let scale = match precision {
            0 => 1.0,
            1 => 10.0,
            _ => 100.0,
        };
        let rounded = round_half_away(value * scale) / scale;
        let value = if rounded.is_finite() { rounded } else { value };
        format!("{:.*}", precision, value)
    }

    /// Cycle to the next tracked field (wraps around).
    ///
    /// Untracked fields step to the first tracked one.
    pub fn next_tracked(self) -> Self {
        match self {
            Field::Moisture => Field::Temperature,
            Field::Temperature => Field::Ph,
            Field::Ph => Field::Ec,
            _ => Field::Moisture,
        }
    }
}

/// `f64::round` without `std`.
fn round_half_away(x: f64) -> f64 {
    // At or beyond 2^52 every f64 is already integral; NaN also lands here.
    const INTEGRAL: f64 = 4_503_599_627_370_496.0;
    if !(x < INTEGRAL && x > -INTEGRAL) {
        return x;
    }

    let truncated = x as i64 as f64;
    let frac = x - truncated;
    if frac >= 0.5 {
        truncated + 1.0
    } else if frac <= -0.5 {
        truncated - 1.0
    } else {
        truncated
    }
}
