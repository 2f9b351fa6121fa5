use std::time::Duration;

use anyhow::{bail, Result};

/// Suffix to milliseconds multiplier (order matters: "ms" before "s" and "m")
const UNITS: &[(&str, f64)] = &[
    ("ms", 1.0),
    ("s", 1_000.0),
    ("m", 60_000.0),
    ("h", 3_600_000.0),
    ("d", 86_400_000.0),
    ("w", 604_800_000.0),
];

/// Parse span strings like "7d", "24h", "1.5h", "30m", "500ms"
pub fn parse_span(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.trim().parse()?;
            if !val.is_finite() || val < 0.0 {
                bail!("Span must be a non-negative number: {}", s);
            }
            return Ok(Duration::from_millis((val * multiplier) as u64));
        }
    }

    bail!("Unknown span format: {}", s)
}

/// Format a span using the largest unit that divides it evenly
pub fn format_span(d: Duration) -> String {
    let ms = d.as_millis();
    if ms == 0 {
        return "0s".to_string();
    }

    for (suffix, multiplier) in UNITS.iter().rev() {
        let unit = *multiplier as u128;
        if ms % unit == 0 {
            return format!("{}{}", ms / unit, suffix);
        }
    }

    format!("{}ms", ms)
}
