//! CSV and JSON export of a loaded reading sequence.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use soilwatch_types::{Field, Reading};

/// Output format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Pick a format from a file extension; anything but `.json` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Column headers, in the same order as [`Field::ALL`].
const CSV_HEADERS: [&str; 8] = [
    "Timestamp",
    "Moisture %",
    "Temperature °C",
    "EC",
    "pH",
    "Nitrogen",
    "Phosphorus",
    "Potassium",
];

/// `soil-data-{device}-{YYYY-MM-DD}.{ext}`, dated in the zone of `now`
/// (UTC for exports).
pub fn default_file_name<Tz: TimeZone>(device_id: &str, format: ExportFormat, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("soil-data-{}-{}.{}", device_id, now.format("%Y-%m-%d"), format.extension())
}

/// Format a reading timestamp in local time, as shown in tables and CSV.
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}

/// Write readings as CSV: a header row, then one row per reading with
/// each field at its fixed display precision.
pub fn write_csv<W: Write>(readings: &[Reading], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADERS)?;

    for reading in readings {
        let mut record = Vec::with_capacity(CSV_HEADERS.len());
        record.push(format_timestamp(reading.timestamp));
        record.extend(Field::ALL.iter().map(|f| f.format(reading.get(*f))));
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// Build the JSON export document.
pub fn to_json(device_id: &str, readings: &[Reading], exported_at: DateTime<Utc>) -> serde_json::Value {
    serde_json::json!({
        "device": device_id,
        "exportDate": exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "readings": readings,
    })
}

/// Export readings into `dir` using the default file name.
///
/// Returns the path written. Fails if there is nothing to export.
pub fn export_to_dir(
    dir: &Path,
    device_id: &str,
    readings: &[Reading],
    format: ExportFormat,
) -> Result<PathBuf> {
    let now = Utc::now();
    let path = dir.join(default_file_name(device_id, format, &now));
    write_export(&path, device_id, readings, format, now)?;
    Ok(path)
}

/// Export readings to an explicit path.
pub fn export_to_file(path: &Path, device_id: &str, readings: &[Reading], format: ExportFormat) -> Result<()> {
    write_export(path, device_id, readings, format, Utc::now())
}

fn write_export(
    path: &Path,
    device_id: &str,
    readings: &[Reading],
    format: ExportFormat,
    now: DateTime<Utc>,
) -> Result<()> {
    if readings.is_empty() {
        bail!("No data to export");
    }

    let mut file = File::create(path)?;
    match format {
        ExportFormat::Csv => write_csv(readings, &mut file)?,
        ExportFormat::Json => {
            let json = serde_json::to_string_pretty(&to_json(device_id, readings, now))?;
            file.write_all(json.as_bytes())?;
        }
    }

    tracing::info!(path = %path.display(), readings = readings.len(), ?format, "exported readings");
    Ok(())
}
