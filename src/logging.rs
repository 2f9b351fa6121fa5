//! Tracing subscriber setup.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LogSettings;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. With a log file
/// configured, events are appended to it. Otherwise interactive sessions
/// install nothing (the terminal belongs to the UI) and non-interactive
/// ones log to stderr.
pub fn init(settings: &LogSettings, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .with_context(|| format!("Invalid log filter: {}", settings.filter))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let result = match (&settings.file, interactive) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        (None, false) => builder.with_writer(std::io::stderr).try_init(),
        (None, true) => return Ok(()),
    };
    result.map_err(|e| anyhow!("Failed to install logger: {}", e))
}
