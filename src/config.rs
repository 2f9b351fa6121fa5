//! Layered configuration.
//!
//! Settings are resolved from, in increasing priority: built-in defaults,
//! a TOML file (`soilwatch.toml` in the working directory, or the path
//! given with `--config`), and `SOILWATCH_*` environment variables. Nested
//! keys use a double underscore, e.g. `SOILWATCH_STORE__FILE=soil.json`.
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! device = "device_001"
//! window = 50
//! history_span = "7d"
//!
//! [store]
//! file = "soil.json"
//!
//! [log]
//! file = "soilwatch.log"
//! filter = "soilwatch=debug"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_span;

/// Config file looked up in the working directory when none is given.
const DEFAULT_CONFIG_NAME: &str = "soilwatch";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Device selected at startup.
    pub device: String,
    /// Maximum number of readings shown in the Live view.
    pub window: usize,
    /// UI refresh interval in milliseconds.
    pub refresh_ms: u64,
    /// Span of the History view's initial range (e.g. "7d").
    pub history_span: String,
    /// Directory interactive exports are written to.
    pub export_dir: PathBuf,
    #[serde(default)]
    pub store: StoreSettings,
    pub log: LogSettings,
}

/// Where readings come from. At most one should be set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    /// Path to a datastore JSON export.
    pub file: Option<PathBuf>,
    /// `host:port` of a newline-delimited JSON snapshot relay.
    pub connect: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Log file; without one, interactive sessions don't log at all.
    pub file: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Settings {
    /// Load settings, reading `path` if given (it must exist) or the
    /// optional default config file otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let builder = Config::builder()
            .set_default("device", "device_001")?
            .set_default("window", 50_i64)?
            .set_default("refresh_ms", 250_i64)?
            .set_default("history_span", "7d")?
            .set_default("export_dir", ".")?
            .set_default("log.filter", "info")?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let config = builder
            .add_source(env)
            .build()
            .context("Failed to load configuration")?;

        config.try_deserialize().context("Invalid configuration")
    }

    /// Parsed `history_span`.
    pub fn history_span(&self) -> Result<Duration> {
        parse_span(&self.history_span)
            .with_context(|| format!("Invalid history_span: {}", self.history_span))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.max(10))
    }
}

/// `SOILWATCH_DEVICE`, `SOILWATCH_STORE__FILE`, ...
fn environment() -> Environment {
    Environment::with_prefix("SOILWATCH")
        .prefix_separator("_")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_defaults_from_empty_file() {
        let file = toml_file("");
        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.device, "device_001");
        assert_eq!(settings.window, 50);
        assert_eq!(settings.history_span().unwrap(), Duration::from_secs(7 * 86_400));
        assert_eq!(settings.export_dir, PathBuf::from("."));
        assert!(settings.store.file.is_none());
        assert!(settings.log.file.is_none());
        assert_eq!(settings.log.filter, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = toml_file(
            r#"
            device = "greenhouse_7"
            window = 20
            history_span = "24h"

            [store]
            file = "/data/soil.json"

            [log]
            file = "/tmp/soilwatch.log"
            "#,
        );
        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.device, "greenhouse_7");
        assert_eq!(settings.window, 20);
        assert_eq!(settings.history_span().unwrap(), Duration::from_secs(86_400));
        assert_eq!(settings.store.file, Some(PathBuf::from("/data/soil.json")));
        assert_eq!(settings.log.file, Some(PathBuf::from("/tmp/soilwatch.log")));
        assert_eq!(settings.log.filter, "info");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(Settings::load(Some(Path::new("/nonexistent/soilwatch.toml"))).is_err());
    }

    #[test]
    fn test_invalid_span_is_reported() {
        let file = toml_file(r#"history_span = "soon""#);
        let settings = Settings::load(Some(file.path())).unwrap();
        let err = settings.history_span().unwrap_err();
        assert!(err.to_string().contains("soon"));
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: ::config::Map<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_env_overrides_top_level_and_nested_keys() {
        let file = toml_file("");
        let vars = [
            ("SOILWATCH_DEVICE", "greenhouse_7"),
            ("SOILWATCH_STORE__FILE", "/data/a.json"),
            ("SOILWATCH_LOG__FILTER", "soilwatch=debug"),
        ];
        let settings = Settings::load_with_env(Some(file.path()), env(&vars)).unwrap();

        assert_eq!(settings.device, "greenhouse_7");
        assert_eq!(settings.store.file, Some(PathBuf::from("/data/a.json")));
        assert_eq!(settings.log.filter, "soilwatch=debug");
    }

    #[test]
    fn test_env_wins_over_file() {
        let file = toml_file("device = \"from_file\"\nrefresh_ms = 500");
        let vars = [("SOILWATCH_DEVICE", "from_env")];
        let settings = Settings::load_with_env(Some(file.path()), env(&vars)).unwrap();

        assert_eq!(settings.device, "from_env");
        assert_eq!(settings.refresh_ms, 500);
    }

    #[test]
    fn test_env_ignores_other_prefixes() {
        let file = toml_file("");
        let vars = [("SOILWATCHER_DEVICE", "nope"), ("DEVICE", "nope")];
        let settings = Settings::load_with_env(Some(file.path()), env(&vars)).unwrap();

        assert_eq!(settings.device, "device_001");
    }
}
