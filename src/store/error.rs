//! Error types for reading stores.

use thiserror::Error;

/// Errors that can occur when reading from a store.
///
/// Unknown devices are not errors: they simply have no readings.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing data could not be read.
    #[error("Read error: {0}")]
    Read(String),

    /// The backing data was read but is not a valid datastore tree.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Read(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Parse(err.to_string())
    }
}
