//! Error types for the fallible edges of the crate
//!
//! The simulation itself never fails; only loading settings and reading or
//! writing the high score slot can.

use thiserror::Error;

/// Errors from a high score storage slot
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored high score is not a non-negative integer: {value:?}")]
    Corrupt { value: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors from loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SettingsError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SettingsError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
