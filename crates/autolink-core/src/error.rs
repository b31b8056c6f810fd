use thiserror::Error;

/// Contract violations rejected at the API boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("min_char_count must not be negative, got {0}")]
    NegativeMinCharCount(i64),
}
