//! Error types for the tracker core.

/// Rejection of a data-entry attempt. Nothing is persisted when one of
/// these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Height or weight normalized to zero or below
    #[error("Height and weight must be positive numbers!")]
    NonPositive,

    /// Inputs so extreme the derived BMI is not a positive finite number
    #[error("Height and weight are out of range!")]
    OutOfRange,
}

/// Failure reported by the record store.
///
/// Every variant carries the engine diagnostic. Only `Open` is fatal; the
/// session reports the others and keeps running.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Can't open database: {0}")]
    Open(#[source] rusqlite::Error),

    #[error("Failed to create table: {0}")]
    SchemaInit(#[source] rusqlite::Error),

    #[error("Failed to insert record: {0}")]
    Write(#[source] rusqlite::Error),

    #[error("Failed to fetch records: {0}")]
    Query(#[source] rusqlite::Error),
}

/// Failure loading the configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Invalid(String),
}
