use thiserror::Error;

/// Raised before a session exists: the requested configuration cannot
/// produce one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown or empty word pool: unknown theme '{0}'")]
    UnknownPool(String),

    #[error("unknown or empty word pool: theme '{0}' has no words")]
    EmptyPool(String),

    #[error("word count must be greater than zero")]
    ZeroWordCount,

    #[error("invalid session duration: {0}s (allowed: 15, 30, 60)")]
    InvalidDuration(u32),
}

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigurationError),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
}

pub type LabResult<T> = Result<T, LabError>;
