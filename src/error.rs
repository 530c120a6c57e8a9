//! Configuration error handling
//!
//! The generation pipeline itself has no recoverable failure path; builders
//! assert their preconditions. Everything that can legitimately go wrong
//! happens at the configuration boundary and is reported through
//! [`ConfigError`].

use std::path::PathBuf;

/// Result type for configuration operations
pub type TerrainResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Level of detail list is empty")]
    NoDetailLevels,

    #[error("Level of detail thresholds must ascend: band {index} has {threshold} after {previous}")]
    UnsortedDetailLevels {
        index: usize,
        threshold: f32,
        previous: f32,
    },

    #[error("At most one level of detail may be used for collision, found {count}")]
    MultipleCollisionLevels { count: usize },

    #[error("Level of detail {lod} (step {step}) does not divide the bordered grid of {bordered_size}")]
    IncompatibleDetailLevel {
        lod: u32,
        step: usize,
        bordered_size: usize,
    },

    #[error("Invalid configuration: {field}")]
    InvalidField { field: String },
}

/// Helper trait for attaching config context to foreign errors
pub trait ConfigErrorContext<T> {
    fn config_context(self, field: &str) -> TerrainResult<T>;
}

impl<T> ConfigErrorContext<T> for Option<T> {
    fn config_context(self, field: &str) -> TerrainResult<T> {
        self.ok_or_else(|| ConfigError::InvalidField {
            field: field.to_string(),
        })
    }
}
