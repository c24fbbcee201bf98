use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid config file '{}': {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("{0}")]
    MissingKey(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("failed to read config file '{}': {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {source}", path.display())]
    ParseError {
        path: PathBuf,
        source: ParseFailure,
    },

    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
}

/// Syntax error reported by one of the document parsers.
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    /// Returns true for the error kind the inclusion hook downgrades to a warning.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, ConfigError::InvalidConfig { .. })
    }
}
