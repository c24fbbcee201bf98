use crate::config::ConfigError;
use thiserror::Error;

/// Top-level error type for the anchor-config library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to install log subscriber: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}
