//! CLI error types.

use crate::config::ConfigError;
use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No API credential in the environment or `.env`.
    #[error("ANTHROPIC_API_KEY is not set; export it or add it to .env")]
    MissingApiKey,

    /// The config file could not be read or parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred in the runtime layer.
    #[error(transparent)]
    Runtime(#[from] runtime::Error),

    /// Closing the tool server session failed.
    #[error("failed to close tool server session: {0}")]
    Cleanup(String),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
