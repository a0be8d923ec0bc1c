//! Error types and result alias for the gamefocus crate.
use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type used throughout this crate.
pub type Result<T> = StdResult<T, Error>;

/// Error variants produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A process-wide coordinator already exists.
    #[error("Focus coordinator already initialized")]
    AlreadyInitialized,

    /// The process-wide coordinator was requested before it was created.
    #[error("Focus coordinator not initialized")]
    NotInitialized,

    /// The configuration text could not be parsed.
    #[error("Config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// I/O failure while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
