//! Error handling for the focusctl crate.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for focusctl operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running focusctl.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Errors surfaced by the focus coordinator, including config loading.
    #[error("Focus error: {0}")]
    Focus(#[from] gamefocus::Error),
    /// The scenario file could not be parsed.
    #[error("Failed to parse scenario: {0}")]
    Scenario(#[from] ron::error::SpannedError),
}
