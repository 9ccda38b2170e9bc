//! Error types for the countdown components.
//!
//! Digit cells and the countdown display validate their input before touching
//! any state, so an `Err` always leaves the component exactly as it was.

use thiserror::Error;

/// Errors returned when a component is handed text it cannot display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The value given to a digit cell was not exactly one character in `0-9`.
    #[error("number format is incorrect: {0:?}")]
    InvalidDigit(String),
    /// The text given to a countdown display did not match `HH:MM:SS`.
    #[error("time ({0:?}) is incorrect, expected HH:MM:SS")]
    InvalidTime(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
