//! Error types for the Spatha library.
//!
//! All fallible operations return [`SpathaError`]. The first three variants
//! are caller errors raised by the classifiers and metrics:
//!
//! - [`SpathaError::InvalidInput`] - empty corpora, mismatched lengths, bad parameters
//! - [`SpathaError::UninitializedModel`] - queries against a model that was never fitted
//! - [`SpathaError::UnsupportedMode`] - an unknown metric averaging mode
//!
//! The remaining variants wrap I/O and (de)serialization failures from the
//! corpus and model stores.
//!
//! # Examples
//!
//! ```
//! use spatha::error::{Result, SpathaError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SpathaError::invalid_input("corpus is empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Spatha operations.
#[derive(Error, Debug)]
pub enum SpathaError {
    /// Invalid caller input (empty corpus, mismatched lengths, bad parameters)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A model was queried before it was fitted
    #[error("Uninitialized model: {0}")]
    UninitializedModel(String),

    /// Unknown metric averaging mode
    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Binary model serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),
}

/// Result type alias for operations that may fail with SpathaError.
pub type Result<T> = std::result::Result<T, SpathaError>;

impl SpathaError {
    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        SpathaError::InvalidInput(msg.into())
    }

    /// Create a new uninitialized model error.
    pub fn uninitialized<S: Into<String>>(msg: S) -> Self {
        SpathaError::UninitializedModel(msg.into())
    }

    /// Create a new unsupported mode error.
    pub fn unsupported_mode<S: Into<String>>(msg: S) -> Self {
        SpathaError::UnsupportedMode(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SpathaError::Serialization(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SpathaError::Analysis(msg.into())
    }
}

impl From<bincode::Error> for SpathaError {
    fn from(err: bincode::Error) -> Self {
        SpathaError::Serialization(err.to_string())
    }
}
