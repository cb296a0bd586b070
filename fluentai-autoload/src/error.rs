//! Autoload error types

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for autoload results
pub type Result<T> = std::result::Result<T, AutoloadError>;

/// Errors that can occur while loading autoload tables or looking up symbols
#[derive(Error, Debug)]
pub enum AutoloadError {
    /// No file could be found for a symbol
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound {
        /// The symbol that failed to resolve
        symbol: String,
    },

    /// Autoload table could not be read or understood
    #[error("Invalid autoload table {path}: {message}")]
    InvalidTable {
        /// Path of the offending table
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// I/O error occurred while reading or writing a table
    #[error("IO error on {path}: {error}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        error: std::io::Error,
    },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
