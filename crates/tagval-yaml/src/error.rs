//! Error types for YAML parsing with source locations.

use crate::SourceInfo;
use thiserror::Error;

/// Result type alias for tagval-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a node tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// YAML syntax error reported by the scanner
    #[error("parse error at {location}: {message}")]
    ParseError {
        message: String,
        location: SourceInfo,
    },

    /// The input contained no document
    #[error("no YAML document found")]
    EmptyDocument,

    /// The event stream did not nest properly
    #[error("invalid YAML structure: {message}")]
    InvalidStructure { message: String },
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::ParseError {
            message: err.info().to_string(),
            location: SourceInfo::from_marker(err.marker(), 0),
        }
    }
}
