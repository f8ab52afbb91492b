use std::path::PathBuf;

use crate::table::CastError;

/// Errors that can occur while reading an experiment descriptor
#[derive(Debug, thiserror::Error)]
pub enum ExperimentXmlError {
    /// The descriptor file does not exist
    #[error("experiment XML not found: {0}")]
    MissingFile(PathBuf),

    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A recognized element held text that is not a usable number
    #[error("invalid value in <{element}>: {source}")]
    InvalidValue {
        element: String,
        #[source]
        source: CastError,
    },

    /// A recognized element held text that does not parse as a number
    #[error("invalid number in <{element}>: '{value}'")]
    InvalidNumber { element: String, value: String },
}
