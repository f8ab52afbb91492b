use std::path::PathBuf;

/// Errors that can occur while reading and assembling image stacks
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the TIFF decoder
    #[error("TIFF decoding error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// Planes with extra sample dimensions cannot form a (Z, Y, X) volume
    #[error("{path}: unsupported color type {found}; expected grayscale")]
    UnsupportedColorType { path: PathBuf, found: String },

    /// A plane's (Y, X) size differs from the rest of its group or file
    #[error("{path}: plane size {found:?} does not match expected {expected:?}")]
    ShapeMismatch {
        path: PathBuf,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// An acquisition group with no members
    #[error("cannot assemble an empty acquisition group")]
    EmptyGroup,

    /// Volume concatenation failed
    #[error("stack concatenation failed: {0}")]
    Concat(#[from] ndarray::ShapeError),
}
