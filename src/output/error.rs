use std::path::PathBuf;

/// Errors that can occur while writing output stacks
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the TIFF encoder
    #[error("TIFF encoding error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// A zero-sized volume cannot be persisted
    #[error("cannot write an empty stack to {0}")]
    EmptyStack(PathBuf),
}
