//! Error types for stripping speaker notes.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while stripping speaker notes.
#[derive(Error, Debug)]
pub enum Error {
    /// Conflicting or missing command-line options. Fatal to the whole run.
    #[error("{0}")]
    Configuration(String),

    /// Failed to open, read, or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file format is not supported or could not be detected.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid or corrupted file.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// Any failure while stripping one document, with the underlying cause.
    #[error("Error processing {}: {source}", path.display())]
    Processing {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap a container failure into a processing error for `path`.
    ///
    /// Already-wrapped errors are passed through unchanged.
    pub fn processing(path: impl Into<PathBuf>, source: Error) -> Self {
        match source {
            Error::Processing { .. } => source,
            other => Error::Processing {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// Whether this error aborts the run before any task starts.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// The innermost message, without the "Error processing" prefix.
    pub fn cause_message(&self) -> String {
        match self {
            Error::Processing { source, .. } => source.cause_message(),
            other => other.to_string(),
        }
    }
}
