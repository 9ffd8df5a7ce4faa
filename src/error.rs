//! Error types for pdfdiff library.

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pdfdiff operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which input of a comparison an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The original (old) document
    Original,
    /// The modified (new) document
    Modified,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Original => f.write_str("original"),
            Side::Modified => f.write_str("modified"),
        }
    }
}

/// Error types that can occur while extracting or comparing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input does not start with the `%PDF` signature.
    #[error("File does not appear to be a valid PDF (invalid header)")]
    UnknownFormat,

    /// The input exceeds the configured size limit.
    #[error("File size ({}MB) exceeds maximum allowed size of {}MB", megabytes(.size), megabytes(.limit))]
    FileTooLarge { size: u64, limit: u64 },

    /// The path does not point at a regular file.
    #[error("Path is not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The path does not carry a `.pdf` extension.
    #[error("File must have .pdf extension: {}", .0.display())]
    InvalidExtension(PathBuf),

    /// Error loading the PDF structure or page tree.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Text could not be extracted from a page.
    #[error("Text extraction error on page {page}: {message}")]
    Extraction { page: u32, message: String },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error serializing a report.
    #[error("Rendering error: {0}")]
    Render(String),

    /// An error attributed to one side of a comparison.
    #[error("Failed to process the {side} PDF: {source}")]
    Side {
        side: Side,
        #[source]
        source: Box<Error>,
    },
}

/// Whole megabytes, rounded to nearest.
fn megabytes(bytes: &u64) -> u64 {
    (*bytes as f64 / (1024.0 * 1024.0)).round() as u64
}

impl Error {
    /// Build a page-level extraction error.
    pub fn extraction(page: u32, message: impl Into<String>) -> Self {
        Error::Extraction {
            page,
            message: message.into(),
        }
    }

    /// Attribute this error to one side of a comparison.
    pub fn with_side(self, side: Side) -> Self {
        match self {
            Error::Side { .. } => self,
            other => Error::Side {
                side,
                source: Box::new(other),
            },
        }
    }

    /// The side this error is attributed to, if any.
    pub fn side(&self) -> Option<Side> {
        match self {
            Error::Side { side, .. } => Some(*side),
            _ => None,
        }
    }

    /// Whether the input failed a precondition check before extraction.
    pub fn is_validation(&self) -> bool {
        match self {
            Error::UnknownFormat
            | Error::FileTooLarge { .. }
            | Error::NotAFile(_)
            | Error::InvalidExtension(_) => true,
            Error::Side { source, .. } => source.is_validation(),
            _ => false,
        }
    }

    /// Whether the upstream page/text decode failed.
    pub fn is_extraction(&self) -> bool {
        match self {
            Error::PdfParse(_)
            | Error::Encrypted
            | Error::Extraction { .. }
            | Error::PageOutOfRange(..)
            | Error::Io(_) => true,
            Error::Side { source, .. } => source.is_extraction(),
            _ => false,
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::FileTooLarge {
            size: 600 * 1024 * 1024,
            limit: 500 * 1024 * 1024,
        };
        assert_eq!(
            err.to_string(),
            "File size (600MB) exceeds maximum allowed size of 500MB"
        );
    }

    #[test]
    fn test_file_too_large_rounds_megabytes() {
        let err = Error::FileTooLarge {
            size: 600 * 1024 * 1024 + 700 * 1024,
            limit: 500 * 1024 * 1024,
        };
        assert_eq!(
            err.to_string(),
            "File size (601MB) exceeds maximum allowed size of 500MB"
        );

        let err = Error::FileTooLarge {
            size: 1024 * 1024 + 400 * 1024,
            limit: 512 * 1024,
        };
        assert_eq!(
            err.to_string(),
            "File size (1MB) exceeds maximum allowed size of 1MB"
        );
    }

    #[test]
    fn test_side_wrapping() {
        let err = Error::extraction(3, "bad stream").with_side(Side::Modified);
        assert_eq!(err.side(), Some(Side::Modified));
        assert_eq!(
            err.to_string(),
            "Failed to process the modified PDF: Text extraction error on page 3: bad stream"
        );
        assert!(err.is_extraction());
        assert!(!err.is_validation());

        // Re-wrapping keeps the first attribution
        let err = err.with_side(Side::Original);
        assert_eq!(err.side(), Some(Side::Modified));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::UnknownFormat.is_validation());
        assert!(Error::InvalidExtension(PathBuf::from("a.txt")).is_validation());
        assert!(!Error::Encrypted.is_validation());
    }
}
