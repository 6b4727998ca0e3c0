//! Error types for the PDF templater library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause carried by render failures
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for the PDF templater library
#[derive(Error, Debug)]
pub enum Error {
    /// Search key is empty
    #[error("Invalid search key: {0}")]
    InvalidSearchKey(String),

    /// Search key contains a ligature sequence that cannot be matched reliably
    #[error("Search key {key:?} contains the ligature {ligature:?}")]
    LigatureInSearchKey { key: String, ligature: String },

    /// Search key is not a valid regular expression
    #[error("Invalid search pattern {key:?}: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    /// Caller supplied arguments that violate a precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image placement only supports single page documents
    #[error("Cannot place images on a document with {0} pages, exactly one is required")]
    TooManyPages(usize),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A show-text operator was not preceded by a matching operand
    #[error("Malformed content stream: {0}")]
    ContentStream(String),

    /// Rendering failed in one of the collaborating libraries
    #[error("{message}")]
    Render {
        message: String,
        #[source]
        source: BoxedCause,
    },

    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a lower level failure as a render error
    pub fn render(message: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        Error::Render {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Whether this error is a caller contract violation rather than a rendering failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidSearchKey(_)
                | Error::LigatureInSearchKey { .. }
                | Error::InvalidPattern { .. }
                | Error::InvalidArgument(_)
                | Error::TooManyPages(_)
                | Error::FileNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(Error::InvalidArgument("x".to_string()).is_validation());
        assert!(Error::TooManyPages(2).is_validation());
        assert!(!Error::ContentStream("x".to_string()).is_validation());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let err = Error::render("Template could not be loaded", io);
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Template could not be loaded");
        assert!(std::error::Error::source(&err).is_some());
    }
}
