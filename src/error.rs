//! Error types for the xml2table library.

use std::io;
use thiserror::Error;

/// Result type alias for xml2table operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a document.
///
/// Flattening and normalization never fail on a parsed tree, so every
/// variant here belongs to the read/parse boundary or the output sink.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading the input or writing the output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not well-formed XML.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// The input bytes could not be decoded as text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Error writing the ZIP archive of a spreadsheet.
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// Error during rendering.
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error was caused by malformed or undecodable input.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::XmlParse(_) | Error::Encoding(_))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::Zip(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::XmlParse("unclosed element <a>".to_string());
        assert_eq!(err.to_string(), "XML parse error: unclosed element <a>");

        let err = Error::Encoding("invalid UTF-8".to_string());
        assert_eq!(err.to_string(), "Encoding error: invalid UTF-8");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_parse_error());
    }

    #[test]
    fn test_parse_error_class() {
        assert!(Error::XmlParse(String::new()).is_parse_error());
        assert!(Error::Encoding(String::new()).is_parse_error());
        assert!(!Error::Zip(String::new()).is_parse_error());
    }
}
