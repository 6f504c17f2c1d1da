//! Error type shared by the PDF backend and the facade.

use std::fmt;

/// Fatal errors for a PDF operation.
///
/// Only the operation that raised one fails; the extraction run logs it and moves
/// on to the next table.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading or writing PDF data.
    IoError(String),
    /// Error resolving font or encoding information.
    FontError(String),
    /// Error during content stream interpretation.
    InterpreterError(String),
    /// A page index past the end of the document.
    PageOutOfRange {
        /// Requested page (0-based).
        index: usize,
        /// Number of pages in the document.
        count: usize,
    },
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::FontError(msg) => write!(f, "font error: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::PageOutOfRange { index, count } => {
                write!(f, "page {} out of range (document has {count} pages)", index + 1)
            }
            PdfError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(PdfError::ParseError("bad xref".into()).to_string(), "parse error: bad xref");
        assert_eq!(
            PdfError::PageOutOfRange { index: 4, count: 3 }.to_string(),
            "page 5 out of range (document has 3 pages)"
        );
        assert_eq!(PdfError::Other("x".into()).to_string(), "x");
    }

    #[test]
    fn io_error_converts() {
        let err: PdfError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, PdfError::IoError(ref m) if m == "gone"));
    }
}
