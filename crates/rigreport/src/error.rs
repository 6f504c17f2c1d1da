//! Errors of the extraction run's fallible steps.

use std::path::PathBuf;

use rigreport_core::PdfError;
use thiserror::Error;

/// A step of a run that could not complete.
///
/// [`crate::run`] logs these and carries on; only the CLI turns them into an
/// exit status.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("cannot read catalog {}: {source}", .path.display())]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON in {}: {source}", .path.display())]
    CatalogJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize report to {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
