//! rigreport: extract drilling report tables from fixed-layout PDF forms.
//!
//! This is the public API facade. It re-exports types from rigreport-core and
//! uses rigreport-parse for PDF reading, interpretation and flattening.
//!
//! # Architecture
//!
//! - **rigreport-core**: Backend-independent data types, table detection and record mapping
//! - **rigreport-parse**: PDF parsing, content stream interpreter and annotation flattening
//! - **rigreport** (this crate): Pages, the coordinate catalog and the extraction run

pub mod catalog;
pub mod config;
pub mod cropped_page;
pub mod error;
pub mod output;
pub mod page;
pub mod pdf;
pub mod pipeline;

pub use catalog::{FieldCoordinate, load_catalog, read_catalog, select_entries};
pub use config::{DEFAULT_CATALOG_KEY, RunConfig};
pub use cropped_page::CroppedPage;
pub use error::RunError;
pub use output::{output_path, write_report};
pub use page::Page;
pub use pdf::Pdf;
pub use pipeline::{RunOutcome, TableSource, extract_file, extract_report, flatten_if_needed, run};
pub use rigreport_core;
pub use rigreport_core::{
    BBox, IdentityNormalizer, PdfError, PersianDisplayNormalizer, RawGrid, ReportDocument, TableSettings,
    TextNormalizer, UnicodeNorm,
};
pub use rigreport_parse;
pub use rigreport_parse::{FlattenSummary, flatten_file};
