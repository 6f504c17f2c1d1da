//! rigreport-core: backend-independent types and algorithms.
//!
//! Page geometry and glyphs, ruled-table detection, grid cleanup, display
//! correction for Persian text, and the mapping of cleaned grids to the
//! drilling report document. Nothing here reads PDF files; see
//! `rigreport-parse` for that.

pub mod edges;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod normalize;
pub mod numeric;
pub mod report;
pub mod shaping;
pub mod shapes;
pub mod table;
pub mod text;
pub mod words;

pub use edges::{Edge, EdgeSource, derive_edges, edge_from_line, edges_from_rect};
pub use error::PdfError;
pub use geometry::{BBox, Ctm, Orientation};
pub use grid::{RawGrid, RawRow};
pub use normalize::{IdentityNormalizer, PersianDisplayNormalizer, TextNormalizer, UnicodeNorm, display_order};
pub use numeric::{looks_numeric, to_int};
pub use report::{ReportBuilder, ReportDocument, SheetKind};
pub use shaping::reshape;
pub use shapes::{Line, Rect};
pub use table::{Table, TableFinder, TableSettings};
pub use text::Char;
pub use words::{Word, WordExtractor, WordOptions, extract_text};
