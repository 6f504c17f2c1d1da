//! rigreport-parse: PDF parsing backend and content stream interpreter.
//!
//! Reads documents with lopdf, interprets page content into glyph and path
//! events, decodes fonts and ToUnicode CMaps, and flattens form-field
//! annotations into page content. Shared data types live in `rigreport-core`.

pub mod char_extraction;
pub mod cmap;
pub mod encoding;
pub mod error;
pub mod flatten;
pub mod font;
pub mod font_metrics;
pub mod handler;
pub mod interpreter;
pub mod interpreter_state;
pub mod lopdf_backend;
pub mod text_state;

pub use char_extraction::char_from_event;
pub use cmap::CMap;
pub use error::BackendError;
pub use flatten::{FlattenSummary, flatten_annotations, flatten_file};
pub use handler::{CharEvent, ContentHandler, PaintOp, PathEvent, PathSegment};
pub use lopdf_backend::{LopdfDocument, PageBox};
pub use rigreport_core;
