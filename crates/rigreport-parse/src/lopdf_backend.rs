//! lopdf-based document access.
//!
//! Opens documents, resolves inherited page attributes and drives the
//! content stream interpreter for a page.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use rigreport_core::{Ctm, PdfError};

use crate::error::BackendError;
use crate::handler::ContentHandler;
use crate::interpreter::interpret_content;
use crate::interpreter_state::InterpreterState;

/// Page tree depth at which attribute inheritance stops.
const MAX_INHERIT_DEPTH: usize = 32;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: Document,
    /// Page object ids indexed by 0-based page number.
    page_ids: Vec<ObjectId>,
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// The visible area of a page in PDF user space (bottom-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PageBox {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    fn from_array(items: &[Object]) -> Result<Self, BackendError> {
        let [a, b, c, d] = items else {
            return Err(BackendError::Parse(format!(
                "expected 4-element array for page box, got {}",
                items.len()
            )));
        };
        let value = |o: &Object| {
            number(o).ok_or_else(|| BackendError::Parse(format!("non-numeric page box entry {o:?}")))
        };
        let (xa, ya, xb, yb) = (value(a)?, value(b)?, value(c)?, value(d)?);
        Ok(Self {
            x0: xa.min(xb),
            y0: ya.min(yb),
            x1: xa.max(xb),
            y1: ya.max(yb),
        })
    }
}

impl LopdfDocument {
    /// Open a PDF file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        Ok(Self::from_document(Document::load(path)?))
    }

    /// Parse a PDF held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        Ok(Self::from_document(Document::load_mem(bytes)?))
    }

    pub fn from_document(inner: Document) -> Self {
        let page_ids = inner.get_pages().into_values().collect();
        Self { inner, page_ids }
    }

    pub fn inner(&self) -> &Document {
        &self.inner
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_id(&self, index: usize) -> Result<ObjectId, BackendError> {
        self.page_ids.get(index).copied().ok_or(BackendError::Core(PdfError::PageOutOfRange {
            index,
            count: self.page_ids.len(),
        }))
    }

    /// The page's CropBox, or its MediaBox when it has none. Both may be inherited.
    pub fn page_box(&self, index: usize) -> Result<PageBox, BackendError> {
        let page_id = self.page_id(index)?;
        let media = inherited(&self.inner, page_id, b"MediaBox")
            .and_then(|o| resolve(&self.inner, o).as_array().ok())
            .ok_or_else(|| BackendError::Parse(format!("page {} has no /MediaBox", index + 1)))?;
        let media = PageBox::from_array(media)?;

        let crop = inherited(&self.inner, page_id, b"CropBox")
            .and_then(|o| resolve(&self.inner, o).as_array().ok())
            .and_then(|items| PageBox::from_array(items).ok());
        Ok(crop.unwrap_or(media))
    }

    /// Interpret the page content, reporting glyphs and paths to `handler`.
    ///
    /// Coordinates are shifted so the page box's lower-left corner is the origin.
    pub fn interpret_page(&self, index: usize, handler: &mut dyn ContentHandler) -> Result<PageBox, BackendError> {
        let page_id = self.page_id(index)?;
        let page_box = self.page_box(index)?;
        let content = self.inner.get_page_content(page_id)?;

        let empty = Dictionary::new();
        let resources = inherited(&self.inner, page_id, b"Resources")
            .and_then(|o| resolve(&self.inner, o).as_dict().ok())
            .unwrap_or(&empty);

        let mut gstate = InterpreterState::with_ctm(Ctm::translation(-page_box.x0, -page_box.y0));
        interpret_content(&self.inner, &content, resources, handler, &mut gstate)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(page = index + 1, "interpreted page content");

        Ok(page_box)
    }
}

/// Look up `key` on the page or its ancestors in the page tree.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_INHERIT_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Follow a reference chain to the object it names.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match doc.dereference(obj) {
        Ok((_, resolved)) => resolved,
        Err(_) => obj,
    }
}

/// A numeric object as `f64`.
pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}
