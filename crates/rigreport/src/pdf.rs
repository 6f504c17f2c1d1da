//! Top-level PDF document type.

use std::path::Path;

use rigreport_core::{Char, Line, PdfError, Rect};
use rigreport_parse::{CharEvent, ContentHandler, LopdfDocument, PathEvent, char_from_event};

use crate::page::{Page, shapes_from_path};

/// A PDF document opened for extraction.
///
/// ```ignore
/// let pdf = Pdf::open_file("report_flatten.pdf")?;
/// let page = pdf.page(0)?;
/// let table = page.crop(bbox).extract_table(&TableSettings::default());
/// ```
#[derive(Debug)]
pub struct Pdf {
    doc: LopdfDocument,
}

/// Collects content stream events during interpretation.
#[derive(Default)]
struct CollectingHandler {
    chars: Vec<CharEvent>,
    paths: Vec<PathEvent>,
    page_index: usize,
}

impl ContentHandler for CollectingHandler {
    fn on_char(&mut self, event: CharEvent) {
        self.chars.push(event);
    }

    fn on_path_painted(&mut self, event: PathEvent) {
        self.paths.push(event);
    }

    fn on_warning(&mut self, message: String) {
        tracing::debug!(page = self.page_index + 1, "{message}");
    }
}

impl Pdf {
    /// Open a PDF document from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the file cannot be read or is not a valid PDF.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| PdfError::IoError(e.to_string()))?;
        Self::open(&bytes)
    }

    /// Open a PDF document from bytes.
    pub fn open(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = LopdfDocument::from_bytes(bytes).map_err(PdfError::from)?;
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    /// Interpret page `index` (0-based) into chars, lines and rects.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the index is out of range or the page content
    /// cannot be interpreted.
    pub fn page(&self, index: usize) -> Result<Page, PdfError> {
        let mut handler = CollectingHandler {
            page_index: index,
            ..CollectingHandler::default()
        };
        let page_box = self.doc.interpret_page(index, &mut handler).map_err(PdfError::from)?;
        let height = page_box.height();

        let chars: Vec<Char> = handler
            .chars
            .iter()
            .map(|event| char_from_event(event, height))
            .collect();

        let mut lines: Vec<Line> = Vec::new();
        let mut rects: Vec<Rect> = Vec::new();
        for event in &handler.paths {
            let (path_lines, path_rects) = shapes_from_path(event, height);
            lines.extend(path_lines);
            rects.extend(path_rects);
        }

        tracing::trace!(
            page = index + 1,
            chars = chars.len(),
            lines = lines.len(),
            rects = rects.len(),
            "page interpreted"
        );
        Ok(Page::with_geometry(index, page_box.width(), height, chars, lines, rects))
    }
}
