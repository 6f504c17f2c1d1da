//! CroppedPage: the part of a page inside one catalog box.

use rigreport_core::{BBox, Char, Edge, Line, Rect, Table, TableFinder, TableSettings, derive_edges};

/// A spatially filtered view of a [`crate::Page`].
///
/// Created by [`crate::Page::crop`]. Objects are clipped to the crop box and
/// keep page coordinates.
#[derive(Debug, Clone)]
pub struct CroppedPage {
    bbox: BBox,
    chars: Vec<Char>,
    lines: Vec<Line>,
    rects: Vec<Rect>,
}

impl CroppedPage {
    pub(crate) fn new(bbox: BBox, chars: Vec<Char>, lines: Vec<Line>, rects: Vec<Rect>) -> Self {
        Self {
            bbox,
            chars,
            lines,
            rects,
        }
    }

    /// The crop box after clamping to the page.
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn edges(&self) -> Vec<Edge> {
        derive_edges(&self.lines, &self.rects)
    }

    /// All ruled tables in the region.
    pub fn find_tables(&self, settings: &TableSettings) -> Vec<Table> {
        TableFinder::new(self.edges(), settings.clone()).find_tables()
    }

    /// Text of the largest ruled table, row by row; `None` when there is no table.
    ///
    /// Cells missing from a row (merged cells) are `None`; a cell without text
    /// is `Some("")`.
    pub fn extract_table(&self, settings: &TableSettings) -> Option<Vec<Vec<Option<String>>>> {
        let table = TableFinder::new(self.edges(), settings.clone()).largest_table()?;
        Some(table.extract(&self.chars, settings))
    }
}
