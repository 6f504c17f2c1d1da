//! In-memory report PDFs for the integration tests.
//!
//! Pages are US Letter (612 x 792). Tables are drawn as stroked `re` cells and
//! filled with Helvetica text, 10pt, so each character is 5pt wide.

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

pub const PAGE_HEIGHT: f64 = 792.0;

/// A ruled cell in PDF user space (bottom-left origin) with optional text.
pub struct Cell<'a> {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub text: &'a str,
}

/// Cells of equal `width` side by side, starting at `x`, rows stacked downward from `top_y`.
pub fn grid<'a>(x: f64, top_y: f64, width: f64, height: f64, rows: &[&[&'a str]]) -> Vec<Cell<'a>> {
    let mut cells = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        let y1 = top_y - height * r as f64;
        for (c, &text) in row.iter().enumerate() {
            let x0 = x + width * c as f64;
            cells.push(Cell {
                x0,
                y0: y1 - height,
                x1: x0 + width,
                y1,
                text,
            });
        }
    }
    cells
}

/// Content stream that strokes every cell and writes its text 5pt in from the left.
pub fn cells_content(cells: &[Cell<'_>]) -> Vec<u8> {
    let mut out = String::from("0.5 w\n");
    for cell in cells {
        out.push_str(&format!(
            "{} {} {} {} re S\n",
            cell.x0,
            cell.y0,
            cell.x1 - cell.x0,
            cell.y1 - cell.y0
        ));
    }
    for cell in cells.iter().filter(|c| !c.text.is_empty()) {
        out.push_str(&format!(
            "BT /F1 10 Tf {} {} Td ({}) Tj ET\n",
            cell.x0 + 5.0,
            cell.y0 + 5.0,
            cell.text
        ));
    }
    out.into_bytes()
}

pub fn helvetica(doc: &mut Document) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    })
}

/// A document with one page per content stream. `extra` may add entries
/// (such as `/Annots`) to each page dictionary.
pub fn document(pages: &[Vec<u8>], mut extra: impl FnMut(&mut Document, usize, &mut Dictionary)) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font = helvetica(&mut doc);

    let mut kids = Vec::new();
    for (i, content) in pages.iter().enumerate() {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.clone()));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font } },
        };
        extra(&mut doc, i, &mut page);
        kids.push(Object::from(doc.add_object(page)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);
    doc
}

pub fn to_bytes(doc: &mut Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

/// Catalog coordinates `(top, left, bottom, right)` around a PDF-space box, with a margin.
pub fn catalog_coords(x0: f64, y0: f64, x1: f64, y1: f64, margin: f64) -> [f64; 4] {
    [
        PAGE_HEIGHT - y1 - margin,
        x0 - margin,
        PAGE_HEIGHT - y0 + margin,
        x1 + margin,
    ]
}
