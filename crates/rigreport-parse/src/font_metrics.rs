//! Glyph widths and vertical metrics from font dictionaries.
//!
//! Widths are in glyph space units (1/1000 of text space). Simple fonts read
//! `/FirstChar` + `/Widths`; composite fonts read the descendant's `/W` and
//! `/DW`.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};

use crate::lopdf_backend::{number, resolve};

const DEFAULT_ASCENT: f64 = 750.0;
const DEFAULT_DESCENT: f64 = -250.0;
/// Width of a simple font glyph the font does not list.
const DEFAULT_SIMPLE_WIDTH: f64 = 500.0;
/// `/DW` default for CID fonts.
const DEFAULT_CID_WIDTH: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    widths: HashMap<u32, f64>,
    default_width: f64,
    ascent: f64,
    descent: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            widths: HashMap::new(),
            default_width: DEFAULT_SIMPLE_WIDTH,
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
        }
    }
}

impl FontMetrics {
    /// Metrics of a simple (single-byte) font.
    pub fn simple(doc: &Document, font: &Dictionary) -> Self {
        let mut metrics = Self::default();
        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| number(resolve(doc, o)))
            .map_or(0, |v| v.max(0.0) as u32);
        if let Some(widths) = font.get(b"Widths").ok().and_then(|o| resolve(doc, o).as_array().ok()) {
            for (i, width) in widths.iter().enumerate() {
                let code = u32::try_from(i).ok().and_then(|i| first_char.checked_add(i));
                if let (Some(code), Some(w)) = (code, number(resolve(doc, width))) {
                    metrics.widths.insert(code, w);
                }
            }
        }
        if let Some(descriptor) = font_descriptor(doc, font) {
            metrics.apply_descriptor(doc, descriptor);
            if let Some(missing) = descriptor.get(b"MissingWidth").ok().and_then(|o| number(resolve(doc, o))) {
                metrics.default_width = missing;
            }
        }
        metrics
    }

    /// Metrics of a CID font (the descendant of a Type0 font).
    pub fn cid(doc: &Document, descendant: &Dictionary) -> Self {
        let mut metrics = Self {
            default_width: descendant
                .get(b"DW")
                .ok()
                .and_then(|o| number(resolve(doc, o)))
                .unwrap_or(DEFAULT_CID_WIDTH),
            ..Self::default()
        };
        if let Some(w) = descendant.get(b"W").ok().and_then(|o| resolve(doc, o).as_array().ok()) {
            metrics.widths = parse_w_array(doc, w);
        }
        if let Some(descriptor) = font_descriptor(doc, descendant) {
            metrics.apply_descriptor(doc, descriptor);
        }
        metrics
    }

    fn apply_descriptor(&mut self, doc: &Document, descriptor: &Dictionary) {
        let get = |key: &[u8]| descriptor.get(key).ok().and_then(|o| number(resolve(doc, o)));
        if let Some(ascent) = get(b"Ascent").filter(|v| *v != 0.0) {
            self.ascent = ascent;
        }
        if let Some(descent) = get(b"Descent").filter(|v| *v != 0.0) {
            // some producers store the descent as a positive number
            self.descent = -descent.abs();
        }
    }

    /// Width of the glyph for `code`, in glyph space units.
    pub fn width(&self, code: u32) -> f64 {
        self.widths.get(&code).copied().unwrap_or(self.default_width)
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }
}

fn font_descriptor<'a>(doc: &'a Document, font: &'a Dictionary) -> Option<&'a Dictionary> {
    font.get(b"FontDescriptor")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
}

/// Parse a CID `/W` array: `c [w1 w2 ...]` and `c_first c_last w` entries.
fn parse_w_array(doc: &Document, items: &[Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < items.len() {
        let Some(start) = number(resolve(doc, &items[i])).map(|v| v.max(0.0) as u32) else {
            i += 1;
            continue;
        };
        match items.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(list)) => {
                for (j, w) in list.iter().enumerate() {
                    let cid = u32::try_from(j).ok().and_then(|j| start.checked_add(j));
                    if let (Some(cid), Some(w)) = (cid, number(resolve(doc, w))) {
                        widths.insert(cid, w);
                    }
                }
                i += 2;
            }
            Some(end) => {
                let end = number(end).map(|v| v.max(0.0) as u32);
                let w = items.get(i + 2).and_then(|o| number(resolve(doc, o)));
                if let (Some(end), Some(w)) = (end, w) {
                    for cid in start..=end.min(start.saturating_add(0xFFFF)) {
                        widths.insert(cid, w);
                    }
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}
