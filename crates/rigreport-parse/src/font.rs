//! Fonts as the interpreter needs them: code splitting, text and widths.

use lopdf::{Dictionary, Document};

use crate::cmap::CMap;
use crate::encoding::{BaseEncoding, SimpleEncoding};
use crate::font_metrics::FontMetrics;
use crate::lopdf_backend::resolve;

/// One glyph code read from a shown string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphCode {
    pub code: u32,
    /// Number of bytes the code occupied; word spacing applies to 1-byte code 32 only.
    pub len: usize,
}

#[derive(Debug, Clone)]
pub struct LoadedFont {
    /// `/BaseFont` without a subset prefix.
    pub name: String,
    composite: bool,
    to_unicode: Option<CMap>,
    encoding: SimpleEncoding,
    metrics: FontMetrics,
}

impl LoadedFont {
    /// Load a font dictionary. Missing or broken parts fall back to defaults.
    pub fn load(doc: &Document, font: &Dictionary) -> Self {
        let name = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| resolve(doc, o).as_name().ok())
            .map(|n| strip_subset_prefix(&String::from_utf8_lossy(n)).to_string())
            .unwrap_or_default();
        let composite = matches!(font.get(b"Subtype").and_then(|o| o.as_name()), Ok(b"Type0"));
        let to_unicode = font
            .get(b"ToUnicode")
            .ok()
            .and_then(|o| resolve(doc, o).as_stream().ok())
            .and_then(|stream| stream.get_plain_content().ok())
            .and_then(|data| CMap::parse(&data).ok());

        let metrics = if composite {
            descendant(doc, font)
                .map(|d| FontMetrics::cid(doc, d))
                .unwrap_or_default()
        } else {
            FontMetrics::simple(doc, font)
        };

        let encoding = if composite {
            SimpleEncoding::default()
        } else {
            simple_encoding(doc, font)
        };

        Self {
            name,
            composite,
            to_unicode,
            encoding,
            metrics,
        }
    }

    /// Stand-in for a font resource that cannot be found.
    pub fn fallback(resource_name: &str) -> Self {
        Self {
            name: resource_name.to_string(),
            composite: false,
            to_unicode: None,
            encoding: SimpleEncoding::new(BaseEncoding::WinAnsi),
            metrics: FontMetrics::default(),
        }
    }

    pub fn is_composite(&self) -> bool {
        self.composite
    }

    /// Split a shown string into glyph codes.
    ///
    /// Composite fonts use the ToUnicode code space when it declares one and
    /// two-byte codes otherwise; simple fonts use one byte per code.
    pub fn codes(&self, bytes: &[u8]) -> Vec<GlyphCode> {
        if !self.composite {
            return bytes
                .iter()
                .map(|b| GlyphCode {
                    code: u32::from(*b),
                    len: 1,
                })
                .collect();
        }
        let spaces = self.to_unicode.as_ref().filter(|c| c.has_code_spaces());
        let mut codes = Vec::with_capacity(bytes.len() / 2);
        let mut rest = bytes;
        while !rest.is_empty() {
            let (code, len) = spaces
                .and_then(|cmap| cmap.next_code(rest))
                .unwrap_or_else(|| match rest {
                    [hi, lo, ..] => ((u32::from(*hi) << 8) | u32::from(*lo), 2),
                    [single, ..] => (u32::from(*single), 1),
                    [] => (0, 1),
                });
            codes.push(GlyphCode { code, len });
            rest = &rest[len.min(rest.len())..];
        }
        codes
    }

    /// Text for a glyph code, if the font defines one.
    pub fn unicode(&self, code: u32) -> Option<String> {
        if let Some(text) = self.to_unicode.as_ref().and_then(|c| c.lookup(code)) {
            return Some(text.to_string());
        }
        if self.composite {
            return None;
        }
        u8::try_from(code)
            .ok()
            .and_then(|b| self.encoding.decode(b))
            .map(String::from)
    }

    pub fn width(&self, code: u32) -> f64 {
        self.metrics.width(code)
    }

    pub fn ascent(&self) -> f64 {
        self.metrics.ascent()
    }

    pub fn descent(&self) -> f64 {
        self.metrics.descent()
    }
}

fn descendant<'a>(doc: &'a Document, font: &'a Dictionary) -> Option<&'a Dictionary> {
    let list = resolve(doc, font.get(b"DescendantFonts").ok()?).as_array().ok()?;
    resolve(doc, list.first()?).as_dict().ok()
}

fn simple_encoding(doc: &Document, font: &Dictionary) -> SimpleEncoding {
    let Ok(entry) = font.get(b"Encoding") else {
        return SimpleEncoding::default();
    };
    match resolve(doc, entry) {
        lopdf::Object::Name(name) => SimpleEncoding::new(BaseEncoding::from_name(name).unwrap_or_default()),
        lopdf::Object::Dictionary(dict) => {
            let base = dict
                .get(b"BaseEncoding")
                .ok()
                .and_then(|o| o.as_name().ok())
                .and_then(BaseEncoding::from_name)
                .unwrap_or_default();
            let mut encoding = SimpleEncoding::new(base);
            if let Some(differences) = dict.get(b"Differences").ok().and_then(|o| resolve(doc, o).as_array().ok()) {
                encoding.apply_differences(differences);
            }
            encoding
        }
        _ => SimpleEncoding::default(),
    }
}

/// `ABCDEF+Vazir` → `Vazir`.
fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((prefix, rest)) if prefix.len() == 6 && prefix.chars().all(|c| c.is_ascii_uppercase()) => rest,
        _ => name,
    }
}
