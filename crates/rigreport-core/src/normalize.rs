//! Display correction for extracted cell text.
//!
//! Glyphs of right-to-left scripts come out of the page in visual order. The
//! normalizer shapes them, runs the bidirectional algorithm to flip each
//! paragraph back, and folds presentation forms away with a Unicode
//! normalization form.

use std::borrow::Cow;

use unicode_bidi::{BidiClass, BidiInfo, bidi_class};
use unicode_normalization::UnicodeNormalization;

use crate::grid::RawGrid;
use crate::shaping::reshape;

/// Unicode normalization form applied after reordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnicodeNorm {
    /// Leave the text as reordered.
    None,
    Nfc,
    Nfd,
    #[default]
    Nfkc,
    Nfkd,
}

impl UnicodeNorm {
    pub fn apply(self, text: &str) -> String {
        match self {
            UnicodeNorm::None => text.to_string(),
            UnicodeNorm::Nfc => text.nfc().collect(),
            UnicodeNorm::Nfd => text.nfd().collect(),
            UnicodeNorm::Nfkc => text.nfkc().collect(),
            UnicodeNorm::Nfkd => text.nfkd().collect(),
        }
    }
}

/// Rewrites one cell's text. Implementations must not fail; when a step cannot
/// be applied they return the input unchanged.
pub trait TextNormalizer {
    fn normalize(&self, text: &str) -> String;

    /// Normalize every cell of a grid.
    fn normalize_grid(&self, grid: RawGrid) -> RawGrid {
        grid.map_cells(|cell| self.normalize(cell))
    }
}

/// Reshape, reorder for display, then apply a normalization form.
#[derive(Debug, Clone, Default)]
pub struct PersianDisplayNormalizer {
    pub form: UnicodeNorm,
}

impl PersianDisplayNormalizer {
    pub fn new(form: UnicodeNorm) -> Self {
        Self { form }
    }
}

impl TextNormalizer for PersianDisplayNormalizer {
    fn normalize(&self, text: &str) -> String {
        let shaped = reshape(text);
        let visual = display_order(&shaped);
        self.form.apply(&visual)
    }
}

/// Passes text through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl TextNormalizer for IdentityNormalizer {
    fn normalize(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Reorder text into display order, one paragraph at a time.
///
/// Each paragraph takes its base level from its first strong character and keeps
/// its trailing separator in place. Mirrored characters are not swapped.
pub fn display_order(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let info = BidiInfo::new(text, None);
    if !info.has_rtl() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for para in &info.paragraphs {
        let mut line = para.range.clone();
        let separator = text[line.clone()]
            .chars()
            .next_back()
            .filter(|&c| bidi_class(c) == BidiClass::B);
        if let Some(c) = separator {
            line.end -= c.len_utf8();
        }
        if !line.is_empty() {
            let visual: Cow<'_, str> = info.reorder_line(para, line);
            out.push_str(&visual);
        }
        if let Some(c) = separator {
            out.push(c);
        }
    }
    out
}
