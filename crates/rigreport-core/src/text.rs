use crate::geometry::BBox;

/// A single glyph placed on a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Char {
    /// The text content of this character.
    pub text: String,
    /// Bounding box in top-left origin coordinates.
    pub bbox: BBox,
    /// Font name.
    pub fontname: String,
    /// Font size in points.
    pub size: f64,
    /// Whether the glyph baseline is horizontal.
    pub upright: bool,
}

impl Char {
    /// True for whitespace glyphs, which separate words.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    /// Clip the glyph box to `crop`, or `None` when it lies outside.
    pub fn clipped(&self, crop: &BBox) -> Option<Char> {
        let bbox = self.bbox.intersection(crop)?;
        Some(Char {
            bbox,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_char(text: &str, x0: f64) -> Char {
        Char {
            text: text.to_string(),
            bbox: BBox::new(x0, 10.0, x0 + 5.0, 20.0),
            fontname: "F1".to_string(),
            size: 10.0,
            upright: true,
        }
    }

    #[test]
    fn blank_detection() {
        assert!(make_char(" ", 0.0).is_blank());
        assert!(make_char("\u{a0}", 0.0).is_blank());
        assert!(!make_char("ن", 0.0).is_blank());
    }

    #[test]
    fn clipping_keeps_partial_glyph() {
        let ch = make_char("A", 98.0);
        let clipped = ch.clipped(&BBox::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        assert_eq!(clipped.bbox.x1, 100.0);
        assert!(make_char("A", 200.0).clipped(&BBox::new(0.0, 0.0, 100.0, 100.0)).is_none());
    }
}
