//! Character boxes from glyph events.
//!
//! Combines font metrics, text state and CTM into a [`Char`] in top-left
//! origin page coordinates.

use rigreport_core::{BBox, Char, Ctm};

use crate::handler::CharEvent;

/// Convert a [`CharEvent`] into a [`Char`].
///
/// The text rendering matrix is `[Tfs*Th 0 0 Tfs 0 Trise] × Tm × CTM`; the
/// glyph box spans the advance width horizontally and descent..ascent
/// vertically. `top = page_height - max_y`.
pub fn char_from_event(event: &CharEvent, page_height: f64) -> Char {
    let font_matrix = Ctm::new(
        event.font_size * event.h_scaling,
        0.0,
        0.0,
        event.font_size,
        0.0,
        event.rise,
    );
    let trm = font_matrix
        .concat(&Ctm::from_array(event.text_matrix))
        .concat(&Ctm::from_array(event.ctm));

    let width = event.displacement / 1000.0;
    let ascent = event.ascent / 1000.0;
    let descent = event.descent / 1000.0;
    let corners = [
        trm.transform(0.0, descent),
        trm.transform(width, descent),
        trm.transform(width, ascent),
        trm.transform(0.0, ascent),
    ];

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for (x, y) in corners {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let text = event.unicode.clone().unwrap_or_else(|| {
        char::from_u32(event.char_code)
            .map(String::from)
            .unwrap_or_else(|| "\u{FFFD}".to_string())
    });

    Char {
        text,
        bbox: BBox::new(min_x, page_height - max_y, max_x, page_height - min_y),
        fontname: event.font_name.clone(),
        size: (trm.c * trm.c + trm.d * trm.d).sqrt(),
        upright: trm.b.abs() < 1e-6 && trm.c.abs() < 1e-6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_HEIGHT: f64 = 792.0;

    fn default_event() -> CharEvent {
        CharEvent {
            char_code: 65,
            unicode: Some("A".to_string()),
            font_name: "Helvetica".to_string(),
            font_size: 12.0,
            text_matrix: [1.0, 0.0, 0.0, 1.0, 72.0, 720.0],
            ctm: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            displacement: 500.0,
            h_scaling: 1.0,
            rise: 0.0,
            ascent: 750.0,
            descent: -250.0,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn simple_glyph_box() {
        let ch = char_from_event(&default_event(), PAGE_HEIGHT);
        assert_eq!(ch.text, "A");
        assert_close(ch.bbox.x0, 72.0);
        assert_close(ch.bbox.x1, 78.0);
        // ascent 9pt above the baseline at y=720
        assert_close(ch.bbox.top, PAGE_HEIGHT - 729.0);
        assert_close(ch.bbox.bottom, PAGE_HEIGHT - 717.0);
        assert_close(ch.size, 12.0);
        assert!(ch.upright);
    }

    #[test]
    fn ctm_scales_the_box() {
        let event = CharEvent {
            ctm: [2.0, 0.0, 0.0, 2.0, 0.0, 0.0],
            text_matrix: [1.0, 0.0, 0.0, 1.0, 10.0, 10.0],
            ..default_event()
        };
        let ch = char_from_event(&event, PAGE_HEIGHT);
        assert_close(ch.bbox.x0, 20.0);
        assert_close(ch.bbox.width(), 12.0);
        assert_close(ch.size, 24.0);
    }

    #[test]
    fn rotated_text_is_not_upright() {
        let event = CharEvent {
            text_matrix: [0.0, 1.0, -1.0, 0.0, 100.0, 100.0],
            ..default_event()
        };
        assert!(!char_from_event(&event, PAGE_HEIGHT).upright);
    }

    #[test]
    fn missing_unicode_falls_back_to_code() {
        let event = CharEvent {
            unicode: None,
            char_code: 0x0628,
            ..default_event()
        };
        assert_eq!(char_from_event(&event, PAGE_HEIGHT).text, "ب");
    }
}
