//! Callback trait between the content stream interpreter and its consumers.
//!
//! The interpreter reports every shown glyph as a [`CharEvent`] and every
//! painted path as a [`PathEvent`]. Coordinates stay in PDF user space
//! (bottom-left origin); consumers flip them into page coordinates.

/// The type of paint operation applied to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOp {
    Stroke,
    Fill,
    FillAndStroke,
}

impl PaintOp {
    pub fn strokes(self) -> bool {
        matches!(self, PaintOp::Stroke | PaintOp::FillAndStroke)
    }

    pub fn fills(self) -> bool {
        matches!(self, PaintOp::Fill | PaintOp::FillAndStroke)
    }
}

/// A rendered glyph with everything needed to place its box.
#[derive(Debug, Clone)]
pub struct CharEvent {
    /// The character code from the shown string.
    pub char_code: u32,
    /// Text from the font's ToUnicode map or encoding, if any.
    pub unicode: Option<String>,
    pub font_name: String,
    /// Font size in text space units.
    pub font_size: f64,
    /// Text matrix at the time the glyph was shown.
    pub text_matrix: [f64; 6],
    /// CTM at the time the glyph was shown.
    pub ctm: [f64; 6],
    /// Glyph advance width in glyph space units (1/1000 of text space).
    pub displacement: f64,
    /// Horizontal scaling as a fraction (`Tz 100` = 1.0).
    pub h_scaling: f64,
    /// Text rise (`Ts`).
    pub rise: f64,
    /// Font ascent in glyph space units.
    pub ascent: f64,
    /// Font descent in glyph space units (negative).
    pub descent: f64,
}

/// One segment of a painted path, already transformed by the CTM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    /// Cubic Bézier: two control points and the end point.
    CurveTo([(f64, f64); 3]),
    ClosePath,
}

/// A painted path.
#[derive(Debug, Clone)]
pub struct PathEvent {
    pub segments: Vec<PathSegment>,
    pub paint_op: PaintOp,
    /// Stroke width scaled by the CTM.
    pub line_width: f64,
}

/// Receives interpreter events. Every method defaults to a no-op.
pub trait ContentHandler {
    /// Called when a glyph is shown.
    fn on_char(&mut self, _event: CharEvent) {}

    /// Called when a path is stroked, filled, or both.
    fn on_path_painted(&mut self, _event: PathEvent) {}

    /// Called for recoverable problems such as a missing font resource.
    fn on_warning(&mut self, _message: String) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CollectingHandler {
        chars: Vec<CharEvent>,
        paths: Vec<PathEvent>,
        warnings: Vec<String>,
    }

    impl ContentHandler for CollectingHandler {
        fn on_char(&mut self, event: CharEvent) {
            self.chars.push(event);
        }

        fn on_path_painted(&mut self, event: PathEvent) {
            self.paths.push(event);
        }

        fn on_warning(&mut self, message: String) {
            self.warnings.push(message);
        }
    }

    struct NoopHandler;
    impl ContentHandler for NoopHandler {}

    fn sample_char_event() -> CharEvent {
        CharEvent {
            char_code: 65,
            unicode: Some("A".to_string()),
            font_name: "Helvetica".to_string(),
            font_size: 12.0,
            text_matrix: [1.0, 0.0, 0.0, 1.0, 72.0, 720.0],
            ctm: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            displacement: 667.0,
            h_scaling: 1.0,
            rise: 0.0,
            ascent: 750.0,
            descent: -250.0,
        }
    }

    #[test]
    fn paint_op_flags() {
        assert!(PaintOp::Stroke.strokes() && !PaintOp::Stroke.fills());
        assert!(PaintOp::Fill.fills() && !PaintOp::Fill.strokes());
        assert!(PaintOp::FillAndStroke.fills() && PaintOp::FillAndStroke.strokes());
    }

    #[test]
    fn collecting_handler_receives_events() {
        let mut handler = CollectingHandler {
            chars: Vec::new(),
            paths: Vec::new(),
            warnings: Vec::new(),
        };
        handler.on_char(sample_char_event());
        handler.on_path_painted(PathEvent {
            segments: vec![PathSegment::MoveTo(0.0, 0.0), PathSegment::LineTo(10.0, 0.0)],
            paint_op: PaintOp::Stroke,
            line_width: 1.0,
        });
        handler.on_warning("font /F9 not found".into());
        assert_eq!(handler.chars[0].unicode.as_deref(), Some("A"));
        assert_eq!(handler.paths[0].segments.len(), 2);
        assert_eq!(handler.warnings.len(), 1);
    }

    #[test]
    fn noop_handler_accepts_everything() {
        let mut handler = NoopHandler;
        handler.on_char(sample_char_event());
        handler.on_warning(String::new());
    }
}
