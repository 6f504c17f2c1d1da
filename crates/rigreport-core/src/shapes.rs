//! Painted page geometry in top-left origin coordinates.
//!
//! The interpreter reports paths in PDF user space; the facade flips them
//! into [`Line`]s and [`Rect`]s here before edges are derived for table
//! detection.

use crate::geometry::{BBox, Orientation};

/// A straight painted segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
    /// Stroke width at paint time.
    pub line_width: f64,
    pub orientation: Orientation,
}

impl Line {
    /// Build a line from two end points, normalizing so `x0 <= x1` and `top <= bottom`.
    pub fn from_points(a: (f64, f64), b: (f64, f64), line_width: f64) -> Self {
        let x0 = a.0.min(b.0);
        let x1 = a.0.max(b.0);
        let top = a.1.min(b.1);
        let bottom = a.1.max(b.1);
        Self {
            x0,
            top,
            x1,
            bottom,
            line_width,
            orientation: Orientation::of(a.0, a.1, b.0, b.1),
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(self.x0, self.top, self.x1, self.bottom)
    }

    /// Clip to `crop`, or `None` when the segment lies outside it.
    ///
    /// Only axis-aligned lines are clipped exactly; a diagonal is kept or dropped whole.
    pub fn clipped(&self, crop: &BBox) -> Option<Line> {
        let visible = self.bbox().intersection(crop)?;
        if self.orientation == Orientation::Diagonal {
            return Some(self.clone());
        }
        Some(Line {
            x0: visible.x0,
            top: visible.top,
            x1: visible.x1,
            bottom: visible.bottom,
            ..self.clone()
        })
    }
}

/// An axis-aligned painted rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
    pub line_width: f64,
    pub stroke: bool,
    pub fill: bool,
}

impl Rect {
    pub fn bbox(&self) -> BBox {
        BBox::new(self.x0, self.top, self.x1, self.bottom)
    }

    pub fn clipped(&self, crop: &BBox) -> Option<Rect> {
        let visible = self.bbox().intersection(crop)?;
        Some(Rect {
            x0: visible.x0,
            top: visible.top,
            x1: visible.x1,
            bottom: visible.bottom,
            ..self.clone()
        })
    }
}
