//! Edge derivation from geometric primitives.
//!
//! Edges are line segments derived from Lines and Rects for use in table
//! detection.

use crate::geometry::Orientation;
use crate::shapes::{Line, Rect};

/// Source of an edge, tracking which geometric primitive it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSource {
    Line,
    RectTop,
    RectBottom,
    RectLeft,
    RectRight,
}

/// A line segment edge for table detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Left x coordinate.
    pub x0: f64,
    /// Top y coordinate (distance from top of page).
    pub top: f64,
    /// Right x coordinate.
    pub x1: f64,
    /// Bottom y coordinate (distance from top of page).
    pub bottom: f64,
    pub orientation: Orientation,
    pub source: EdgeSource,
}

impl Edge {
    /// Length along the edge's primary axis.
    pub fn length(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.x1 - self.x0,
            Orientation::Vertical => self.bottom - self.top,
            Orientation::Diagonal => {
                let dx = self.x1 - self.x0;
                let dy = self.bottom - self.top;
                (dx * dx + dy * dy).sqrt()
            }
        }
    }
}

/// Derive an Edge from a Line (direct conversion).
pub fn edge_from_line(line: &Line) -> Edge {
    Edge {
        x0: line.x0,
        top: line.top,
        x1: line.x1,
        bottom: line.bottom,
        orientation: line.orientation,
        source: EdgeSource::Line,
    }
}

/// Derive 4 Edges from a Rect (top, bottom, left, right).
pub fn edges_from_rect(rect: &Rect) -> Vec<Edge> {
    let horizontal = |y: f64, source| Edge {
        x0: rect.x0,
        top: y,
        x1: rect.x1,
        bottom: y,
        orientation: Orientation::Horizontal,
        source,
    };
    let vertical = |x: f64, source| Edge {
        x0: x,
        top: rect.top,
        x1: x,
        bottom: rect.bottom,
        orientation: Orientation::Vertical,
        source,
    };
    vec![
        horizontal(rect.top, EdgeSource::RectTop),
        horizontal(rect.bottom, EdgeSource::RectBottom),
        vertical(rect.x0, EdgeSource::RectLeft),
        vertical(rect.x1, EdgeSource::RectRight),
    ]
}

/// Collect the edges of all lines and rects.
///
/// Diagonal lines cannot bound a ruled cell and are left out.
pub fn derive_edges(lines: &[Line], rects: &[Rect]) -> Vec<Edge> {
    let mut edges: Vec<Edge> = lines
        .iter()
        .filter(|l| l.orientation != Orientation::Diagonal)
        .map(edge_from_line)
        .collect();
    for rect in rects {
        edges.extend(edges_from_rect(rect));
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, top: f64, x1: f64, bottom: f64) -> Rect {
        Rect {
            x0,
            top,
            x1,
            bottom,
            line_width: 1.0,
            stroke: true,
            fill: false,
        }
    }

    #[test]
    fn rect_yields_four_edges() {
        let edges = edges_from_rect(&rect(10.0, 20.0, 110.0, 70.0));
        assert_eq!(edges.len(), 4);
        let top = &edges[0];
        assert_eq!((top.x0, top.top, top.x1, top.bottom), (10.0, 20.0, 110.0, 20.0));
        assert_eq!(top.source, EdgeSource::RectTop);
        let right = &edges[3];
        assert_eq!(right.orientation, Orientation::Vertical);
        assert_eq!((right.x0, right.top, right.bottom), (110.0, 20.0, 70.0));
    }

    #[test]
    fn diagonal_lines_are_skipped() {
        let lines = vec![
            Line::from_points((0.0, 0.0), (100.0, 100.0), 1.0),
            Line::from_points((0.0, 10.0), (100.0, 10.0), 1.0),
        ];
        let edges = derive_edges(&lines, &[]);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].length(), 100.0);
    }
}
