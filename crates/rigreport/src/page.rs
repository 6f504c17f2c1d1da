//! Page type for accessing extracted content from a PDF page.

use rigreport_core::{BBox, Char, Edge, Line, Rect, derive_edges};
use rigreport_parse::{PathEvent, PathSegment};

use crate::cropped_page::CroppedPage;

/// Points closer than this are treated as the same vertex.
const AXIS_TOLERANCE: f64 = 1e-6;

/// A single page from a PDF document.
///
/// Holds the characters and painted geometry of the page in top-left origin
/// coordinates. Constructed by [`crate::Pdf::page`].
#[derive(Debug, Clone)]
pub struct Page {
    /// Page index (0-based).
    page_number: usize,
    width: f64,
    height: f64,
    chars: Vec<Char>,
    lines: Vec<Line>,
    rects: Vec<Rect>,
}

impl Page {
    pub fn new(page_number: usize, width: f64, height: f64, chars: Vec<Char>) -> Self {
        Self::with_geometry(page_number, width, height, chars, Vec::new(), Vec::new())
    }

    pub fn with_geometry(
        page_number: usize,
        width: f64,
        height: f64,
        chars: Vec<Char>,
        lines: Vec<Line>,
        rects: Vec<Rect>,
    ) -> Self {
        Self {
            page_number,
            width,
            height,
            chars,
            lines,
            rects,
        }
    }

    /// Returns the page index (0-based).
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(0.0, 0.0, self.width, self.height)
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

    /// Edges of all lines and rect sides, for table detection.
    pub fn edges(&self) -> Vec<Edge> {
        derive_edges(&self.lines, &self.rects)
    }

    /// Restrict the page to `bbox`.
    ///
    /// The box is first clamped to the page. Objects that do not touch it are
    /// dropped and the rest are clipped to it. Coordinates stay page-relative.
    pub fn crop(&self, bbox: BBox) -> CroppedPage {
        let Some(bounds) = bbox.intersection(&self.bbox()) else {
            return CroppedPage::new(BBox::new(0.0, 0.0, 0.0, 0.0), Vec::new(), Vec::new(), Vec::new());
        };
        CroppedPage::new(
            bounds,
            self.chars.iter().filter_map(|c| c.clipped(&bounds)).collect(),
            self.lines.iter().filter_map(|l| l.clipped(&bounds)).collect(),
            self.rects.iter().filter_map(|r| r.clipped(&bounds)).collect(),
        )
    }
}

/// Split a painted path into lines and rectangles in top-left origin coordinates.
///
/// A closed subpath of four axis-aligned vertices (or five, the last repeating
/// the first) is a rectangle. Any other subpath contributes one line per
/// straight segment when the path is stroked. Subpaths containing curves are
/// skipped.
pub(crate) fn shapes_from_path(event: &PathEvent, page_height: f64) -> (Vec<Line>, Vec<Rect>) {
    let mut lines = Vec::new();
    let mut rects = Vec::new();
    let flip = |(x, y): (f64, f64)| (x, page_height - y);

    for subpath in subpaths(&event.segments) {
        let Some(vertices) = vertices(subpath) else {
            continue;
        };
        if vertices.is_empty() {
            continue;
        }
        let closed = is_closed(subpath, &vertices);

        let corners = match vertices.len() {
            4 => Some(&vertices[..]),
            5 if same_point(vertices[0], vertices[4]) => Some(&vertices[..4]),
            _ => None,
        };
        if let (true, Some(corners)) = (closed, corners) {
            if let Some((x0, y0, x1, y1)) = axis_aligned_box(corners) {
                let (_, top) = flip((x0, y1));
                let (_, bottom) = flip((x0, y0));
                rects.push(Rect {
                    x0,
                    top,
                    x1,
                    bottom,
                    line_width: event.line_width,
                    stroke: event.paint_op.strokes(),
                    fill: event.paint_op.fills(),
                });
                continue;
            }
        }

        if !event.paint_op.strokes() {
            continue;
        }
        let mut current: Option<(f64, f64)> = None;
        for segment in subpath {
            match *segment {
                PathSegment::MoveTo(x, y) => current = Some((x, y)),
                PathSegment::LineTo(x, y) => {
                    if let Some(start) = current {
                        lines.push(Line::from_points(flip(start), flip((x, y)), event.line_width));
                    }
                    current = Some((x, y));
                }
                PathSegment::ClosePath => {
                    let start = vertices[0];
                    if let Some(end) = current.filter(|end| !same_point(*end, start)) {
                        lines.push(Line::from_points(flip(end), flip(start), event.line_width));
                    }
                    current = Some(start);
                }
                PathSegment::CurveTo(_) => {}
            }
        }
    }
    (lines, rects)
}

/// Subpaths, each starting at a `MoveTo`.
fn subpaths(segments: &[PathSegment]) -> Vec<&[PathSegment]> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, segment) in segments.iter().enumerate() {
        if i > start && matches!(segment, PathSegment::MoveTo(..)) {
            out.push(&segments[start..i]);
            start = i;
        }
    }
    if start < segments.len() {
        out.push(&segments[start..]);
    }
    out
}

/// Vertices of a straight-edged subpath, or `None` when it has curves.
fn vertices(subpath: &[PathSegment]) -> Option<Vec<(f64, f64)>> {
    let mut points = Vec::with_capacity(subpath.len());
    for segment in subpath {
        match *segment {
            PathSegment::MoveTo(x, y) | PathSegment::LineTo(x, y) => points.push((x, y)),
            PathSegment::CurveTo(_) => return None,
            PathSegment::ClosePath => {}
        }
    }
    Some(points)
}

fn is_closed(subpath: &[PathSegment], vertices: &[(f64, f64)]) -> bool {
    if subpath.iter().any(|s| matches!(s, PathSegment::ClosePath)) {
        return true;
    }
    match vertices {
        [first, .., last] => same_point(*first, *last),
        _ => false,
    }
}

fn same_point(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() < AXIS_TOLERANCE && (a.1 - b.1).abs() < AXIS_TOLERANCE
}

/// `(min_x, min_y, max_x, max_y)` when consecutive corners differ along one axis only.
fn axis_aligned_box(corners: &[(f64, f64)]) -> Option<(f64, f64, f64, f64)> {
    let n = corners.len();
    for i in 0..n {
        let (a, b) = (corners[i], corners[(i + 1) % n]);
        let horizontal = (a.1 - b.1).abs() < AXIS_TOLERANCE;
        let vertical = (a.0 - b.0).abs() < AXIS_TOLERANCE;
        if horizontal == vertical {
            return None;
        }
    }
    let min_x = corners.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    Some((min_x, min_y, max_x, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigreport_core::Orientation;
    use rigreport_parse::PaintOp;

    fn path(segments: Vec<PathSegment>, paint_op: PaintOp) -> PathEvent {
        PathEvent {
            segments,
            paint_op,
            line_width: 1.0,
        }
    }

    fn make_char(text: &str, x0: f64, top: f64) -> Char {
        Char {
            text: text.to_string(),
            bbox: BBox::new(x0, top, x0 + 5.0, top + 10.0),
            fontname: "F1".to_string(),
            size: 10.0,
            upright: true,
        }
    }

    #[test]
    fn re_path_becomes_rect_with_flipped_y() {
        use PathSegment::*;
        let event = path(
            vec![MoveTo(10.0, 20.0), LineTo(110.0, 20.0), LineTo(110.0, 70.0), LineTo(10.0, 70.0), ClosePath],
            PaintOp::Stroke,
        );
        let (lines, rects) = shapes_from_path(&event, 100.0);
        assert!(lines.is_empty());
        assert_eq!(rects.len(), 1);
        let r = &rects[0];
        assert_eq!((r.x0, r.top, r.x1, r.bottom), (10.0, 30.0, 110.0, 80.0));
        assert!(r.stroke && !r.fill);
    }

    #[test]
    fn stroked_polyline_becomes_lines() {
        use PathSegment::*;
        let event = path(
            vec![MoveTo(0.0, 100.0), LineTo(50.0, 100.0), LineTo(50.0, 40.0)],
            PaintOp::Stroke,
        );
        let (lines, rects) = shapes_from_path(&event, 100.0);
        assert!(rects.is_empty());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].orientation, Orientation::Horizontal);
        assert_eq!((lines[0].top, lines[0].bottom), (0.0, 0.0));
        assert_eq!(lines[1].orientation, Orientation::Vertical);
        assert_eq!((lines[1].top, lines[1].bottom), (0.0, 60.0));
    }

    #[test]
    fn filled_polyline_has_no_lines() {
        use PathSegment::*;
        let event = path(vec![MoveTo(0.0, 0.0), LineTo(50.0, 0.0)], PaintOp::Fill);
        let (lines, rects) = shapes_from_path(&event, 100.0);
        assert!(lines.is_empty() && rects.is_empty());
    }

    #[test]
    fn curves_are_skipped() {
        use PathSegment::*;
        let event = path(
            vec![MoveTo(0.0, 0.0), CurveTo([(1.0, 1.0), (2.0, 2.0), (3.0, 0.0)]), LineTo(10.0, 0.0)],
            PaintOp::Stroke,
        );
        let (lines, rects) = shapes_from_path(&event, 100.0);
        assert!(lines.is_empty() && rects.is_empty());
    }

    #[test]
    fn skewed_quad_is_not_a_rect() {
        use PathSegment::*;
        let event = path(
            vec![MoveTo(0.0, 0.0), LineTo(10.0, 1.0), LineTo(10.0, 10.0), LineTo(0.0, 10.0), ClosePath],
            PaintOp::Stroke,
        );
        let (lines, rects) = shapes_from_path(&event, 100.0);
        assert!(rects.is_empty());
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn crop_clamps_to_page_and_clips() {
        let page = Page::with_geometry(
            0,
            200.0,
            100.0,
            vec![make_char("a", 10.0, 10.0), make_char("b", 150.0, 10.0)],
            vec![Line::from_points((0.0, 50.0), (200.0, 50.0), 1.0)],
            vec![],
        );
        let cropped = page.crop(BBox::new(-20.0, 0.0, 100.0, 400.0));
        assert_eq!(cropped.bbox(), BBox::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(cropped.chars().len(), 1);
        assert_eq!(cropped.lines()[0].x1, 100.0);
    }

    #[test]
    fn crop_outside_page_is_empty() {
        let page = Page::new(0, 200.0, 100.0, vec![make_char("a", 10.0, 10.0)]);
        let cropped = page.crop(BBox::new(300.0, 300.0, 400.0, 400.0));
        assert!(cropped.chars().is_empty());
    }
}
