/// Bounding box with top-left origin coordinate system.
///
/// Coordinates follow the page convention used throughout the crate:
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Build a crop box from catalog coordinates stored as `(top, left, bottom, right)`.
    ///
    /// The catalog keeps the row axis first, so the values are transposed into
    /// `(x0, top, x1, bottom)` = `(coords[1], coords[0], coords[3], coords[2])`.
    pub fn from_catalog(coords: [f64; 4]) -> Self {
        Self::new(coords[1], coords[0], coords[3], coords[2])
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Overlap of two boxes, or `None` when they do not touch.
    ///
    /// Boxes that only share a border still intersect (a zero-width line lying on
    /// a crop boundary is kept).
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        let x0 = self.x0.max(other.x0);
        let top = self.top.max(other.top);
        let x1 = self.x1.min(other.x1);
        let bottom = self.bottom.min(other.bottom);
        if x0 <= x1 && top <= bottom {
            Some(BBox::new(x0, top, x1, bottom))
        } else {
            None
        }
    }

    /// Center point `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Whether the point lies inside the box, borders included.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.top && y <= self.bottom
    }
}

/// Orientation of a line segment or edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
    Diagonal,
}

impl Orientation {
    /// Classify a segment from its extents.
    pub fn of(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        if (top - bottom).abs() < 1e-9 {
            Orientation::Horizontal
        } else if (x0 - x1).abs() < 1e-9 {
            Orientation::Vertical
        } else {
            Orientation::Diagonal
        }
    }
}

/// Affine transformation matrix `[a b c d e f]` in PDF row-vector convention.
///
/// A point maps as `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ctm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Ctm {
    fn default() -> Self {
        Self::identity()
    }
}

impl Ctm {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn from_array(m: [f64; 6]) -> Self {
        Self::new(m[0], m[1], m[2], m[3], m[4], m[5])
    }

    pub fn to_array(self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn concat(&self, other: &Ctm) -> Ctm {
        Ctm {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Inverse matrix, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Ctm> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Ctm {
            a,
            b,
            c,
            d,
            e: -(self.e * a + self.f * c),
            f: -(self.e * b + self.f * d),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BBox::new(10.0, 20.0, 50.0, 60.0);
        assert_eq!(bbox.width(), 40.0);
        assert_eq!(bbox.height(), 40.0);
    }

    #[test]
    fn test_bbox_union() {
        let a = BBox::new(10.0, 20.0, 30.0, 40.0);
        let b = BBox::new(5.0, 25.0, 35.0, 45.0);
        let u = a.union(&b);
        assert_eq!(u, BBox::new(5.0, 20.0, 35.0, 45.0));
    }

    #[test]
    fn catalog_coordinates_are_transposed() {
        // stored as (top, left, bottom, right)
        let bbox = BBox::from_catalog([100.0, 20.0, 180.0, 400.0]);
        assert_eq!(bbox, BBox::new(20.0, 100.0, 400.0, 180.0));
    }

    #[test]
    fn intersection_overlapping() {
        let a = BBox::new(0.0, 0.0, 100.0, 100.0);
        let b = BBox::new(50.0, 60.0, 150.0, 160.0);
        assert_eq!(a.intersection(&b), Some(BBox::new(50.0, 60.0, 100.0, 100.0)));
    }

    #[test]
    fn intersection_touching_border_is_kept() {
        let a = BBox::new(0.0, 0.0, 100.0, 100.0);
        let line = BBox::new(100.0, 10.0, 100.0, 90.0);
        assert_eq!(a.intersection(&line), Some(line));
    }

    #[test]
    fn intersection_disjoint() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn orientation_classification() {
        assert_eq!(Orientation::of(0.0, 5.0, 10.0, 5.0), Orientation::Horizontal);
        assert_eq!(Orientation::of(3.0, 0.0, 3.0, 10.0), Orientation::Vertical);
        assert_eq!(Orientation::of(0.0, 0.0, 10.0, 10.0), Orientation::Diagonal);
    }

    #[test]
    fn ctm_concat_applies_left_first() {
        let scale = Ctm::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Ctm::translation(10.0, 5.0);
        assert_eq!(scale.concat(&shift).transform(1.0, 1.0), (12.0, 7.0));
        assert_eq!(shift.concat(&scale).transform(1.0, 1.0), (22.0, 12.0));
    }

    #[test]
    fn ctm_inverse_round_trips() {
        let m = Ctm::new(0.0, 1.0, -1.0, 0.0, 30.0, 40.0);
        let inv = m.inverse().unwrap();
        let (x, y) = m.transform(3.0, 4.0);
        let (bx, by) = inv.transform(x, y);
        assert!((bx - 3.0).abs() < 1e-9 && (by - 4.0).abs() < 1e-9);
        assert_eq!(Ctm::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0).inverse(), None);
    }
}
