//=========================================================================
// Axis-Aligned Bounding Box
//=========================================================================
//
// Integer bounding boxes used for gameplay collision.
//
// Corners are normalised on construction and only ever grow through
// `expand()`. Fields are public; writing them directly bypasses the
// `x0 <= x1`, `y0 <= y1` ordering and is the caller's responsibility.
//
//=========================================================================

//=== Aabb ================================================================

/// Axis-aligned bounding box with inclusive integer corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Aabb {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Aabb {
    //--- Construction -----------------------------------------------------

    /// Creates a box from two corners in any order.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Degenerate box covering a single point.
    pub fn from_point(x: i32, y: i32) -> Self {
        Self { x0: x, y0: y, x1: x, y1: y }
    }

    /// Box covering a rectangle at `(x, y)` with extent `w`×`h`.
    pub fn from_rect(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    //--- Growth -----------------------------------------------------------

    /// Widens the box so it contains `(x, y)`. Never shrinks.
    pub fn expand(&mut self, x: i32, y: i32) {
        if x < self.x0 {
            self.x0 = x;
        }
        if x > self.x1 {
            self.x1 = x;
        }
        if y < self.y0 {
            self.y0 = y;
        }
        if y > self.y1 {
            self.y1 = y;
        }
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        out.expand(other.x0, other.y0);
        out.expand(other.x1, other.y1);
        out
    }

    //--- Queries ----------------------------------------------------------

    /// Returns `true` if the two boxes overlap on both axes.
    ///
    /// Boxes that only share an edge (`a.x1 == b.x0`) do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x0 < other.x1
            && other.x0 < self.x1
            && self.y0 < other.y1
            && other.y0 < self.y1
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Construction -----------------------------------------------------

    #[test]
    fn new_normalises_corners() {
        let b = Aabb::new(10, 20, 0, 5);
        assert_eq!(b, Aabb { x0: 0, y0: 5, x1: 10, y1: 20 });
    }

    #[test]
    fn from_rect_spans_extent() {
        let b = Aabb::from_rect(5, 5, 10, 20);
        assert_eq!((b.x0, b.y0, b.x1, b.y1), (5, 5, 15, 25));
        assert_eq!(b.width(), 10);
        assert_eq!(b.height(), 20);
    }

    //--- Expansion --------------------------------------------------------

    #[test]
    fn expand_grows_to_include_point() {
        let mut b = Aabb::from_point(0, 0);
        b.expand(10, -5);
        b.expand(-3, 7);
        assert_eq!(b, Aabb { x0: -3, y0: -5, x1: 10, y1: 7 });
    }

    #[test]
    fn expand_inside_is_noop() {
        let mut b = Aabb::new(0, 0, 10, 10);
        b.expand(5, 5);
        assert_eq!(b, Aabb::new(0, 0, 10, 10));
    }

    #[test]
    fn union_covers_both() {
        let a = Aabb::new(0, 0, 5, 5);
        let b = Aabb::new(10, -2, 12, 3);
        assert_eq!(a.union(&b), Aabb::new(0, -2, 12, 5));
    }

    //--- Overlap ----------------------------------------------------------

    #[test]
    fn shared_edge_is_not_a_collision() {
        let a = Aabb::new(0, 0, 10, 10);
        let b = Aabb::new(10, 0, 20, 10);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn shared_horizontal_edge_is_not_a_collision() {
        let a = Aabb::new(0, 0, 10, 10);
        let b = Aabb::new(0, 10, 10, 20);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn identical_boxes_overlap() {
        let a = Aabb::new(0, 0, 10, 10);
        assert!(a.overlaps(&a));
    }

    #[test]
    fn contained_box_overlaps() {
        let outer = Aabb::new(0, 0, 100, 100);
        let inner = Aabb::new(40, 40, 60, 60);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn overlap_requires_both_axes() {
        let a = Aabb::new(0, 0, 10, 10);
        let b = Aabb::new(5, 20, 15, 30);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn overlap_is_symmetric() {
        let boxes = [
            Aabb::new(0, 0, 10, 10),
            Aabb::new(10, 0, 20, 10),
            Aabb::new(5, 5, 15, 15),
            Aabb::new(-5, -5, 0, 0),
            Aabb::new(3, -10, 4, 30),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{:?} vs {:?}", a, b);
            }
        }
    }
}
