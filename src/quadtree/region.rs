use crate::Point;

/// One axis of a query or a node region.
///
/// `lo < hi` selects `[lo, hi)`. `lo >= hi` is wrapped and selects `[lo, dim) ∪ [0, hi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Span {
    pub lo: f64,
    pub hi: f64,
}

impl Span {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn is_wrapped(&self) -> bool {
        self.lo >= self.hi
    }

    pub fn contains(&self, v: f64) -> bool {
        if self.is_wrapped() {
            v >= self.lo || v < self.hi
        } else {
            self.lo <= v && v < self.hi
        }
    }

    /// Return whether the two spans might share a point.
    /// Never false for overlapping spans; callers filter false positives with `contains`.
    pub fn overlaps(&self, other: &Span) -> bool {
        match (self.is_wrapped(), other.is_wrapped()) {
            (false, false) => self.lo < other.hi && other.lo < self.hi,
            // both run across the seam
            (true, true) => true,
            (true, false) => !(self.lo >= other.hi && self.hi <= other.lo),
            (false, true) => other.overlaps(self),
        }
    }
}

/// Axis aligned rectangle given by its corners, each axis a [`Span`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Region {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Region {
    pub fn new(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    pub fn x(&self) -> Span {
        Span::new(self.top_left[0], self.bottom_right[0])
    }

    pub fn y(&self) -> Span {
        Span::new(self.top_left[1], self.bottom_right[1])
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.x().contains(point[0]) && self.y().contains(point[1])
    }

    pub fn overlaps(&self, other: &Region) -> bool {
        self.x().overlaps(&other.x()) && self.y().overlaps(&other.y())
    }

    /// Split into the quadrants cut by `at`, in NW, NE, SW, SE order.
    pub fn quadrants(&self, at: Point) -> [Region; 4] {
        let Region {
            top_left: tl,
            bottom_right: br,
        } = *self;
        [
            Region::new(tl, at),
            Region::new(Point::new(at[0], tl[1]), Point::new(br[0], at[1])),
            Region::new(Point::new(tl[0], at[1]), Point::new(at[0], br[1])),
            Region::new(at, br),
        ]
    }
}

/// Index of the quadrant around `split` that `point` belongs to, in NW, NE, SW, SE order.
/// The split lines belong to the east and south quadrants.
#[inline]
pub(crate) fn quadrant(point: &Point, split: &Point) -> usize {
    match (point[0] < split[0], point[1] < split[1]) {
        (true, true) => 0,
        (false, true) => 1,
        (true, false) => 2,
        (false, false) => 3,
    }
}
