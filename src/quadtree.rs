mod node;
mod region;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::Point;
use node::Node;
use region::Region;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Smallest accepted `node_limit`.
pub const MIN_NODE_LIMIT: usize = 4;

/// Maps ids to points on a `width` x `height` torus and answers rectangle queries that may
/// wrap around either edge.
///
/// The id to point map is the source of truth, the tree is an index over it. Leaves split
/// at the per axis median of their points once they hold more than `node_limit` ids and
/// merge back once their subtree holds fewer than `node_limit - 1`.
#[derive(Debug, Clone)]
pub struct ToroidalQuadtree {
    node_limit: usize,
    locations: HashMap<u64, Point>,
    root: Node,
}

impl ToroidalQuadtree {
    /// Fails if `node_limit` is less than [`MIN_NODE_LIMIT`] or if either dimension is not a
    /// positive finite number.
    pub fn new(node_limit: usize, width: f64, height: f64) -> Result<Self> {
        if node_limit < MIN_NODE_LIMIT {
            return Err(Error::InvalidConfiguration(format!(
                "node limit {} must be at least {}",
                node_limit, MIN_NODE_LIMIT
            )));
        }
        for &(name, extent) in &[("width", width), ("height", height)] {
            if !(extent.is_finite() && extent > 0.0) {
                return Err(Error::InvalidConfiguration(format!(
                    "{} {} must be positive and finite",
                    name, extent
                )));
            }
        }
        debug!(
            "Creating {}x{} quadtree with node limit {}",
            width, height, node_limit
        );
        let bounds = Region::new(Point::new(0.0, 0.0), Point::new(width, height));
        Ok(Self {
            node_limit,
            locations: HashMap::new(),
            root: Node::new(bounds, node_limit),
        })
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        Self::new(config.node_limit, config.width, config.height)
    }

    pub fn width(&self) -> f64 {
        self.root.region().bottom_right[0]
    }

    pub fn height(&self) -> f64 {
        self.root.region().bottom_right[1]
    }

    pub fn node_limit(&self) -> usize {
        self.node_limit
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.root.len(), self.locations.len());
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.locations.contains_key(&id)
    }

    /// Unordered iterator over every id and its point.
    pub fn iter(&self) -> impl Iterator<Item = (u64, Point)> + '_ {
        self.locations.iter().map(|(id, p)| (*id, *p))
    }

    pub fn clear(&mut self) {
        debug!("Clearing quadtree with {} ids", self.locations.len());
        let bounds = *self.root.region();
        self.locations.clear();
        self.root = Node::new(bounds, self.node_limit);
    }

    /// Return whether `point` can be stored, i.e. it lies in `[0, width) x [0, height)`.
    pub fn intersects(&self, point: &Point) -> bool {
        let [x, y] = point.0;
        0.0 <= x && x < self.width() && 0.0 <= y && y < self.height()
    }

    /// Set the location of `id`, moving it if it is already present.
    ///
    /// Returns `false` and leaves the tree untouched if `point` is out of bounds.
    pub fn put(&mut self, id: u64, point: Point) -> bool {
        if !self.intersects(&point) {
            return false;
        }
        self.remove(id);

        self.locations.insert(id, point);
        self.root.insert(id, &point, self.node_limit, &self.locations);
        true
    }

    /// Put every item, returning how many were accepted.
    pub fn extend<It>(&mut self, it: It) -> usize
    where
        It: IntoIterator<Item = (u64, Point)>,
    {
        let mut accepted = 0;
        for (id, point) in it {
            if self.put(id, point) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Returns `false` if `id` was not present.
    pub fn remove(&mut self, id: u64) -> bool {
        match self.locations.get(&id).copied() {
            Some(point) => {
                self.root.remove(id, &point, self.node_limit);
                self.locations.remove(&id);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: u64) -> Option<Point> {
        self.locations.get(&id).copied()
    }

    /// Ids within the region spanned by the two corners.
    ///
    /// Each axis is closed at `top_left` and open at `bottom_right`. An axis where
    /// `top_left >= bottom_right` wraps: it selects `[top_left, dim) ∪ [0, bottom_right)`.
    /// Both corners must lie within `[0, width] x [0, height]`, otherwise nothing is found.
    /// The order of the result is unspecified.
    pub fn find(&self, top_left: Point, bottom_right: Point) -> Vec<u64> {
        let mut out = Vec::new();
        self.find_into(top_left, bottom_right, &mut out);
        out
    }

    /// Same as [`find`](Self::find) but appends into `out`.
    pub fn find_into(&self, top_left: Point, bottom_right: Point, out: &mut Vec<u64>) {
        if !self.is_corner(&top_left) || !self.is_corner(&bottom_right) {
            return;
        }
        let query = Region::new(top_left, bottom_right);
        self.root.find(&query, &self.locations, out);
    }

    /// Append the ids within the axis aligned square of half side `radius` around `center`,
    /// wrapping across the edges of the plane.
    pub fn find_in_range(&self, center: &Point, radius: f64, out: &mut Vec<u64>) {
        if !(radius > 0.0) || !self.intersects(center) {
            return;
        }
        let r = Point::new(radius, radius);
        let (from, to) = (*center - r, *center + r);
        let mut top_left = Point::default();
        let mut bottom_right = Point::default();
        for (axis, &dim) in [self.width(), self.height()].iter().enumerate() {
            // the window covers the whole axis
            let (lo, hi) = if 2.0 * radius >= dim {
                (0.0, dim)
            } else {
                (from[axis].rem_euclid(dim), to[axis].rem_euclid(dim))
            };
            top_left.0[axis] = lo;
            bottom_right.0[axis] = hi;
        }
        self.find_into(top_left, bottom_right, out);
    }

    /// Human readable listing of the tree. The format is not stable.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    fn is_corner(&self, point: &Point) -> bool {
        let [x, y] = point.0;
        0.0 <= x && x <= self.width() && 0.0 <= y && y <= self.height()
    }
}

impl fmt::Display for ToroidalQuadtree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.write_tree(f, 0, &self.locations)
    }
}
