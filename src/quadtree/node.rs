use super::region::{quadrant, Region};
use crate::Point;
use std::collections::HashMap;
use std::fmt;
use tracing::{trace, warn};

type Children = Box<[Node; 4]>;

#[derive(Debug, Clone)]
pub(crate) enum Cell {
    Leaf(Vec<u64>),
    /// Children in NW, NE, SW, SE order. The split point is the NW child's bottom right corner.
    Branch(Children),
}

/// A region of the plane, either holding its ids directly or split into four quadrants.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    region: Region,
    cell: Cell,
    /// Number of ids in this subtree
    count: usize,
    /// A leaf tries to split once it holds more ids than this
    split_at: usize,
}

impl Node {
    pub fn new(region: Region, node_limit: usize) -> Self {
        Self {
            region,
            cell: Cell::Leaf(Vec::with_capacity(node_limit)),
            count: 0,
            split_at: node_limit,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn len(&self) -> usize {
        self.count
    }

    /// Insert `id`, which `locations` must already map to `point`.
    pub fn insert(
        &mut self,
        id: u64,
        point: &Point,
        node_limit: usize,
        locations: &HashMap<u64, Point>,
    ) {
        self.count += 1;
        match &mut self.cell {
            Cell::Leaf(ids) => {
                ids.push(id);
                if ids.len() > self.split_at {
                    self.split(node_limit, locations);
                }
            }
            Cell::Branch(children) => {
                let split = children[0].region.bottom_right;
                children[quadrant(point, &split)].insert(id, point, node_limit, locations);
            }
        }
    }

    /// Remove `id` previously inserted at `point`.
    /// On return this node is in its merged form if its count dropped far enough.
    pub fn remove(&mut self, id: u64, point: &Point, node_limit: usize) {
        match &mut self.cell {
            Cell::Leaf(ids) => {
                let pos = ids.iter().position(|i| *i == id);
                debug_assert!(pos.is_some(), "{} is not filed under {:?}", id, self.region);
                match pos {
                    Some(pos) => {
                        ids.swap_remove(pos);
                    }
                    None => {
                        warn!("{} is not filed under {:?}", id, self.region);
                        return;
                    }
                }
                self.split_at = self.split_at.min((ids.len() * 2).max(node_limit));
            }
            Cell::Branch(children) => {
                let split = children[0].region.bottom_right;
                children[quadrant(point, &split)].remove(id, point, node_limit);
            }
        }
        self.count -= 1;

        // merge two below the limit, so an id moving back and forth across a split line does
        // not make the node split and merge on every move
        if self.count + 1 < node_limit && self.is_branch() {
            self.merge(node_limit);
        }
    }

    /// Append the ids within `query` to `out`.
    pub fn find(&self, query: &Region, locations: &HashMap<u64, Point>, out: &mut Vec<u64>) {
        match &self.cell {
            Cell::Leaf(ids) => {
                out.extend(ids.iter().copied().filter(|id| {
                    locations
                        .get(id)
                        .map_or(false, |point| query.contains(point))
                }));
            }
            Cell::Branch(children) => {
                for child in children.iter() {
                    if query.overlaps(&child.region) {
                        child.find(query, locations, out);
                    }
                }
            }
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.cell, Cell::Branch(_))
    }

    fn split(&mut self, node_limit: usize, locations: &HashMap<u64, Point>) {
        let ids = match &mut self.cell {
            Cell::Leaf(ids) => ids,
            Cell::Branch(_) => return,
        };
        let median = median_location(ids, locations);
        let routed = ids
            .iter()
            .filter_map(|id| locations.get(id).map(|point| (*id, quadrant(point, &median))))
            .collect::<Vec<_>>();
        if routed.windows(2).all(|w| w[0].1 == w[1].1) {
            // a single child would cover the same points as this leaf, retry once it doubles
            self.split_at = ids.len() * 2;
            trace!(
                "Not splitting {:?}: {} ids around {} share a quadrant",
                self.region,
                ids.len(),
                median
            );
            return;
        }
        ids.clear();
        trace!(
            "Splitting {:?} at {} with {} ids",
            self.region,
            median,
            routed.len()
        );

        let [nw, ne, sw, se] = self.region.quadrants(median);
        let mut children = Box::new([
            Node::new(nw, node_limit),
            Node::new(ne, node_limit),
            Node::new(sw, node_limit),
            Node::new(se, node_limit),
        ]);
        for (id, q) in routed {
            let child = &mut children[q];
            child.count += 1;
            if let Cell::Leaf(ids) = &mut child.cell {
                ids.push(id);
            }
        }
        for child in children.iter_mut() {
            child.split_at = child.split_at.max(child.count);
        }
        self.cell = Cell::Branch(children);
    }

    fn merge(&mut self, node_limit: usize) {
        let mut ids = Vec::with_capacity(node_limit.max(self.count));
        self.drain_into(&mut ids);
        debug_assert_eq!(ids.len(), self.count);
        trace!("Merging {:?} with {} ids", self.region, ids.len());
        self.cell = Cell::Leaf(ids);
        self.split_at = node_limit;
    }

    fn drain_into(&mut self, out: &mut Vec<u64>) {
        match &mut self.cell {
            Cell::Leaf(ids) => out.append(ids),
            Cell::Branch(children) => {
                for child in children.iter_mut() {
                    child.drain_into(out);
                }
            }
        }
    }

    /// Write an indented listing of this subtree.
    pub fn write_tree(
        &self,
        f: &mut fmt::Formatter<'_>,
        depth: usize,
        locations: &HashMap<u64, Point>,
    ) -> fmt::Result {
        let indent = depth * 2;
        writeln!(
            f,
            "{:indent$}+-{} - {} ({})",
            "",
            self.region.top_left,
            self.region.bottom_right,
            self.count,
            indent = indent
        )?;
        match &self.cell {
            Cell::Leaf(ids) => {
                for id in ids {
                    match locations.get(id) {
                        Some(point) => {
                            writeln!(f, "{:indent$}  +-{}: {}", "", id, point, indent = indent)?
                        }
                        None => writeln!(f, "{:indent$}  +-{}: ?", "", id, indent = indent)?,
                    }
                }
            }
            Cell::Branch(children) => {
                for child in children.iter() {
                    child.write_tree(f, depth + 1, locations)?;
                }
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        match &self.cell {
            Cell::Leaf(_) => 0,
            Cell::Branch(children) => 1 + children.iter().map(Node::depth).max().unwrap_or(0),
        }
    }

    #[cfg(test)]
    pub fn largest_leaf(&self) -> usize {
        match &self.cell {
            Cell::Leaf(ids) => ids.len(),
            Cell::Branch(children) => children.iter().map(Node::largest_leaf).max().unwrap_or(0),
        }
    }

    /// Check the structural invariants of this subtree and return the ids filed in it.
    #[cfg(test)]
    pub fn validate(&self, node_limit: usize, locations: &HashMap<u64, Point>) -> Vec<u64> {
        match &self.cell {
            Cell::Leaf(ids) => {
                assert!(self.split_at >= node_limit);
                assert!(
                    ids.len() <= self.split_at.max(node_limit + 1),
                    "leaf {:?} holds {} ids, splits past {}",
                    self.region,
                    ids.len(),
                    self.split_at
                );
                assert_eq!(ids.len(), self.count, "leaf {:?} count", self.region);
                for id in ids {
                    let point = locations.get(id).expect("filed id to have a location");
                    assert!(
                        self.region.contains(point),
                        "{} at {} is outside {:?}",
                        id,
                        point,
                        self.region
                    );
                }
                ids.clone()
            }
            Cell::Branch(children) => {
                assert!(
                    self.count + 1 >= node_limit,
                    "branch {:?} holds only {} ids",
                    self.region,
                    self.count
                );
                let split = children[0].region.bottom_right;
                let expected = self.region.quadrants(split);
                let mut ids = Vec::with_capacity(self.count);
                for (child, region) in children.iter().zip(expected.iter()) {
                    assert_eq!(&child.region, region);
                    ids.extend(child.validate(node_limit, locations));
                }
                assert_eq!(ids.len(), self.count, "branch {:?} count", self.region);
                ids
            }
        }
    }
}

/// Per axis median of the locations of `ids`.
/// Even counts take the mean of the two middle values.
fn median_location(ids: &[u64], locations: &HashMap<u64, Point>) -> Point {
    let mut xs = Vec::with_capacity(ids.len());
    let mut ys = Vec::with_capacity(ids.len());
    for point in ids.iter().filter_map(|id| locations.get(id)) {
        xs.push(point[0]);
        ys.push(point[1]);
    }
    Point::new(median(&mut xs), median(&mut ys))
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
