//! Adaptive quadtree over a toroidal plane.
//! # Contracts:
//! - Stored points lie in `[0, width) x [0, height)`
//! - Query corners lie in `[0, width] x [0, height]`; a corner pair with
//!   `top_left >= bottom_right` on an axis wraps around that axis
//!
pub mod config;
pub mod error;
pub mod quadtree;

pub use config::Config;
pub use error::{Error, Result};
pub use quadtree::ToroidalQuadtree;

use std::fmt;
use std::ops::{Add, AddAssign, Deref, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point(pub [f64; 2]);

impl AddAssign for Point {
    fn add_assign(&mut self, p: Self) {
        self.0[0] += p.0[0];
        self.0[1] += p.0[1];
    }
}

impl Deref for Point {
    type Target = [f64; 2];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Add for Point {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self([self[0] - rhs[0], self[1] - rhs[1]])
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self[0], self[1])
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self([x, y])
    }

    pub fn x(&self) -> f64 {
        self[0]
    }

    pub fn y(&self) -> f64 {
        self[1]
    }
}
