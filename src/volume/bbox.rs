//! Axis-aligned bounding box in physical units

use std::fmt;

/// Physical extent of a volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox3 {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

impl BoundingBox3 {
    /// Create a new bounding box
    pub fn new(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        BoundingBox3 {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Box anchored at the origin with the given size
    pub fn from_extent(size_x: f64, size_y: f64, size_z: f64) -> Self {
        Self::new(0.0, 0.0, 0.0, size_x, size_y, size_z)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }
}

impl fmt::Display for BoundingBox3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}] - [{}, {}, {}]",
               self.min_x, self.min_y, self.min_z, self.max_x, self.max_y, self.max_z)
    }
}
