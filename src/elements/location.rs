use serde::Serialize;
use std::fmt;

/// Locations are stored as fixed point integers with seven decimal
/// places, so equality is exact and sorting is bit-stable.
pub const COORDINATE_PRECISION: f64 = 10_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Location {
        Location { x: x, y: y }
    }

    pub fn lon(&self) -> f64 {
        self.x as f64 / COORDINATE_PRECISION
    }

    pub fn lat(&self) -> f64 {
        self.y as f64 / COORDINATE_PRECISION
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.x, self.y)
    }
}
