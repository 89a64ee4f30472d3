//! Image-space geometry shared by hit testing, rendering and serialization.

pub mod hit_testing;

use serde::{Deserialize, Serialize};

/// A vertex in image-pixel space.
///
/// Coordinates are integers because pointer input is rounded when a point is
/// created. Negative or out-of-surface values are representable so that
/// programmatically injected points survive unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Integer bounding box of a point list, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn width(&self) -> u32 {
        (self.max.x - self.min.x) as u32 + 1
    }

    pub fn height(&self) -> u32 {
        (self.max.y - self.min.y) as u32 + 1
    }
}

/// Calculate the bounding box for a set of points
pub fn calculate_bounds(points: &[Point]) -> Option<Bounds> {
    let first = *points.first()?;
    let mut bounds = Bounds { min: first, max: first };

    for point in &points[1..] {
        bounds.min.x = bounds.min.x.min(point.x);
        bounds.min.y = bounds.min.y.min(point.y);
        bounds.max.x = bounds.max.x.max(point.x);
        bounds.max.y = bounds.max.y.max(point.y);
    }

    Some(bounds)
}
