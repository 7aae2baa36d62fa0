use serde::{Deserialize, Serialize};

/// A point in canvas space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation toward `other`
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// End of a branch leaving `start` with `heading` degrees and `length`.
///
/// Heading 0 points up (negative y), positive headings turn toward +x.
/// Non-finite inputs propagate.
pub fn endpoint(start: Point, heading: f64, length: f64) -> Point {
    let radians = heading.to_radians();
    Point::new(
        start.x + radians.sin() * length,
        start.y - radians.cos() * length,
    )
}
