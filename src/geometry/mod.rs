//! # Geometry Module
//!
//! Geometric primitives shared by level construction and spawn validation.
//!
//! Everything here is axis-aligned by construction: room walls run strictly
//! north-south or east-west, and the point-in-room test in the level module
//! relies on that invariant.

use serde::{Deserialize, Serialize};

/// A 2D point or extent in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Creates a new point with the given coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the origin (0, 0).
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The four cardinal directions used for wall and door placement.
///
/// # Examples
///
/// ```
/// use warren::Direction;
///
/// assert_eq!(Direction::North.opposite(), Direction::South);
/// assert_eq!(Direction::West.opposite().opposite(), Direction::West);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four directions, in fixed scan order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the opposite cardinal direction.
    ///
    /// This is an involution: `d.opposite().opposite() == d`.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// A directed, axis-aligned line segment.
///
/// Segments represent one wall or boundary edge of a room. Either both
/// endpoints share an x coordinate (vertical) or both share a y coordinate
/// (horizontal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    /// Creates a segment from two endpoints.
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Creates a horizontal segment at height `y` running from `x0` to `x1`.
    pub fn horizontal(x0: f32, x1: f32, y: f32) -> Self {
        Self::new(Vec2::new(x0, y), Vec2::new(x1, y))
    }

    /// Creates a vertical segment at `x` running from `y0` to `y1`.
    pub fn vertical(x: f32, y0: f32, y1: f32) -> Self {
        Self::new(Vec2::new(x, y0), Vec2::new(x, y1))
    }

    /// True if both endpoints share a y coordinate.
    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    /// True if both endpoints share an x coordinate.
    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    /// Midpoint of the segment.
    pub fn midpoint(&self) -> Vec2 {
        Vec2::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Length of the segment.
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// An axis-aligned bounding box, grown by unioning in points and segments.
///
/// A fresh box is inverted (+INF minimums, -INF maximums) so that the first
/// union establishes the real extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl BoundingBox {
    /// Creates an empty (inverted) bounding box.
    pub fn new() -> Self {
        Self {
            min_x: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            min_y: f32::INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    /// True if nothing has been unioned in yet.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Widens the box to include a point. Never narrows.
    pub fn include_point(&mut self, point: Vec2) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_y = self.max_y.max(point.y);
    }

    /// Widens the box to include both endpoints of a segment.
    pub fn include_segment(&mut self, segment: &Segment) {
        self.include_point(segment.start);
        self.include_point(segment.end);
    }

    /// Center of the box. Only meaningful once non-empty.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// True if a point lies inside or on the edge of the box.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}
