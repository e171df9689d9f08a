//! # Space and Room Geometry
//!
//! The geometric payload of a room: its closed boundary, the wall and door
//! entities punched into that boundary, and the spatial queries spawners use
//! to place entities inside it.

use crate::geometry::{BoundingBox, Segment, Vec2};
use crate::level::RoomRole;
use crate::registry::Entity;
use log::warn;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashMap;

/// The geometry owned by one room.
///
/// `boundaries` is the closed rectilinear outline used for containment
/// tests; `walls` and `doors` are the solid wall runs and door gaps emitted
/// along that outline, referenced by entity handle.
#[derive(Debug, Clone, Default)]
pub struct Space {
    /// Closed outline of the room; axis-aligned segments only
    pub boundaries: Vec<Segment>,
    /// Solid wall entities along the outline
    pub walls: Vec<Entity>,
    /// Door entities along the outline
    pub doors: Vec<Entity>,
}

/// Builds and owns the geometry and gameplay metadata of a single room.
///
/// Rooms are identified by a caller-chosen string key held in the level
/// builder; a room is never destroyed during a level's lifetime.
#[derive(Debug, Clone)]
pub struct RoomBuilder {
    /// Geometry of the room
    pub space: Space,
    /// Axis-aligned extent of the boundary
    pub bounding_box: BoundingBox,
    /// Gameplay role assigned during generation
    pub role: RoomRole,
    /// Ascending difficulty band index
    pub difficulty: u32,
    /// Whether the player has entered this room
    pub visited: bool,
    /// Door entities by caller-chosen key
    doors_by_key: HashMap<String, Entity>,
}

impl RoomBuilder {
    /// Creates an empty room with no geometry.
    pub fn new() -> Self {
        Self {
            space: Space::default(),
            bounding_box: BoundingBox::new(),
            role: RoomRole::Normal,
            difficulty: 0,
            visited: false,
            doors_by_key: HashMap::new(),
        }
    }

    /// Adds a boundary segment and widens the bounding box around it.
    pub fn add_boundary(&mut self, segment: Segment) -> &mut Self {
        if !segment.is_horizontal() && !segment.is_vertical() {
            warn!("skipping non-axis-aligned boundary {:?}", segment);
            return self;
        }
        self.bounding_box.include_segment(&segment);
        self.space.boundaries.push(segment);
        self
    }

    /// Registers a solid wall entity belonging to this room.
    pub fn add_wall(&mut self, wall: Entity) -> &mut Self {
        self.space.walls.push(wall);
        self
    }

    /// Registers a door entity under a key unique within this room.
    pub fn add_door(&mut self, key: impl Into<String>, door: Entity) -> &mut Self {
        self.space.doors.push(door);
        self.doors_by_key.insert(key.into(), door);
        self
    }

    /// Looks up a door entity by its key.
    pub fn door(&self, key: &str) -> Option<Entity> {
        self.doors_by_key.get(key).copied()
    }

    /// All door keys registered in this room.
    pub fn door_keys(&self) -> impl Iterator<Item = &str> {
        self.doors_by_key.keys().map(String::as_str)
    }

    /// Center of the room's bounding box.
    pub fn center(&self) -> Vec2 {
        self.bounding_box.center()
    }

    /// Tests whether a point lies strictly inside the room.
    ///
    /// The boundary is a closed axis-aligned rectilinear polygon, so a point
    /// is interior iff some boundary segment crosses it in each of the four
    /// cardinal directions: a horizontal segment strictly above and another
    /// strictly below whose x-range contains the point, and a vertical
    /// segment strictly left and another strictly right whose y-range
    /// contains it. The range tests include segment endpoints, so interior
    /// points aligned with an internal corner still classify as inside; the
    /// strict above/below/left/right comparisons keep boundary-coincident
    /// points outside.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::{RoomBuilder, Segment, Vec2};
    ///
    /// let mut room = RoomBuilder::new();
    /// room.add_boundary(Segment::horizontal(0.0, 100.0, 0.0))
    ///     .add_boundary(Segment::horizontal(0.0, 100.0, 50.0))
    ///     .add_boundary(Segment::vertical(0.0, 0.0, 50.0))
    ///     .add_boundary(Segment::vertical(100.0, 0.0, 50.0));
    ///
    /// assert!(room.is_in_room(Vec2::new(50.0, 25.0)));
    /// assert!(!room.is_in_room(Vec2::new(150.0, 25.0)));
    /// ```
    pub fn is_in_room(&self, point: Vec2) -> bool {
        let mut above = false;
        let mut below = false;
        let mut left = false;
        let mut right = false;

        for segment in &self.space.boundaries {
            if above && below && left && right {
                break;
            }
            if segment.is_horizontal() {
                let x0 = segment.start.x.min(segment.end.x);
                let x1 = segment.start.x.max(segment.end.x);
                if point.x >= x0 && point.x <= x1 {
                    if !above && segment.start.y < point.y {
                        above = true;
                    } else if !below && segment.start.y > point.y {
                        below = true;
                    }
                }
            } else {
                let y0 = segment.start.y.min(segment.end.y);
                let y1 = segment.start.y.max(segment.end.y);
                if point.y >= y0 && point.y <= y1 {
                    if !left && segment.start.x < point.x {
                        left = true;
                    } else if !right && segment.start.x > point.x {
                        right = true;
                    }
                }
            }
        }

        above && below && left && right
    }

    /// Draws a uniformly random point inside the room.
    ///
    /// Rejection sampling over the bounding box: draw, test with
    /// [`is_in_room`](Self::is_in_room), retry. The expected number of draws
    /// is the box-to-room area ratio, so heavily concave rooms sample
    /// slowly; after `max_attempts` draws the bounding-box center is
    /// returned so the call always terminates.
    pub fn get_random_position(&self, rng: &mut StdRng, max_attempts: u32) -> Vec2 {
        if self.bounding_box.is_empty() {
            warn!("sampling a room with no boundary; returning origin");
            return Vec2::zero();
        }

        for _ in 0..max_attempts {
            let candidate = Vec2::new(
                rng.gen_range(self.bounding_box.min_x..=self.bounding_box.max_x),
                rng.gen_range(self.bounding_box.min_y..=self.bounding_box.max_y),
            );
            if self.is_in_room(candidate) {
                return candidate;
            }
        }

        warn!(
            "rejection sampling exhausted {} attempts; falling back to room center",
            max_attempts
        );
        self.center()
    }
}

impl Default for RoomBuilder {
    fn default() -> Self {
        Self::new()
    }
}
