//! # Door Connections
//!
//! Bidirectional links between rooms' doors, with the gameplay tags the
//! traversal layer reads at a transition.

use crate::geometry::Direction;
use crate::registry::Entity;
use serde::{Deserialize, Serialize};

/// A gameplay requirement attached to a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    /// No special requirement
    None,
    /// Opens when a pressure plate in the room is held down
    PressurePlate,
    /// Opens once the room's boss is defeated
    Boss,
}

/// One side of a logical door.
///
/// Two connections referencing each other form one door; the direction on
/// one side is always the opposite of the direction on the other. Stored in
/// the registry keyed by the owning door entity.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorConnection {
    /// Key of the room this door leads to
    pub room_id: String,
    /// The paired door entity inside the target room
    pub exit_door: Entity,
    /// Which wall of the owning room this door sits on
    pub direction: Direction,
    /// Traversal requirement, if any
    pub objective: Objective,
    /// Whether gameplay has claimed this door for an objective
    pub assigned: bool,
    /// Whether the door is currently locked
    pub locked: bool,
}

impl DoorConnection {
    /// Creates an unlocked, unassigned connection with no objective.
    pub fn new(room_id: String, exit_door: Entity, direction: Direction) -> Self {
        Self {
            room_id,
            exit_door,
            direction,
            objective: Objective::None,
            assigned: false,
            locked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_connection_defaults() {
        let conn = DoorConnection::new("3".to_string(), Entity(7), Direction::East);
        assert_eq!(conn.room_id, "3");
        assert_eq!(conn.exit_door, Entity(7));
        assert_eq!(conn.direction, Direction::East);
        assert_eq!(conn.objective, Objective::None);
        assert!(!conn.assigned);
        assert!(!conn.locked);
    }
}
