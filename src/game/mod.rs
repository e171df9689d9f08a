//! # Game Module
//!
//! The per-session context threaded through gameplay systems.

use crate::registry::Entity;

/// Handles to the singleton gameplay entities of one session.
///
/// Passed by reference into every system instead of living as free
/// globals, so tests can build a session from scratch.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext {
    /// The player entity
    pub player: Entity,
    /// The currently equipped weapon entity
    pub weapon: Entity,
    /// The active projectile entity, if one is in flight
    pub projectile: Entity,
    /// Window width in pixels, for unit conversion
    pub window_width_px: f32,
    /// Window height in pixels, for unit conversion
    pub window_height_px: f32,
}

impl SessionContext {
    /// Creates a session with no entities assigned yet.
    pub fn new(window_width_px: f32, window_height_px: f32) -> Self {
        Self {
            player: Entity::INVALID,
            weapon: Entity::INVALID,
            projectile: Entity::INVALID,
            window_width_px,
            window_height_px,
        }
    }

    /// The unit grid for this session's window.
    pub fn grid(&self) -> crate::level::UnitGrid {
        crate::level::UnitGrid::new(self.window_width_px, self.window_height_px)
    }
}
