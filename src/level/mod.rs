//! # Level Module
//!
//! Room geometry, door connections, and the level graph builder.
//!
//! Every room spans the same logical 20x10-unit rectangle; moving through a
//! door is a room transition, not physical tiling. Design-time unit
//! coordinates are converted to pixels through the current window size, with
//! one unit of margin on every side of the room.

pub mod builder;
pub mod door;
pub mod space;

pub use builder::*;
pub use door::*;
pub use space::*;

use crate::config::{X_DIVISIONS, Y_DIVISIONS};
use crate::geometry::Vec2;
use serde::{Deserialize, Serialize};

/// Conversion from room-building units to pixel coordinates.
///
/// # Examples
///
/// ```
/// use warren::UnitGrid;
///
/// let grid = UnitGrid::new(2200.0, 1200.0);
/// assert_eq!(grid.x(1.0), 100.0);
/// assert_eq!(grid.y(1.0), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitGrid {
    /// One room-building unit in the x direction, in pixels
    pub x_1u: f32,
    /// One room-building unit in the y direction, in pixels
    pub y_1u: f32,
}

impl UnitGrid {
    /// Derives the unit grid from the window dimensions in pixels.
    pub fn new(window_width_px: f32, window_height_px: f32) -> Self {
        Self {
            x_1u: window_width_px / X_DIVISIONS,
            y_1u: window_height_px / Y_DIVISIONS,
        }
    }

    /// Converts horizontal units to pixels.
    pub fn x(&self, units: f32) -> f32 {
        units * self.x_1u
    }

    /// Converts vertical units to pixels.
    pub fn y(&self, units: f32) -> f32 {
        units * self.y_1u
    }

    /// Converts a unit-space point to pixels.
    pub fn point(&self, x_units: f32, y_units: f32) -> Vec2 {
        Vec2::new(self.x(x_units), self.y(y_units))
    }
}

/// Configuration for level generation.
///
/// Controls room counts per difficulty band, door sizing, layout retries,
/// and the sampling cap for random in-room positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Number of rooms in each ascending difficulty band; the first room of
    /// the first band is the tutorial, the last room overall the final boss
    pub rooms_per_band: Vec<u32>,
    /// Minimum door gap width, in units
    pub min_door_units: u32,
    /// Maximum door gap width, in units
    pub max_door_units: u32,
    /// Probability of an extra door between rooms that happen to be
    /// neighbors on the layout lattice (0.0 to 1.0)
    pub extra_connection_chance: f64,
    /// Attempts at a random room layout before falling back to a corridor
    pub max_layout_attempts: u32,
    /// Rejection-sampling attempts before falling back to the room center
    pub max_sample_attempts: u32,
    /// Window width in pixels, for unit conversion
    pub window_width_px: f32,
    /// Window height in pixels, for unit conversion
    pub window_height_px: f32,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert!(config.min_door_units <= config.max_door_units);
    /// assert!(!config.rooms_per_band.is_empty());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rooms_per_band: vec![1, 5, 5, 5],
            min_door_units: 2,
            max_door_units: 3,
            extra_connection_chance: 0.15,
            max_layout_attempts: 32,
            max_sample_attempts: 1000,
            window_width_px: 1280.0,
            window_height_px: 720.0,
        }
    }

    /// Creates a configuration for testing with a smaller level.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            rooms_per_band: vec![1, 2, 2],
            min_door_units: 2,
            max_door_units: 2,
            extra_connection_chance: 0.0,
            max_layout_attempts: 16,
            max_sample_attempts: 1000,
            window_width_px: 2200.0,
            window_height_px: 1200.0,
        }
    }

    /// Total number of rooms across all bands.
    pub fn total_rooms(&self) -> u32 {
        self.rooms_per_band.iter().sum()
    }

    /// The unit grid implied by the configured window size.
    pub fn grid(&self) -> UnitGrid {
        UnitGrid::new(self.window_width_px, self.window_height_px)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Gameplay role assigned to a room during generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomRole {
    /// The starting room; every other room must be reachable from it
    Tutorial,
    /// An ordinary combat or exploration room
    Normal,
    /// The capstone room of an interior difficulty band
    Miniboss,
    /// The last room of the level
    FinalBoss,
}
