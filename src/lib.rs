//! # Warren
//!
//! Procedural room-and-door level generation for a 2D action roguelike.
//!
//! ## Architecture Overview
//!
//! Warren builds connected, screen-sized rooms linked by doors and hands the
//! result to external entity factories. The core architecture revolves around
//! a few key concepts:
//!
//! - **Geometry**: axis-aligned segments, bounding boxes, and the cardinal
//!   direction enum used by wall and door placement
//! - **Level Builder**: graph construction over named rooms, random wall and
//!   door generation, gameplay role tagging (tutorial, miniboss, final boss,
//!   difficulty bands)
//! - **Registry**: a dense arena-of-arrays component store addressed by plain
//!   integer entity handles
//! - **Spawning**: pure-predicate spawn validation against the entities
//!   already placed in the world
//!
//! Rendering, physics, input, audio, and per-species AI are external
//! collaborators and are not modeled here.

pub mod game;
pub mod geometry;
pub mod level;
pub mod registry;
pub mod spawning;

// Core module re-exports
pub use game::*;
pub use geometry::*;
pub use level::*;
pub use registry::*;
pub use spawning::*;

/// Core error type for the Warren level generator.
#[derive(thiserror::Error, Debug)]
pub enum WarrenError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A room id was used that the level does not contain
    #[error("Unknown room: {0}")]
    UnknownRoom(String),

    /// Level generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Warren codebase.
pub type WarrenResult<T> = Result<T, WarrenError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Level layout constants.
pub mod config {
    /// Logical width of every room, in building units
    pub const MAX_X_UNITS: u32 = 20;

    /// Logical height of every room, in building units
    pub const MAX_Y_UNITS: u32 = 10;

    /// Horizontal divisions of the window; one unit of margin on each side
    /// of the 20-unit room
    pub const X_DIVISIONS: f32 = 22.0;

    /// Vertical divisions of the window; one unit of margin above and below
    /// the 10-unit room
    pub const Y_DIVISIONS: f32 = 12.0;

    /// Minimum distance from an active door at which entities may spawn
    pub const DOOR_SPAWN_RADIUS: f32 = 100.0;
}
