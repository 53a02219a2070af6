//! Metro Rush - maze navigation & movement engine
//!
//! Core modules:
//! - `maze`: static path network (axis-aligned segments, junctions, anchors)
//! - `sim`: movement state machine, curved turns, collectibles, game clock
//! - `camera`: viewport framing from device profiles
//! - `sched`: cooperative single-threaded scheduler with cancellable tickets
//! - `config`: validated construction-time configuration
//!
//! The engine has no rendering responsibility: a host reads the
//! [`sim::FrameSnapshot`] each frame and draws it however it likes.

pub mod camera;
pub mod config;
pub mod maze;
pub mod sched;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use sim::GameSession;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Engine tuning constants
pub mod consts {
    /// Alignment/extent slack for path queries (pixels)
    pub const PATH_TOLERANCE: f32 = 12.0;
    /// Grid granularity for direction probes and turn radius (pixels)
    pub const GRID_SIZE: f32 = 12.0;
    /// Distance covered per movement step (pixels)
    pub const MOVE_SPEED: f32 = 0.5;
    /// Movement step period (seconds, ~60 Hz)
    pub const MOVE_INTERVAL: f64 = 0.016;

    /// Curved turn duration (seconds)
    pub const TURN_DURATION: f32 = 0.4;

    /// Collectible placement stride along segments (pixels)
    pub const COLLECTIBLE_STRIDE: f32 = 50.0;
    /// Maximum collectibles on the board
    pub const MAX_COLLECTIBLES: usize = 15;
    /// Collectibles guaranteed near the start position
    pub const NEARBY_COLLECTIBLES: usize = 6;
    /// Radius around the start that counts as "near" (pixels)
    pub const NEARBY_RADIUS: f32 = 100.0;
    /// Pickup radius (pixels)
    pub const COLLECTION_RADIUS: f32 = 10.0;
    /// Delay before a collected item reappears (seconds)
    pub const RESPAWN_DELAY: f64 = 6.0;
    /// Respawn candidates keep at least this distance from the player
    pub const RESPAWN_MIN_PLAYER_DIST: f32 = 100.0;
    /// Respawn candidates keep at least this distance from other items
    pub const RESPAWN_MIN_SPACING: f32 = 30.0;

    /// Round length (seconds)
    pub const ROUND_SECONDS: u32 = 60;
    /// Points awarded per collectible
    pub const POINTS_PER_COLLECTIBLE: u32 = 5;

    /// Viewport resize debounce (seconds)
    pub const RESIZE_DEBOUNCE: f64 = 0.25;
}

/// One of the four path-aligned movement directions. No diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step vector. Screen coordinates: +y is down.
    #[inline]
    pub fn delta(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Sprite heading in degrees for this travel direction.
    #[inline]
    pub fn heading(self) -> f32 {
        match self {
            Direction::Up => 180.0,
            Direction::Down => 0.0,
            Direction::Left => 90.0,
            Direction::Right => -90.0,
        }
    }

    /// True for left/right.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}
