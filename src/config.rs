//! Construction-time configuration
//!
//! Everything the engine ingests at construction lives here: the authored
//! maze lines, blocked regions, movement/turn tuning, collectible
//! parameters, the camera breakpoint table and the round duration. The
//! network is static and cannot self-repair at runtime, so malformed
//! authoring data fails fast with a [`ConfigError`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{CameraProfile, default_profiles};
use crate::consts;
use crate::maze::{
    PathNetwork, Polyline, Rect, default_blocked_regions, default_metro_lines, default_start,
    layout::polylines_to_segments,
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("authored polyline leg from ({},{}) to ({},{}) is diagonal", from.0, from.1, to.0, to.1)]
    DiagonalLeg { from: (f32, f32), to: (f32, f32) },
    #[error("no path segments authored")]
    NoSegments,
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
    #[error("player start ({x},{y}) is not on the path network")]
    StartOffNetwork { x: f32, y: f32 },
    #[error("camera breakpoint table is empty")]
    EmptyCameraTable,
    #[error("camera breakpoints must be ordered by ascending max width")]
    UnsortedCameraTable,
    #[error("round duration must be at least one second")]
    ZeroRoundDuration,
}

/// Collectible placement and respawn tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectibleParams {
    /// Placement stride along each segment.
    pub stride: f32,
    /// Board-wide cap.
    pub max_count: usize,
    /// Guaranteed count near the start position.
    pub nearby_count: usize,
    /// Radius that counts as "near the start".
    pub nearby_radius: f32,
    /// Points too close to the start are rejected for general placement.
    pub start_clearance: f32,
    /// Pickup radius.
    pub collection_radius: f32,
    /// Seconds before a collected item reappears.
    pub respawn_delay: f64,
    /// Respawn candidate stride along each segment.
    pub respawn_stride: f32,
    /// Respawn candidate inset from segment ends.
    pub respawn_inset: f32,
    /// Respawn candidates keep at least this distance from the player.
    pub respawn_min_player_dist: f32,
    /// Respawn candidates keep at least this distance from live items.
    pub respawn_min_spacing: f32,
    /// Points awarded per pickup.
    pub points_per_collectible: u32,
}

impl Default for CollectibleParams {
    fn default() -> Self {
        Self {
            stride: consts::COLLECTIBLE_STRIDE,
            max_count: consts::MAX_COLLECTIBLES,
            nearby_count: consts::NEARBY_COLLECTIBLES,
            nearby_radius: consts::NEARBY_RADIUS,
            start_clearance: 20.0,
            collection_radius: consts::COLLECTION_RADIUS,
            respawn_delay: consts::RESPAWN_DELAY,
            respawn_stride: 40.0,
            respawn_inset: 20.0,
            respawn_min_player_dist: consts::RESPAWN_MIN_PLAYER_DIST,
            respawn_min_spacing: consts::RESPAWN_MIN_SPACING,
            points_per_collectible: consts::POINTS_PER_COLLECTIBLE,
        }
    }
}

/// Complete engine configuration, serializable for authoring tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Authored maze lines (decomposed into axis-aligned segments).
    pub lines: Vec<Polyline>,
    /// Building footprints excluded from collectible placement.
    pub blocked: Vec<Rect>,
    /// Player start position; must lie on the network.
    pub start: Vec2,

    /// Alignment/extent tolerance for all path queries.
    pub tolerance: f32,
    /// Probe granularity and curved-turn radius.
    pub grid_size: f32,
    /// Distance covered per movement step.
    pub move_speed: f32,
    /// Seconds between movement steps.
    pub move_interval: f64,
    /// Curved turn duration in seconds.
    pub turn_duration: f32,

    pub collectibles: CollectibleParams,
    /// Ordered camera breakpoint table; last entry is the catch-all.
    pub camera_profiles: Vec<CameraProfile>,
    /// Round length in seconds.
    pub round_seconds: u32,
    /// Seed for the respawn RNG.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lines: default_metro_lines(),
            blocked: default_blocked_regions(),
            start: default_start(),
            tolerance: consts::PATH_TOLERANCE,
            grid_size: consts::GRID_SIZE,
            move_speed: consts::MOVE_SPEED,
            move_interval: consts::MOVE_INTERVAL,
            turn_duration: consts::TURN_DURATION,
            collectibles: CollectibleParams::default(),
            camera_profiles: default_profiles(),
            round_seconds: consts::ROUND_SECONDS,
            seed: 0x5EED,
        }
    }
}

impl GameConfig {
    /// Validate the configuration and build the path network from it.
    pub fn build_network(&self) -> Result<PathNetwork, ConfigError> {
        self.validate()?;
        let segments = polylines_to_segments(&self.lines)?;
        if segments.is_empty() {
            return Err(ConfigError::NoSegments);
        }
        let network = PathNetwork::new(segments, self.tolerance);
        if !network.is_on_network(self.start) {
            return Err(ConfigError::StartOffNetwork {
                x: self.start.x,
                y: self.start.y,
            });
        }
        Ok(network)
    }

    /// Structural checks that do not require the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lines.is_empty() {
            return Err(ConfigError::NoSegments);
        }
        for (value, field) in [
            (self.tolerance, "tolerance"),
            (self.grid_size, "grid_size"),
            (self.move_speed, "move_speed"),
            (self.turn_duration, "turn_duration"),
            (self.collectibles.stride, "collectibles.stride"),
            (self.collectibles.respawn_stride, "collectibles.respawn_stride"),
            (self.collectibles.collection_radius, "collectibles.collection_radius"),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field });
            }
        }
        if self.move_interval <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "move_interval",
            });
        }
        if self.collectibles.respawn_delay <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "collectibles.respawn_delay",
            });
        }
        if self.camera_profiles.is_empty() {
            return Err(ConfigError::EmptyCameraTable);
        }
        if self
            .camera_profiles
            .windows(2)
            .any(|w| w[0].max_width > w[1].max_width)
        {
            return Err(ConfigError::UnsortedCameraTable);
        }
        if self.round_seconds == 0 {
            return Err(ConfigError::ZeroRoundDuration);
        }
        Ok(())
    }
}
