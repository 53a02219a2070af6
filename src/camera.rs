//! Viewport camera
//!
//! Computes the scroll offset that keeps the player framed inside a
//! device-sized viewport cut out of the larger board. Profiles are an
//! ordered breakpoint table keyed by device viewport size; the first
//! matching entry wins and the last entry is the catch-all.
//!
//! The offset is player-centered with a configurable top bias (extra
//! margin below the player so upcoming path is visible), clamped so the
//! viewport never leaves the board, and finally clamped so the player's
//! point always stays inside the visible rectangle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One device-size breakpoint with its framing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraProfile {
    /// Device widths up to and including this match the profile.
    pub max_width: f32,
    /// Optional device-height qualifier for the breakpoint.
    pub max_height: Option<f32>,
    /// Visible viewport cut from the board (pixels).
    pub viewport: Vec2,
    /// Authored board dimensions (pixels).
    pub board: Vec2,
    /// Fraction of viewport height the player sits above center.
    pub top_bias: f32,
    /// Board-y above which the extra top offset applies.
    pub top_threshold: f32,
    /// Extra upward offset applied near the top edge.
    pub top_y_offset: f32,
    /// Margin trimmed off the right scroll limit.
    pub right_offset: f32,
    /// Margin trimmed off the bottom scroll limit.
    pub bottom_offset: f32,
}

impl CameraProfile {
    fn matches(&self, device: Vec2) -> bool {
        device.x <= self.max_width && self.max_height.is_none_or(|h| device.y <= h)
    }
}

/// Breakpoint table derived from the shipped device tuning.
pub fn default_profiles() -> Vec<CameraProfile> {
    let board = Vec2::new(340.0, 516.0);
    vec![
        CameraProfile {
            max_width: 320.0,
            max_height: None,
            viewport: Vec2::new(145.0, 250.0),
            board,
            top_bias: 0.05,
            top_threshold: 60.0,
            top_y_offset: 0.0,
            right_offset: 8.0,
            bottom_offset: 2.0,
        },
        CameraProfile {
            max_width: 360.0,
            max_height: None,
            viewport: Vec2::new(195.0, 300.0),
            board,
            top_bias: 0.05,
            top_threshold: 80.0,
            top_y_offset: 0.0,
            right_offset: 12.0,
            bottom_offset: 3.0,
        },
        CameraProfile {
            max_width: 375.0,
            max_height: None,
            viewport: Vec2::new(205.0, 220.0),
            board,
            top_bias: 0.05,
            top_threshold: 80.0,
            top_y_offset: 0.0,
            right_offset: 1.0,
            bottom_offset: 3.0,
        },
        CameraProfile {
            max_width: 390.0,
            max_height: None,
            viewport: Vec2::new(190.0, 335.0),
            board,
            top_bias: 0.07,
            top_threshold: 100.0,
            top_y_offset: 0.0,
            right_offset: 16.0,
            bottom_offset: 5.0,
        },
        CameraProfile {
            max_width: 402.0,
            max_height: Some(874.0),
            viewport: Vec2::new(215.0, 290.0),
            board: Vec2::new(340.0, 520.0),
            top_bias: 0.07,
            top_threshold: 100.0,
            top_y_offset: 0.0,
            right_offset: 4.0,
            bottom_offset: 4.0,
        },
        // Catch-all: tablets and desktop see the whole board.
        CameraProfile {
            max_width: f32::MAX,
            max_height: None,
            viewport: board,
            board,
            top_bias: 0.0,
            top_threshold: 0.0,
            top_y_offset: 0.0,
            right_offset: 0.0,
            bottom_offset: 0.0,
        },
    ]
}

/// Viewport state: active profile plus the last computed offset.
#[derive(Debug, Clone)]
pub struct CameraController {
    profiles: Vec<CameraProfile>,
    active: usize,
    device: Vec2,
    offset: Vec2,
}

impl CameraController {
    /// Profiles must be non-empty and validated by [`crate::GameConfig`].
    pub fn new(profiles: Vec<CameraProfile>, device: Vec2) -> Self {
        let mut camera = Self {
            profiles,
            active: 0,
            device,
            offset: Vec2::ZERO,
        };
        camera.select_profile(device);
        camera
    }

    /// Re-select the breakpoint for new device dimensions.
    pub fn select_profile(&mut self, device: Vec2) {
        self.device = device;
        let previous = self.active;
        self.active = self
            .profiles
            .iter()
            .position(|p| p.matches(device))
            .unwrap_or(self.profiles.len() - 1);
        if self.active != previous {
            log::info!(
                "camera profile {} -> {} for device {}x{}",
                previous,
                self.active,
                device.x,
                device.y
            );
        }
    }

    #[inline]
    pub fn profile(&self) -> &CameraProfile {
        &self.profiles[self.active]
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Recompute the offset for a player position. Called on every
    /// committed player move and after resize settles.
    pub fn update(&mut self, player: Vec2) {
        self.offset = self.offset_for(player);
    }

    fn offset_for(&self, player: Vec2) -> Vec2 {
        let p = self.profile();

        // Player-centered with the top bias keeping extra margin below.
        let mut target = player - Vec2::new(p.viewport.x * 0.5, p.viewport.y * (0.5 - p.top_bias));
        if player.y < p.top_threshold {
            target.y -= p.top_y_offset;
        }

        // Keep the viewport on the board, with authored edge margins.
        let scroll_max = (p.board - p.viewport).max(Vec2::ZERO);
        let scroll_max = Vec2::new(
            (scroll_max.x - p.right_offset).max(0.0),
            (scroll_max.y - p.bottom_offset).max(0.0),
        );
        let mut offset = target.clamp(Vec2::ZERO, scroll_max);

        // The player's point must stay inside the visible rectangle even
        // when the edge margins fight the board clamp.
        offset = offset.clamp((player - p.viewport).max(Vec2::ZERO), player.max(Vec2::ZERO));
        offset
    }
}
