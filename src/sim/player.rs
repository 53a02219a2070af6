//! Player entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Direction;

/// Movement state machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementState {
    /// Stopped, awaiting a directional command.
    #[default]
    Idle,
    /// Stepping along the current direction.
    Moving,
    /// A curved turn animation owns the position and heading.
    Turning,
}

/// The single player entity. Owned by the movement controller; camera and
/// collectible checks only read the position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub current: Direction,
    /// Buffered command, applied at the next junction or path end.
    pub pending: Option<Direction>,
    /// Sprite rotation in degrees.
    pub heading: f32,
    pub state: MovementState,
}

impl Player {
    pub fn new(start: Vec2) -> Self {
        Self {
            pos: start,
            current: Direction::Right,
            pending: None,
            heading: Direction::Right.heading(),
            state: MovementState::Idle,
        }
    }

    /// Adopt a direction and face it.
    pub fn face(&mut self, dir: Direction) {
        self.current = dir;
        self.heading = dir.heading();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_idle() {
        let player = Player::new(Vec2::new(10.0, 20.0));
        assert_eq!(player.state, MovementState::Idle);
        assert_eq!(player.pending, None);
        assert_eq!(player.heading, Direction::Right.heading());
    }

    #[test]
    fn test_face_updates_heading() {
        let mut player = Player::new(Vec2::ZERO);
        player.face(Direction::Up);
        assert_eq!(player.current, Direction::Up);
        assert_eq!(player.heading, 180.0);
    }
}
