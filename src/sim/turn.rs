//! Curved junction turns
//!
//! When the player changes direction at a junction, the corner is rounded
//! with a cubic Bezier instead of an instantaneous right angle: p0 is the
//! entry position, p3 the junction's exact crossing point, and p1/p2 sit
//! one curve radius along the incoming and outgoing direction vectors.
//! The parameter runs 0..1 over a fixed duration with ease-in/ease-out;
//! the heading follows the curve tangent.

use glam::Vec2;

use crate::Direction;

/// Quadratic ease-in/ease-out timing curve.
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic Bezier evaluation.
#[inline]
fn bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Cubic Bezier derivative (curve tangent, unnormalized).
#[inline]
fn bezier_derivative(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    (p1 - p0) * (3.0 * u * u) + (p2 - p1) * (6.0 * u * t) + (p3 - p2) * (3.0 * t * t)
}

/// Sampled pose along an in-progress turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnPose {
    pub pos: Vec2,
    /// Heading in degrees, tangent to the curve.
    pub heading: f32,
    pub done: bool,
}

/// One curved turn through a junction. At most one exists per player;
/// while it runs, ordinary stepping and further direction changes are
/// suppressed by the `Turning` state.
#[derive(Debug, Clone)]
pub struct TurnAnimation {
    p0: Vec2,
    p1: Vec2,
    p2: Vec2,
    p3: Vec2,
    to: Direction,
    duration: f32,
    elapsed: f32,
}

impl TurnAnimation {
    /// `entry` is the player position when the turn starts, `junction` the
    /// exact crossing point, `radius` the control-point offset.
    pub fn new(
        entry: Vec2,
        junction: Vec2,
        from: Direction,
        to: Direction,
        radius: f32,
        duration: f32,
    ) -> Self {
        Self {
            p0: entry,
            p1: entry + from.delta() * radius,
            p2: junction + to.delta() * radius,
            p3: junction,
            to,
            duration: duration.max(f32::EPSILON),
            elapsed: 0.0,
        }
    }

    /// Direction the turn exits toward.
    #[inline]
    pub fn target_direction(&self) -> Direction {
        self.to
    }

    /// Exact junction point the turn lands on.
    #[inline]
    pub fn junction(&self) -> Vec2 {
        self.p3
    }

    /// Advance by `dt` seconds and sample the pose at eased-t.
    pub fn advance(&mut self, dt: f32) -> TurnPose {
        self.elapsed += dt;
        let t = (self.elapsed / self.duration).min(1.0);
        let eased = ease_in_out(t);
        let pos = bezier(self.p0, self.p1, self.p2, self.p3, eased);
        let tangent = bezier_derivative(self.p0, self.p1, self.p2, self.p3, eased);
        let heading = tangent.y.atan2(tangent.x).to_degrees() - 90.0;
        TurnPose {
            pos,
            heading,
            done: t >= 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints_and_midpoint() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        // Slow start: the first quarter covers less than a quarter.
        assert!(ease_in_out(0.25) < 0.25);
    }

    #[test]
    fn test_turn_starts_at_entry_and_ends_at_junction() {
        let entry = Vec2::new(88.0, 100.0);
        let junction = Vec2::new(100.0, 100.0);
        let mut turn = TurnAnimation::new(
            entry,
            junction,
            Direction::Right,
            Direction::Down,
            12.0,
            0.4,
        );
        let first = turn.advance(0.0);
        assert!(first.pos.distance(entry) < 1e-4);
        assert!(!first.done);

        let last = turn.advance(1.0);
        assert!(last.done);
        assert!(last.pos.distance(junction) < 1e-4);
    }

    #[test]
    fn test_turn_curves_through_the_corner() {
        let entry = Vec2::new(88.0, 100.0);
        let junction = Vec2::new(100.0, 100.0);
        let mut turn = TurnAnimation::new(
            entry,
            junction,
            Direction::Right,
            Direction::Down,
            12.0,
            0.4,
        );
        // Mid-turn the player has left the horizontal centerline: the
        // corner is rounded, not a right angle. p2 pulls the curve below.
        let mid = turn.advance(0.2);
        assert!(mid.pos.y > 100.0);
        assert!(mid.pos.x > entry.x);
    }

    #[test]
    fn test_entry_tangent_matches_incoming_heading() {
        let entry = Vec2::new(88.0, 100.0);
        let junction = Vec2::new(100.0, 100.0);
        let mut turn = TurnAnimation::new(
            entry,
            junction,
            Direction::Right,
            Direction::Down,
            12.0,
            0.4,
        );
        // At t=0 the tangent is p1-p0, i.e. the incoming travel axis, so
        // the rotation starts where straight movement left off. The exact
        // target heading is snapped on completion by the session.
        let pose = turn.advance(0.0);
        assert!((pose.heading - Direction::Right.heading()).abs() < 1e-3);
    }
}
