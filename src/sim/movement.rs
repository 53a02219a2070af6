//! Movement state machine
//!
//! Drives the player along the path network in fixed-size steps. Commands
//! buffer into `pending` and are applied only at junctions or path ends;
//! at a plain path end only the exact reversal is accepted. Every step is
//! validated against the network; an invalid step recovers to the nearest
//! anchor and stops until a fresh command arrives.

use glam::Vec2;

use crate::Direction;
use crate::maze::{PathNetwork, SegmentId};

use super::player::{MovementState, Player};
use super::turn::TurnAnimation;

/// What one movement step did. The session reacts: a committed step runs
/// the collectible check and camera update synchronously; a started turn
/// hands position ownership to the animation.
#[derive(Debug)]
pub enum StepOutcome {
    /// Not moving (idle or turning); nothing changed.
    Idle,
    /// Position advanced one step along the current direction.
    Committed,
    /// A perpendicular junction turn began; the session owns the animation.
    TurnStarted(TurnAnimation),
    /// The step was invalid; player snapped to the nearest anchor and
    /// stopped. A fresh command is required to resume.
    Recovered,
}

/// Owns the player and executes the movement rules against the network.
#[derive(Debug)]
pub struct MovementController {
    player: Player,
    move_speed: f32,
    grid_size: f32,
    turn_duration: f32,
}

impl MovementController {
    pub fn new(start: Vec2, move_speed: f32, grid_size: f32, turn_duration: f32) -> Self {
        Self {
            player: Player::new(start),
            move_speed,
            grid_size,
            turn_duration,
        }
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Reset to the start position, idle, nothing buffered.
    pub fn reset(&mut self, start: Vec2) {
        self.player = Player::new(start);
    }

    /// Feed a directional command. From idle the command takes effect
    /// immediately when traversable; while moving it buffers until a
    /// junction or path end offers a valid opportunity.
    pub fn command(&mut self, dir: Direction, net: &PathNetwork) {
        self.player.pending = Some(dir);
        if self.player.state == MovementState::Idle {
            if self.can_move_in_direction(dir, net) {
                self.player.face(dir);
                self.player.pending = None;
                self.player.state = MovementState::Moving;
            } else {
                // Commanded direction resolves to no segment: silent no-op.
                log::debug!("command {:?} not traversable from {:?}", dir, self.player.pos);
            }
        }
    }

    /// Execute one step of the movement loop. No-op unless `Moving`; while
    /// a turn animation owns the player the session drives it instead.
    pub fn step(&mut self, net: &PathNetwork) -> StepOutcome {
        if self.player.state != MovementState::Moving {
            return StepOutcome::Idle;
        }

        // Buffered direction changes apply only at a junction or path end.
        if let Some(pending) = self.player.pending {
            let at_junction = net.is_junction(self.player.pos);
            let at_path_end = net.is_at_path_end(self.player.pos);
            if (at_junction || at_path_end)
                && (self.can_turn_at_intersection(pending, net)
                    || self.can_turn_at_path_end(pending, net))
            {
                self.player.pending = None;
                if pending != self.player.current {
                    if pending == self.player.current.opposite() {
                        // Reversals never curve.
                        self.player.face(pending);
                    } else if let Some(junction) = self.junction_point_near(net) {
                        let animation = TurnAnimation::new(
                            self.player.pos,
                            junction,
                            self.player.current,
                            pending,
                            self.grid_size,
                            self.turn_duration,
                        );
                        self.player.state = MovementState::Turning;
                        log::debug!(
                            "turn {:?} -> {:?} at {:?}",
                            self.player.current,
                            pending,
                            junction
                        );
                        return StepOutcome::TurnStarted(animation);
                    } else {
                        self.player.face(pending);
                    }
                }
            }
        }

        let candidate = self.player.pos + self.player.current.delta() * self.move_speed;
        if self.is_valid_move(self.player.pos, candidate, net) {
            self.player.pos = candidate;
            self.maintain_alignment(net);
            StepOutcome::Committed
        } else {
            self.recover(candidate, net);
            StepOutcome::Recovered
        }
    }

    /// Apply a mid-turn pose sampled from the animation.
    pub fn apply_turn_pose(&mut self, pos: Vec2, heading: f32) {
        debug_assert_eq!(self.player.state, MovementState::Turning);
        self.player.pos = pos;
        self.player.heading = heading;
    }

    /// Complete a turn: snap heading to the target direction, position to
    /// the junction then the nearest anchor (cancel drift), and resume
    /// stepping.
    pub fn finish_turn(&mut self, junction: Vec2, to: Direction, net: &PathNetwork) {
        self.player.face(to);
        self.player.pos = junction;
        if let Some(anchor) = net.nearest_anchor(self.player.pos) {
            self.player.pos = anchor;
        }
        self.maintain_alignment(net);
        self.player.state = MovementState::Moving;
    }

    /// Movement validity per the shared-segment / junction-crossing rule.
    ///
    /// Both endpoints must be on the network, and either they share a
    /// segment (moving along it), or the old point is a junction and the
    /// new point lies on a segment crossing one of the old point's
    /// segments near the old position.
    pub fn is_valid_move(&self, old: Vec2, new: Vec2, net: &PathNetwork) -> bool {
        let old_ids = net.segments_at(old);
        let new_ids = net.segments_at(new);
        if old_ids.is_empty() || new_ids.is_empty() {
            return false;
        }

        let tolerance = net.tolerance();
        let along_shared = |id: &SegmentId| {
            new_ids.contains(id) && {
                let seg = net.segment(*id);
                if seg.is_horizontal() {
                    (old.y - new.y).abs() <= tolerance
                } else {
                    (old.x - new.x).abs() <= tolerance
                }
            }
        };
        if old_ids.iter().any(along_shared) {
            return true;
        }

        if net.is_junction(old) {
            for &o in &old_ids {
                for &n in &new_ids {
                    if o == n {
                        return true;
                    }
                    if let Some(point) = net.intersection_of(o, n) {
                        if old.distance(point) <= tolerance * 2.0 {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// Whether a direction is traversable from the current point: some
    /// segment here must run along the commanded axis and cover a probe
    /// one grid step ahead. A perpendicular probe still inside another
    /// segment's tolerance band does not count.
    pub fn can_move_in_direction(&self, dir: Direction, net: &PathNetwork) -> bool {
        let probe =
            self.player.pos + dir.delta() * self.grid_size.max(self.move_speed * 4.0);
        net.segments_at(self.player.pos).into_iter().any(|id| {
            let seg = net.segment(id);
            seg.is_horizontal() == dir.is_horizontal() && seg.contains(probe, net.tolerance())
        })
    }

    /// Forgiving turn test near junctions: inside the widened junction
    /// window a longer probe against the relaxed position test decides;
    /// elsewhere fall back to the plain traversability check.
    fn can_turn_at_intersection(&self, dir: Direction, net: &PathNetwork) -> bool {
        if net.is_junction_with_tolerance(self.player.pos, net.tolerance() * 3.0) {
            let probe = self.player.pos + dir.delta() * self.move_speed * 6.0;
            return net.is_valid_position(probe);
        }
        self.can_move_in_direction(dir, net)
    }

    /// At a plain path end only the exact reversal is accepted.
    fn can_turn_at_path_end(&self, dir: Direction, net: &PathNetwork) -> bool {
        if dir != self.player.current.opposite() {
            return false;
        }
        let candidate = self.player.pos + dir.delta() * self.move_speed;
        self.is_valid_move(self.player.pos, candidate, net)
    }

    /// Exact crossing point of a differently-oriented segment pair near
    /// the player, for anchoring a turn curve.
    fn junction_point_near(&self, net: &PathNetwork) -> Option<Vec2> {
        let ids = net.segments_at_with_tolerance(self.player.pos, net.tolerance() * 3.0);
        let mut best: Option<(Vec2, f32)> = None;
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                if let Some(point) = net.intersection_of(a, b) {
                    let d = point.distance_squared(self.player.pos);
                    if best.is_none_or(|(_, bd)| d < bd) {
                        best = Some((point, d));
                    }
                }
            }
        }
        best.map(|(point, _)| point)
    }

    /// Keep the player on segment centerlines: snap the cross-axis
    /// coordinate only at junctions (mid-segment motion is left alone),
    /// and fall back to the nearest centerline if somehow off-network.
    fn maintain_alignment(&mut self, net: &PathNetwork) {
        let ids = net.segments_at(self.player.pos);
        if !ids.is_empty() && net.is_junction(self.player.pos) {
            let want_horizontal = self.player.current.is_horizontal();
            if let Some(&id) = ids
                .iter()
                .find(|&&id| net.segment(id).is_horizontal() == want_horizontal)
            {
                self.player.pos = net.segment(id).align(self.player.pos);
            }
        } else if ids.is_empty() {
            if let Some(id) = net.nearest_segment(self.player.pos) {
                self.player.pos = net.segment(id).align(self.player.pos);
            }
        }
    }

    /// Invalid-step recovery: snap to the nearest anchor reachable from
    /// the attempted position (falling back to the current position),
    /// realign, and stop.
    fn recover(&mut self, attempted: Vec2, net: &PathNetwork) {
        let anchor = net
            .nearest_anchor(attempted)
            .or_else(|| net.nearest_anchor(self.player.pos));
        if let Some(anchor) = anchor {
            log::debug!(
                "invalid step from {:?}; snapping to anchor {:?}",
                self.player.pos,
                anchor
            );
            self.player.pos = anchor;
        } else {
            log::warn!("invalid step with no recovery anchor at {:?}", self.player.pos);
        }
        self.maintain_alignment(net);
        self.player.heading = self.player.current.heading();
        self.player.state = MovementState::Idle;
        self.player.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Segment;

    fn cross_network() -> PathNetwork {
        PathNetwork::new(
            vec![
                Segment::horizontal(100.0, 0.0, 200.0),
                Segment::vertical(100.0, 0.0, 200.0),
            ],
            12.0,
        )
    }

    fn controller_at(pos: Vec2) -> MovementController {
        MovementController::new(pos, 0.5, 12.0, 0.4)
    }

    /// A "down" command issued before the junction defers until the
    /// player reaches the crossing at (100, 100).
    #[test]
    fn test_down_command_defers_until_junction() {
        let net = cross_network();
        let mut ctl = controller_at(Vec2::new(0.0, 100.0));
        ctl.command(Direction::Right, &net);
        assert_eq!(ctl.player().state, MovementState::Moving);

        // Buffer "down" while still far left of the junction.
        ctl.command(Direction::Down, &net);
        assert_eq!(ctl.player().pending, Some(Direction::Down));

        let mut turned = None;
        for _ in 0..400 {
            match ctl.step(&net) {
                StepOutcome::TurnStarted(anim) => {
                    turned = Some(anim);
                    break;
                }
                StepOutcome::Committed => {}
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        let anim = turned.expect("turn should start at the junction");
        assert_eq!(anim.target_direction(), Direction::Down);
        assert_eq!(anim.junction(), Vec2::new(100.0, 100.0));
        // The junction detection window opens near x=100, well past x=50.
        assert!(ctl.player().pos.x > 50.0);
        assert!(net.is_junction_with_tolerance(ctl.player().pos, net.tolerance() * 3.0));
        assert_eq!(ctl.player().state, MovementState::Turning);
        assert_eq!(ctl.player().pending, None);
    }

    #[test]
    fn test_junction_detected_at_crossing() {
        let net = cross_network();
        assert!(net.is_junction(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_step_commits_along_segment() {
        let net = cross_network();
        let mut ctl = controller_at(Vec2::new(50.0, 100.0));
        ctl.command(Direction::Right, &net);
        assert!(matches!(ctl.step(&net), StepOutcome::Committed));
        assert_eq!(ctl.player().pos, Vec2::new(50.5, 100.0));
        assert_eq!(ctl.player().heading, Direction::Right.heading());
    }

    #[test]
    fn test_idle_step_is_noop() {
        let net = cross_network();
        let mut ctl = controller_at(Vec2::new(50.0, 100.0));
        // Zero net movement: no state change, no side effects.
        assert!(matches!(ctl.step(&net), StepOutcome::Idle));
        assert_eq!(ctl.player().state, MovementState::Idle);
        assert_eq!(ctl.player().pos, Vec2::new(50.0, 100.0));
    }

    #[test]
    fn test_command_off_segment_is_silent_noop() {
        let net = cross_network();
        let mut ctl = controller_at(Vec2::new(50.0, 100.0));
        // No vertical segment at x=50.
        ctl.command(Direction::Up, &net);
        assert_eq!(ctl.player().state, MovementState::Idle);
        assert_eq!(ctl.player().pending, Some(Direction::Up));
    }

    #[test]
    fn test_path_end_accepts_only_reversal() {
        let net = cross_network();
        let mut ctl = controller_at(Vec2::new(2.0, 100.0));
        ctl.command(Direction::Left, &net);
        assert_eq!(ctl.player().state, MovementState::Moving);

        // Walk into the left end until the step gets rejected.
        for _ in 0..40 {
            if matches!(ctl.step(&net), StepOutcome::Recovered) {
                break;
            }
        }
        assert_eq!(ctl.player().state, MovementState::Idle);
        assert_eq!(ctl.player().pos, Vec2::new(0.0, 100.0));

        // Perpendicular command at the end: no vertical segment, no-op.
        ctl.command(Direction::Up, &net);
        assert_eq!(ctl.player().state, MovementState::Idle);

        // Reversal resumes movement.
        ctl.command(Direction::Right, &net);
        assert_eq!(ctl.player().state, MovementState::Moving);
        assert!(matches!(ctl.step(&net), StepOutcome::Committed));
    }

    #[test]
    fn test_invalid_step_recovers_to_anchor() {
        let net = cross_network();
        let mut ctl = controller_at(Vec2::new(195.0, 100.0));
        ctl.command(Direction::Right, &net);
        let mut recovered = false;
        for _ in 0..60 {
            if matches!(ctl.step(&net), StepOutcome::Recovered) {
                recovered = true;
                break;
            }
        }
        assert!(recovered);
        // Snapped onto the segment's right endpoint, idle, nothing buffered.
        assert_eq!(ctl.player().pos, Vec2::new(200.0, 100.0));
        assert_eq!(ctl.player().state, MovementState::Idle);
        assert_eq!(ctl.player().pending, None);
    }

    #[test]
    fn test_reversal_never_curves() {
        let net = cross_network();
        let mut ctl = controller_at(Vec2::new(100.0, 100.0));
        ctl.command(Direction::Right, &net);
        ctl.command(Direction::Left, &net);
        // Reversal applies instantly at the junction without an animation.
        assert!(matches!(ctl.step(&net), StepOutcome::Committed));
        assert_eq!(ctl.player().current, Direction::Left);
    }

    #[test]
    fn test_centerline_snap_only_at_junction() {
        let net = cross_network();
        let mut ctl = controller_at(Vec2::new(50.0, 104.0));
        ctl.command(Direction::Right, &net);
        assert!(matches!(ctl.step(&net), StepOutcome::Committed));
        // Mid-segment: the cross-axis offset is left alone.
        assert_eq!(ctl.player().pos.y, 104.0);

        let mut at_junction = controller_at(Vec2::new(98.0, 104.0));
        at_junction.command(Direction::Right, &net);
        assert!(matches!(at_junction.step(&net), StepOutcome::Committed));
        // At the junction the player realigns to the centerline.
        assert_eq!(at_junction.player().pos.y, 100.0);
    }

    #[test]
    fn test_turn_completion_resumes_movement() {
        let net = cross_network();
        let mut ctl = controller_at(Vec2::new(100.0, 100.0));
        ctl.player.state = MovementState::Turning;
        ctl.finish_turn(Vec2::new(100.0, 100.0), Direction::Down, &net);
        assert_eq!(ctl.player().state, MovementState::Moving);
        assert_eq!(ctl.player().current, Direction::Down);
        assert_eq!(ctl.player().heading, Direction::Down.heading());
        assert_eq!(ctl.player().pos, Vec2::new(100.0, 100.0));
        assert!(matches!(ctl.step(&net), StepOutcome::Committed));
    }

    #[test]
    fn test_step_suppressed_while_turning() {
        let net = cross_network();
        let mut ctl = controller_at(Vec2::new(100.0, 100.0));
        ctl.player.state = MovementState::Turning;
        assert!(matches!(ctl.step(&net), StepOutcome::Idle));
        // Commands buffer but do not take effect mid-turn.
        ctl.command(Direction::Up, &net);
        assert_eq!(ctl.player().state, MovementState::Turning);
        assert_eq!(ctl.player().pending, Some(Direction::Up));
    }
}
