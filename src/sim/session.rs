//! Game session orchestration
//!
//! One [`GameSession`] owns every subsystem: the path network, the
//! movement controller, the in-flight turn animation, collectibles, the
//! camera, the round clock and the scheduler. The host calls
//! [`GameSession::advance`] with wall-clock deltas; the session pumps the
//! scheduler and executes each due task synchronously in firing order, so
//! a committed step, its collection check and its camera update always
//! land in the same frame with nothing interleaved between them.
//!
//! State changes the host should react to come back as [`SessionEvent`]s
//! from `advance`.

use glam::Vec2;

use crate::camera::CameraController;
use crate::config::{ConfigError, GameConfig};
use crate::consts;
use crate::maze::PathNetwork;
use crate::sched::{Scheduler, Task, Ticket};

use super::clock::{ClockPhase, GameClock, TickOutcome};
use super::collect::{Collectible, CollectibleManager};
use super::movement::{MovementController, StepOutcome};
use super::player::Player;
use super::turn::TurnAnimation;

/// Host-visible things that happened during an [`GameSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// An item was picked up; score and points are post-pickup totals.
    Collected { id: u32, score: u32, points: u32 },
    /// A collected item came back at a new position.
    Respawned { id: u32, pos: Vec2 },
    /// One second elapsed on the round clock.
    ClockTicked { remaining: u32 },
    /// The round clock hit zero; totals are final.
    RoundEnded { score: u32, points: u32 },
}

/// Everything a renderer needs for one frame, decoupled from the
/// simulation types.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub player_pos: Vec2,
    /// Sprite rotation in degrees.
    pub player_heading: f32,
    pub camera_offset: Vec2,
    /// Active collectible positions, by id.
    pub collectibles: Vec<(u32, Vec2)>,
    pub score: u32,
    pub points: u32,
    pub remaining_seconds: u32,
    pub phase: ClockPhase,
}

/// One complete game: board, player, items, clock and timers.
pub struct GameSession {
    config: GameConfig,
    net: PathNetwork,
    movement: MovementController,
    turn: Option<TurnAnimation>,
    collectibles: CollectibleManager,
    camera: CameraController,
    clock: GameClock,
    sched: Scheduler,
    /// Outstanding respawn timer per collected item id.
    respawn_tickets: Vec<(u32, Ticket)>,
    resize_ticket: Option<Ticket>,
    pending_device: Option<Vec2>,
    score: u32,
    points: u32,
}

impl GameSession {
    /// Validate the configuration, build the network and seed the board.
    /// The clock stays `Ready` until [`start`](Self::start).
    pub fn new(config: GameConfig, device: Vec2) -> Result<Self, ConfigError> {
        let net = config.build_network()?;
        let mut collectibles = CollectibleManager::new(
            config.collectibles,
            config.blocked.clone(),
            config.seed,
        );
        collectibles.populate(&net, config.start);
        let mut camera = CameraController::new(config.camera_profiles.clone(), device);
        camera.update(config.start);
        let movement = MovementController::new(
            config.start,
            config.move_speed,
            config.grid_size,
            config.turn_duration,
        );
        let clock = GameClock::new(config.round_seconds);
        Ok(Self {
            config,
            net,
            movement,
            turn: None,
            collectibles,
            camera,
            clock,
            sched: Scheduler::new(),
            respawn_tickets: Vec::new(),
            resize_ticket: None,
            pending_device: None,
            score: 0,
            points: 0,
        })
    }

    #[inline]
    pub fn player(&self) -> &Player {
        self.movement.player()
    }

    #[inline]
    pub fn network(&self) -> &PathNetwork {
        &self.net
    }

    #[inline]
    pub fn collectibles(&self) -> &[Collectible] {
        self.collectibles.items()
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[inline]
    pub fn phase(&self) -> ClockPhase {
        self.clock.phase()
    }

    #[inline]
    pub fn remaining_seconds(&self) -> u32 {
        self.clock.remaining()
    }

    /// Outstanding scheduled operations, all kinds.
    pub fn pending_timers(&self) -> usize {
        self.sched.pending()
    }

    /// Begin a fresh round: full reset, then arm the movement loop and
    /// the one-second countdown.
    pub fn start(&mut self) {
        self.reset();
        self.clock.start();
        self.sched
            .schedule_periodic(self.config.move_interval, Task::MovementStep);
        self.sched.schedule_periodic(1.0, Task::ClockTick);
        log::info!("round started: {}s on the clock", self.clock.remaining());
    }

    /// Tear the session back to its initial state. Every timer dies here,
    /// mid-turn or not; nothing scheduled before this point can fire
    /// afterwards.
    pub fn reset(&mut self) {
        self.sched.clear();
        self.respawn_tickets.clear();
        self.resize_ticket = None;
        self.pending_device = None;
        self.turn = None;
        self.movement.reset(self.config.start);
        self.collectibles.populate(&self.net, self.config.start);
        self.clock.reset();
        self.score = 0;
        self.points = 0;
        self.camera.update(self.config.start);
    }

    /// Feed a directional command. Ignored once the round has ended.
    pub fn command(&mut self, dir: crate::Direction) {
        if self.clock.phase() == ClockPhase::Ended {
            return;
        }
        self.movement.command(dir, &self.net);
    }

    /// Report new device dimensions. The camera re-profiles only after
    /// the debounce window passes without another report.
    pub fn notify_resize(&mut self, device: Vec2) {
        self.pending_device = Some(device);
        if let Some(ticket) = self.resize_ticket.take() {
            self.sched.cancel(ticket);
        }
        self.resize_ticket = Some(self.sched.schedule(consts::RESIZE_DEBOUNCE, Task::ResizeSettle));
    }

    /// Advance the session by `dt` seconds, executing every task that
    /// comes due in firing order.
    pub fn advance(&mut self, dt: f64) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for task in self.sched.advance(dt) {
            match task {
                Task::MovementStep => self.movement_step(&mut events),
                Task::ClockTick => self.clock_tick(&mut events),
                Task::CollectibleRespawn(id) => self.respawn(id, &mut events),
                Task::ResizeSettle => self.resize_settle(),
            }
        }
        events
    }

    /// Renderer-facing view of the current state.
    pub fn frame(&self) -> FrameSnapshot {
        let player = self.movement.player();
        FrameSnapshot {
            player_pos: player.pos,
            player_heading: player.heading,
            camera_offset: self.camera.offset(),
            collectibles: self
                .collectibles
                .items()
                .iter()
                .filter(|c| c.state == super::collect::CollectibleState::Active)
                .map(|c| (c.id, c.pos))
                .collect(),
            score: self.score,
            points: self.points,
            remaining_seconds: self.clock.remaining(),
            phase: self.clock.phase(),
        }
    }

    /// One movement-loop beat: drives the turn animation when one is in
    /// flight, otherwise a straight step.
    fn movement_step(&mut self, events: &mut Vec<SessionEvent>) {
        // Tasks batched before the round ended must not act after it.
        if self.clock.phase() == ClockPhase::Ended {
            return;
        }
        if let Some(turn) = self.turn.as_mut() {
            let pose = turn.advance(self.config.move_interval as f32);
            if pose.done {
                let junction = turn.junction();
                let to = turn.target_direction();
                self.turn = None;
                self.movement.finish_turn(junction, to, &self.net);
                self.after_committed_move(events);
            } else {
                self.movement.apply_turn_pose(pose.pos, pose.heading);
                self.camera.update(pose.pos);
            }
            return;
        }

        match self.movement.step(&self.net) {
            StepOutcome::Idle => {}
            StepOutcome::Committed => self.after_committed_move(events),
            StepOutcome::TurnStarted(animation) => {
                self.turn = Some(animation);
            }
            StepOutcome::Recovered => {
                self.camera.update(self.movement.player().pos);
            }
        }
    }

    /// Post-commit bookkeeping: collection check, scoring, respawn
    /// timers, camera. Runs synchronously so the frame the player touches
    /// an item is the frame it scores.
    fn after_committed_move(&mut self, events: &mut Vec<SessionEvent>) {
        let pos = self.movement.player().pos;
        for collected in self.collectibles.check_collection(pos) {
            self.score += 1;
            self.points += self.config.collectibles.points_per_collectible;
            log::debug!(
                "collected {} at {:?}; score {} points {}",
                collected.id,
                collected.pos,
                self.score,
                self.points
            );
            let ticket = self.sched.schedule(
                self.config.collectibles.respawn_delay,
                Task::CollectibleRespawn(collected.id),
            );
            self.respawn_tickets.push((collected.id, ticket));
            events.push(SessionEvent::Collected {
                id: collected.id,
                score: self.score,
                points: self.points,
            });
        }
        self.camera.update(pos);
    }

    fn clock_tick(&mut self, events: &mut Vec<SessionEvent>) {
        match self.clock.tick() {
            TickOutcome::Ticked(remaining) => {
                events.push(SessionEvent::ClockTicked { remaining });
            }
            TickOutcome::Ended => {
                // Round over: every timer dies, the board freezes as-is.
                self.sched.clear();
                self.respawn_tickets.clear();
                self.resize_ticket = None;
                self.turn = None;
                log::info!("round ended: score {} points {}", self.score, self.points);
                events.push(SessionEvent::RoundEnded {
                    score: self.score,
                    points: self.points,
                });
            }
            TickOutcome::Ignored => {}
        }
    }

    fn respawn(&mut self, id: u32, events: &mut Vec<SessionEvent>) {
        self.respawn_tickets.retain(|(item, _)| *item != id);
        if self.clock.phase() == ClockPhase::Ended {
            return;
        }
        let player = self.movement.player().pos;
        if self.collectibles.respawn(id, player, &self.net) {
            let pos = self
                .collectibles
                .items()
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.pos)
                .unwrap_or(player);
            events.push(SessionEvent::Respawned { id, pos });
        }
    }

    fn resize_settle(&mut self) {
        self.resize_ticket = None;
        if let Some(device) = self.pending_device.take() {
            self.camera.select_profile(device);
            self.camera.update(self.movement.player().pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;
    use crate::maze::Polyline;

    fn line_config() -> GameConfig {
        // One straight corridor, start in the middle.
        GameConfig {
            lines: vec![Polyline::new([(0.0, 100.0), (400.0, 100.0)])],
            blocked: Vec::new(),
            start: Vec2::new(200.0, 100.0),
            ..GameConfig::default()
        }
    }

    fn cross_config() -> GameConfig {
        GameConfig {
            lines: vec![
                Polyline::new([(0.0, 100.0), (400.0, 100.0)]),
                Polyline::new([(200.0, 0.0), (200.0, 400.0)]),
            ],
            blocked: Vec::new(),
            start: Vec2::new(100.0, 100.0),
            ..GameConfig::default()
        }
    }

    fn session(config: GameConfig) -> GameSession {
        GameSession::new(config, Vec2::new(1920.0, 1080.0)).unwrap()
    }

    #[test]
    fn test_new_session_is_ready() {
        let session = session(line_config());
        assert_eq!(session.phase(), ClockPhase::Ready);
        assert_eq!(session.score(), 0);
        assert_eq!(session.pending_timers(), 0);
        assert!(!session.collectibles().is_empty());
    }

    #[test]
    fn test_start_arms_loops() {
        let mut session = session(line_config());
        session.start();
        assert_eq!(session.phase(), ClockPhase::Running);
        assert_eq!(session.pending_timers(), 2);
    }

    /// Walking over an item scores once, and the item comes back after
    /// the respawn delay away from the player.
    #[test]
    fn test_collect_scores_once_and_respawns() {
        let mut session = session(line_config());
        session.start();
        session.command(Direction::Right);

        // Walk until something is collected.
        let mut collected = None;
        for _ in 0..4000 {
            for event in session.advance(0.016) {
                if let SessionEvent::Collected { id, score, points } = event {
                    collected = Some((id, score, points));
                }
            }
            if collected.is_some() {
                break;
            }
        }
        let (id, score, points) = collected.expect("an item on the corridor gets collected");
        assert_eq!(score, 1);
        assert_eq!(points, session.config.collectibles.points_per_collectible);
        assert_eq!(session.score(), 1);

        // The slot sits out the delay, then returns away from the player.
        let mut respawned = None;
        let mut elapsed = 0.0;
        while elapsed < 8.0 {
            for event in session.advance(0.016) {
                if let SessionEvent::Respawned { id: rid, pos } = event {
                    if rid == id {
                        respawned = Some(pos);
                    }
                }
            }
            if respawned.is_some() {
                break;
            }
            elapsed += 0.016;
        }
        let pos = respawned.expect("collected item respawns after the delay");
        assert!(
            pos.distance(session.player().pos)
                >= session.config.collectibles.respawn_min_player_dist
        );
    }

    /// Reset mid-turn drops every timer and the in-flight animation;
    /// nothing fires into the fresh state.
    #[test]
    fn test_reset_mid_turn_drops_everything() {
        let mut session = session(cross_config());
        session.start();
        session.command(Direction::Right);
        session.command(Direction::Down);

        // Run until the curved turn is in flight.
        let mut turning = false;
        for _ in 0..8000 {
            session.advance(0.016);
            if session.turn.is_some() {
                turning = true;
                break;
            }
        }
        assert!(turning, "the buffered down command starts a turn");

        session.reset();
        assert_eq!(session.pending_timers(), 0);
        assert!(session.turn.is_none());
        assert_eq!(session.phase(), ClockPhase::Ready);
        assert_eq!(session.score(), 0);
        assert_eq!(session.player().pos, session.config.start);
        assert_eq!(
            session.player().state,
            super::super::player::MovementState::Idle
        );

        // Time passing after reset fires nothing.
        assert!(session.advance(10.0).is_empty());
    }

    #[test]
    fn test_round_end_freezes_session() {
        let mut session = session(line_config());
        session.start();
        session.command(Direction::Right);

        let mut ended = false;
        let mut elapsed = 0.0;
        while elapsed < session.config.round_seconds as f64 + 5.0 {
            for event in session.advance(0.25) {
                if matches!(event, SessionEvent::RoundEnded { .. }) {
                    ended = true;
                }
            }
            elapsed += 0.25;
        }
        assert!(ended);
        assert_eq!(session.phase(), ClockPhase::Ended);
        assert_eq!(session.pending_timers(), 0);

        // Input and time are inert after the end.
        let before = session.player().pos;
        session.command(Direction::Left);
        assert!(session.advance(5.0).is_empty());
        assert_eq!(session.player().pos, before);
    }

    #[test]
    fn test_clock_ticks_arrive_each_second() {
        let mut session = session(line_config());
        session.start();
        let events = session.advance(3.05);
        let ticks = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::ClockTicked { .. }))
            .count();
        assert_eq!(ticks, 3);
    }

    #[test]
    fn test_resize_debounces() {
        let mut session = session(line_config());
        session.notify_resize(Vec2::new(320.0, 600.0));
        session.advance(0.1);
        // A second report inside the window supersedes the first.
        session.notify_resize(Vec2::new(390.0, 800.0));
        session.advance(0.1);
        // Only the settled report re-profiles the camera.
        session.advance(0.2);
        assert_eq!(session.camera.profile().viewport, Vec2::new(190.0, 335.0));
        assert_eq!(session.pending_timers(), 0);
    }

    #[test]
    fn test_frame_snapshot_reflects_state() {
        let mut session = session(line_config());
        session.start();
        let frame = session.frame();
        assert_eq!(frame.player_pos, session.config.start);
        assert_eq!(frame.score, 0);
        assert_eq!(frame.phase, ClockPhase::Running);
        assert_eq!(frame.collectibles.len(), session.collectibles.active_count());
    }

    #[test]
    fn test_turn_lands_on_junction_and_resumes() {
        let mut session = session(cross_config());
        session.start();
        session.command(Direction::Right);
        session.command(Direction::Down);

        let mut saw_turn = false;
        for _ in 0..12000 {
            session.advance(0.016);
            if session.turn.is_some() {
                saw_turn = true;
            }
            if saw_turn && session.turn.is_none() {
                break;
            }
        }
        assert!(saw_turn);
        // Exiting the turn the player heads down from the crossing.
        assert_eq!(session.player().current, Direction::Down);
        assert_eq!(session.player().heading, Direction::Down.heading());
        assert!(session.player().pos.distance(Vec2::new(200.0, 100.0)) < 15.0);
    }
}
