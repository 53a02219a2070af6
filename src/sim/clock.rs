//! Round countdown clock

use serde::{Deserialize, Serialize};

/// Clock lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockPhase {
    /// Counting has not started; remaining shows the full round.
    #[default]
    Ready,
    Running,
    /// The countdown hit zero. Terminal until reset.
    Ended,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second elapsed; seconds remaining after the tick.
    Ticked(u32),
    /// This tick took the clock to zero. Fires exactly once.
    Ended,
    /// Tick on a clock that is not running; nothing happened.
    Ignored,
}

/// One-second resolution countdown. The scheduler supplies the cadence;
/// the clock only holds phase and remaining time, so a stray tick after
/// the round ends is inert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GameClock {
    phase: ClockPhase,
    round_seconds: u32,
    remaining: u32,
}

impl GameClock {
    pub fn new(round_seconds: u32) -> Self {
        Self {
            phase: ClockPhase::Ready,
            round_seconds,
            remaining: round_seconds,
        }
    }

    #[inline]
    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Begin the countdown from the full round duration.
    pub fn start(&mut self) {
        self.phase = ClockPhase::Running;
        self.remaining = self.round_seconds;
    }

    /// Back to `Ready` with the full round on the clock.
    pub fn reset(&mut self) {
        self.phase = ClockPhase::Ready;
        self.remaining = self.round_seconds;
    }

    /// Consume one second. Exactly one `Ended` fires per round; ticks
    /// before start or after the end are ignored.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != ClockPhase::Running {
            return TickOutcome::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = ClockPhase::Ended;
            TickOutcome::Ended
        } else {
            TickOutcome::Ticked(self.remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_to_end() {
        let mut clock = GameClock::new(3);
        clock.start();
        assert_eq!(clock.tick(), TickOutcome::Ticked(2));
        assert_eq!(clock.tick(), TickOutcome::Ticked(1));
        assert_eq!(clock.tick(), TickOutcome::Ended);
        assert_eq!(clock.phase(), ClockPhase::Ended);
    }

    /// A tick arriving after zero changes nothing and never re-fires the
    /// end.
    #[test]
    fn test_tick_after_end_is_inert() {
        let mut clock = GameClock::new(1);
        clock.start();
        assert_eq!(clock.tick(), TickOutcome::Ended);
        assert_eq!(clock.tick(), TickOutcome::Ignored);
        assert_eq!(clock.remaining(), 0);
        assert_eq!(clock.phase(), ClockPhase::Ended);
    }

    #[test]
    fn test_tick_before_start_ignored() {
        let mut clock = GameClock::new(5);
        assert_eq!(clock.tick(), TickOutcome::Ignored);
        assert_eq!(clock.remaining(), 5);
    }

    #[test]
    fn test_reset_restores_full_round() {
        let mut clock = GameClock::new(2);
        clock.start();
        clock.tick();
        clock.reset();
        assert_eq!(clock.phase(), ClockPhase::Ready);
        assert_eq!(clock.remaining(), 2);
    }
}
