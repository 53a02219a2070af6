//! Cooperative scheduler
//!
//! The engine is single-threaded: the movement loop, turn frames, clock
//! ticks and collectible respawns are chains of short deferred callbacks,
//! never OS threads. This module replaces the browser timer soup with an
//! explicit registry: every scheduled operation gets a cancellable
//! [`Ticket`], and [`Scheduler::clear`] atomically drops every entry and
//! bumps an epoch so a stale callback can never fire into reset state.
//!
//! The host pumps the queue from [`Scheduler::advance`]; tasks come back
//! in due-time order (ties break by schedule order) and the session
//! executes them to completion before the next one runs.

/// What a fired timer means to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// One-second countdown tick.
    ClockTick,
    /// Movement loop step (also drives turn animation frames).
    MovementStep,
    /// A collected item's respawn delay elapsed.
    CollectibleRespawn(u32),
    /// Debounced viewport resize settled.
    ResizeSettle,
}

/// Handle to one scheduled operation. Stale tickets (from before a
/// `clear`) are harmless: they cancel nothing and match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    id: u64,
    epoch: u64,
}

#[derive(Debug)]
struct Entry {
    ticket: Ticket,
    due: f64,
    /// Re-arm period for repeating tasks.
    period: Option<f64>,
    task: Task,
    seq: u64,
}

/// Timer registry for one game session.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: f64,
    epoch: u64,
    next_id: u64,
    next_seq: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic session time in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Current epoch; bumped by every [`clear`](Self::clear).
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Outstanding entry count.
    #[inline]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Schedule a one-shot task after `delay` seconds.
    pub fn schedule(&mut self, delay: f64, task: Task) -> Ticket {
        self.push(delay, None, task)
    }

    /// Schedule a repeating task every `period` seconds, first fire after
    /// one full period.
    pub fn schedule_periodic(&mut self, period: f64, task: Task) -> Ticket {
        self.push(period, Some(period), task)
    }

    fn push(&mut self, delay: f64, period: Option<f64>, task: Task) -> Ticket {
        self.next_id += 1;
        self.next_seq += 1;
        let ticket = Ticket {
            id: self.next_id,
            epoch: self.epoch,
        };
        self.entries.push(Entry {
            ticket,
            due: self.now + delay.max(0.0),
            period,
            task,
            seq: self.next_seq,
        });
        ticket
    }

    /// Cancel one scheduled operation. Returns whether anything was
    /// removed; stale or already-fired tickets return false.
    pub fn cancel(&mut self, ticket: Ticket) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.ticket != ticket);
        before != self.entries.len()
    }

    /// Drop every outstanding entry and bump the epoch. Anything captured
    /// before this point (tickets, in-flight task lists) is dead.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("scheduler clear: dropping {} entries", self.entries.len());
        }
        self.entries.clear();
        self.epoch += 1;
    }

    /// Advance time by `dt` seconds and collect every task that came due,
    /// in firing order. Periodic tasks re-arm on a fixed cadence and may
    /// fire multiple times when `dt` spans several periods.
    pub fn advance(&mut self, dt: f64) -> Vec<Task> {
        self.now += dt.max(0.0);
        let epoch = self.epoch;
        let now = self.now;

        let mut fired: Vec<(f64, u64, Task)> = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            let entry = &mut self.entries[i];
            if entry.ticket.epoch != epoch {
                // Stale callback from before a reset; suppress it.
                log::warn!("suppressing stale task {:?}", entry.task);
                self.entries.swap_remove(i);
                continue;
            }
            if entry.due > now {
                i += 1;
                continue;
            }
            match entry.period {
                Some(period) => {
                    while entry.due <= now {
                        fired.push((entry.due, entry.seq, entry.task));
                        entry.due += period;
                    }
                    i += 1;
                }
                None => {
                    fired.push((entry.due, entry.seq, entry.task));
                    self.entries.swap_remove(i);
                }
            }
        }

        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, task)| task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut sched = Scheduler::new();
        sched.schedule(1.0, Task::ClockTick);
        assert!(sched.advance(0.5).is_empty());
        assert_eq!(sched.advance(0.6), vec![Task::ClockTick]);
        assert!(sched.advance(10.0).is_empty());
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_periodic_rearms_and_catches_up() {
        let mut sched = Scheduler::new();
        sched.schedule_periodic(1.0, Task::ClockTick);
        assert_eq!(sched.advance(3.0).len(), 3);
        assert_eq!(sched.advance(1.0).len(), 1);
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn test_due_order_with_ties() {
        let mut sched = Scheduler::new();
        sched.schedule(2.0, Task::ResizeSettle);
        sched.schedule(1.0, Task::ClockTick);
        sched.schedule(1.0, Task::MovementStep);
        assert_eq!(
            sched.advance(2.0),
            vec![Task::ClockTick, Task::MovementStep, Task::ResizeSettle]
        );
    }

    #[test]
    fn test_cancel_removes_entry() {
        let mut sched = Scheduler::new();
        let ticket = sched.schedule(1.0, Task::CollectibleRespawn(3));
        assert!(sched.cancel(ticket));
        assert!(!sched.cancel(ticket));
        assert!(sched.advance(2.0).is_empty());
    }

    #[test]
    fn test_clear_drops_everything_and_bumps_epoch() {
        let mut sched = Scheduler::new();
        let ticket = sched.schedule(1.0, Task::ClockTick);
        sched.schedule_periodic(0.5, Task::MovementStep);
        let epoch = sched.epoch();
        sched.clear();
        assert_eq!(sched.pending(), 0);
        assert_eq!(sched.epoch(), epoch + 1);
        assert!(sched.advance(5.0).is_empty());
        // A stale ticket cancels nothing after reset.
        assert!(!sched.cancel(ticket));
    }

    #[test]
    fn test_stale_ticket_cannot_cancel_new_entry() {
        let mut sched = Scheduler::new();
        let stale = sched.schedule(1.0, Task::ClockTick);
        sched.clear();
        sched.schedule(1.0, Task::ClockTick);
        assert!(!sched.cancel(stale));
        assert_eq!(sched.advance(1.5), vec![Task::ClockTick]);
    }
}
