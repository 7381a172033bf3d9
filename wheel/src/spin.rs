//! The Idle/Spinning/Slowing spin state machine.
//!
//! DESIGN
//! ======
//! The machine is a pure reducer: transitions mutate plain state and hand
//! back a [`Transition`] naming the event to broadcast (for locally
//! initiated transitions only) and the timer work the owner must apply.
//! The machine never touches a clock or a socket, so every property is
//! unit-testable without either.
//!
//! Timer tasks carry the spin-cycle generation current at scheduling time;
//! [`SpinMachine::resolve`] rejects a stale generation, which is what makes
//! a superseded deceleration task harmless no matter when it fires.

use rand::Rng;

use protocol::Event;

use crate::angle::winner_index;
use crate::consts::{BASE_TICK_MS, SLOWING_MS};

/// Exactly one phase holds at any time per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning,
    Slowing,
}

/// Timer work a transition asks its owner to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Begin the local animation tick at the given interval.
    StartTicking { interval_ms: u64 },
    /// Cancel the local animation tick.
    StopTicking,
    /// Arrange for [`SpinMachine::resolve`] to be called with `cycle` after
    /// `after_ms`, cancelling any resolution pending from an earlier cycle.
    ScheduleResolve { cycle: u64, after_ms: u64 },
}

/// Outcome of a state transition: what to broadcast, what to (re)schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub publish: Option<Event>,
    pub timers: Vec<TimerCommand>,
}

/// Outcome of a deceleration timer firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The task belonged to a superseded cycle (or the machine already
    /// left Slowing); nothing happened.
    Stale,
    /// The machine settled to Idle. `None` means the roster drained before
    /// resolution — no winner rather than a crash.
    Settled { winner: Option<String> },
}

/// Per-client replica of the shared spin lifecycle.
#[derive(Debug, Clone, Default)]
pub struct SpinMachine {
    phase: SpinPhase,
    current_index: u64,
    target_index: Option<u64>,
    winner: Option<String>,
    cycle: u64,
    tick_ms: u64,
}

impl SpinMachine {
    #[must_use]
    pub fn new() -> Self {
        Self { tick_ms: BASE_TICK_MS, ..Self::default() }
    }

    #[must_use]
    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    /// Local animation counter; advanced per tick, never transmitted.
    #[must_use]
    pub fn current_index(&self) -> u64 {
        self.current_index
    }

    /// The shared stopping point, set once per cycle. Meaningful only from
    /// the moment Slowing begins.
    #[must_use]
    pub fn target_index(&self) -> Option<u64> {
        self.target_index
    }

    /// The settled winner. Meaningful only in Idle after a completed cycle.
    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Local "start" action. No-op unless Idle with a non-empty roster;
    /// pressing start while already Spinning changes nothing and publishes
    /// nothing.
    pub fn start_local(&mut self, roster_len: usize) -> Option<Transition> {
        if roster_len == 0 || self.phase != SpinPhase::Idle {
            return None;
        }
        let mut transition = self.begin_spinning();
        transition.publish = Some(Event::SpinStarted {});
        Some(transition)
    }

    /// Remote `spin_started`. Same transition as a local start, nothing
    /// published back.
    pub fn start_remote(&mut self) -> Option<Transition> {
        if self.phase != SpinPhase::Idle {
            return None;
        }
        Some(self.begin_spinning())
    }

    /// Local "stop" action. Only the client that stops first draws the
    /// stopping point: a uniform roster position plus one full roster
    /// length, so downstream angle math always moves forward. No-op unless
    /// Spinning; a stop racing another client's stop loses by the Slowing
    /// guard on whichever broadcast lands second.
    pub fn stop_local<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        roster_len: usize,
    ) -> Option<Transition> {
        if self.phase != SpinPhase::Spinning || roster_len == 0 {
            return None;
        }
        let len = roster_len as u64;
        let target_index = len + rng.random_range(0..len);
        let mut transition = self.enter_slowing(target_index);
        transition.publish = Some(Event::SpinStopped { target_index });
        Some(transition)
    }

    /// Remote `spin_stopped`. The transmitted target is adopted verbatim —
    /// recomputing it here would land different clients on different
    /// winners. Ignored outside Spinning (duplicate tolerance).
    pub fn stop_remote(&mut self, target_index: u64) -> Option<Transition> {
        if self.phase != SpinPhase::Spinning {
            return None;
        }
        Some(self.enter_slowing(target_index))
    }

    /// One local animation tick. Advances the display counter only while
    /// Spinning; the counter has no cross-client meaning.
    pub fn tick(&mut self) -> u64 {
        if self.phase == SpinPhase::Spinning {
            self.current_index += 1;
        }
        self.current_index
    }

    /// Deceleration elapsed. Settles Slowing→Idle and computes the winner
    /// against the roster as it exists now; a task from a superseded cycle
    /// is reported [`Resolution::Stale`] and changes nothing.
    pub fn resolve(&mut self, cycle: u64, roster: &[String]) -> Resolution {
        if cycle != self.cycle || self.phase != SpinPhase::Slowing {
            return Resolution::Stale;
        }
        self.phase = SpinPhase::Idle;
        self.winner = self
            .target_index
            .and_then(|target| winner_index(target, roster.len()))
            .map(|index| roster[index].clone());
        Resolution::Settled { winner: self.winner.clone() }
    }

    fn begin_spinning(&mut self) -> Transition {
        self.phase = SpinPhase::Spinning;
        self.winner = None;
        self.target_index = None;
        self.tick_ms = BASE_TICK_MS;
        self.cycle += 1;
        Transition {
            publish: None,
            timers: vec![TimerCommand::StartTicking { interval_ms: self.tick_ms }],
        }
    }

    fn enter_slowing(&mut self, target_index: u64) -> Transition {
        self.phase = SpinPhase::Slowing;
        self.target_index = Some(target_index);
        Transition {
            publish: None,
            timers: vec![
                TimerCommand::StopTicking,
                TimerCommand::ScheduleResolve { cycle: self.cycle, after_ms: SLOWING_MS },
            ],
        }
    }
}

#[cfg(test)]
#[path = "spin_test.rs"]
mod tests;
