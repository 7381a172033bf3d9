//! The per-client replica.
//!
//! DESIGN
//! ======
//! `WheelClient` wires the session, both rosters, the spin machine and the
//! scheduler into one unit with the shape the protocol assumes: every
//! mutation comes from a local input, a timer firing, or an inbound
//! message, applied on one thread. Local inputs mutate first and publish
//! second (the publish may be silently dropped before subscribe); inbound
//! broadcasts run through the same reducers minus the publish.

use rand::Rng;

use protocol::{Event, ParticipantId, PresenceMeta};

use crate::cursor::{relative_position, CursorPosition, CursorRoster};
use crate::roster::WheelRoster;
use crate::scheduler::{Scheduler, Task, TaskId};
use crate::session::{ChannelSession, SessionError, SessionEvent, Transport};
use crate::spin::{Resolution, SpinMachine, SpinPhase, TimerCommand, Transition};

pub struct WheelClient<T: Transport> {
    session: ChannelSession<T>,
    wheel: WheelRoster,
    cursors: CursorRoster,
    spin: SpinMachine,
    scheduler: Scheduler,
    tick_task: Option<TaskId>,
    resolve_task: Option<TaskId>,
    tick_interval_ms: u64,
    local_cursor: CursorPosition,
}

impl<T: Transport> WheelClient<T> {
    /// Join `channel` and build an empty replica around the session.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`] from the join — notably the missing
    /// identity abort, which has no retry.
    pub fn join(channel: &str, meta: PresenceMeta, transport: T) -> Result<Self, SessionError> {
        let self_id = meta.participant_id;
        let session = ChannelSession::join(channel, meta, transport)?;
        Ok(Self {
            session,
            wheel: WheelRoster::new(),
            cursors: CursorRoster::new(self_id),
            spin: SpinMachine::new(),
            scheduler: Scheduler::new(),
            tick_task: None,
            resolve_task: None,
            tick_interval_ms: crate::consts::BASE_TICK_MS,
            local_cursor: CursorPosition::default(),
        })
    }

    // =========================================================================
    // LOCAL INPUT
    // =========================================================================

    /// Add a participant from local input. Returns whether the roster grew.
    pub fn add_participant(&mut self, name: &str) -> bool {
        let Some(event) = self.wheel.add_local(name) else {
            return false;
        };
        self.session.publish(event);
        true
    }

    /// Remove the participant at `index`. Returns whether anything changed.
    pub fn remove_participant(&mut self, index: usize) -> bool {
        let Some(event) = self.wheel.remove_local(index) else {
            return false;
        };
        self.session.publish(event);
        true
    }

    /// Local "start" press. No-op on an empty roster or outside Idle.
    pub fn start_spin(&mut self) -> bool {
        let Some(transition) = self.spin.start_local(self.wheel.len()) else {
            return false;
        };
        self.apply_transition(transition);
        true
    }

    /// Local "stop" press. No-op outside Spinning; the drawn stopping point
    /// is broadcast so every replica adopts it verbatim.
    pub fn stop_spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let Some(transition) = self.spin.stop_local(rng, self.wheel.len()) else {
            return false;
        };
        self.apply_transition(transition);
        true
    }

    /// Sample the local pointer against the shared container and broadcast
    /// it (once subscribed). Returns the derived percentage position.
    pub fn move_cursor(&mut self, px: f64, py: f64, width: f64, height: f64) -> CursorPosition {
        let position = relative_position(px, py, width, height);
        self.local_cursor = position;
        self.session.publish(Event::CursorMove {
            participant_id: self.session.participant_id(),
            x: position.x,
            y: position.y,
        });
        position
    }

    // =========================================================================
    // INBOUND + TIME
    // =========================================================================

    /// Drain the transport and run every queued message through the
    /// reducers.
    pub fn poll(&mut self) {
        for event in self.session.pump() {
            match event {
                SessionEvent::PresenceSync(members) => self.cursors.apply_sync(&members),
                SessionEvent::Broadcast(envelope) => self.apply_remote(&envelope.event),
                SessionEvent::Disconnected => {
                    // No retry and no re-sync; the replica keeps working
                    // with single-client effects.
                }
            }
        }
    }

    /// Move the replica clock forward and fire due timers.
    pub fn advance_to(&mut self, now_ms: u64) {
        for task in self.scheduler.advance_to(now_ms) {
            match task {
                Task::Tick => {
                    if self.spin.phase() == SpinPhase::Spinning {
                        self.spin.tick();
                        self.tick_task =
                            Some(self.scheduler.schedule(self.tick_interval_ms, Task::Tick));
                    } else {
                        self.tick_task = None;
                    }
                }
                Task::Resolve { cycle } => {
                    self.resolve_task = None;
                    match self.spin.resolve(cycle, self.wheel.entries()) {
                        Resolution::Settled { winner } => {
                            tracing::info!(winner = winner.as_deref().unwrap_or("-"), "spin settled");
                        }
                        Resolution::Stale => {}
                    }
                }
            }
        }
    }

    /// Earliest pending timer deadline, for drivers that sleep in between.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    /// Leave the channel and cancel every pending timer so nothing mutates
    /// state after teardown.
    pub fn leave(&mut self) {
        self.session.leave();
        self.scheduler.clear();
        self.tick_task = None;
        self.resolve_task = None;
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    #[must_use]
    pub fn participant_id(&self) -> ParticipantId {
        self.session.participant_id()
    }

    #[must_use]
    pub fn participants(&self) -> &[String] {
        self.wheel.entries()
    }

    #[must_use]
    pub fn cursors(&self) -> &CursorRoster {
        &self.cursors
    }

    #[must_use]
    pub fn local_cursor(&self) -> CursorPosition {
        self.local_cursor
    }

    #[must_use]
    pub fn phase(&self) -> SpinPhase {
        self.spin.phase()
    }

    #[must_use]
    pub fn current_index(&self) -> u64 {
        self.spin.current_index()
    }

    #[must_use]
    pub fn target_index(&self) -> Option<u64> {
        self.spin.target_index()
    }

    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        self.spin.winner()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.session.is_ready()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    // =========================================================================
    // REDUCERS
    // =========================================================================

    fn apply_remote(&mut self, event: &Event) {
        match event {
            Event::CursorMove { participant_id, x, y } => {
                self.cursors.apply_cursor_move(*participant_id, *x, *y);
            }
            Event::ParticipantAdded { .. } | Event::ParticipantRemoved { .. } => {
                self.wheel.apply(event);
            }
            Event::SpinStarted {} => {
                if let Some(transition) = self.spin.start_remote() {
                    self.apply_transition(transition);
                }
            }
            Event::SpinStopped { target_index } => {
                if let Some(transition) = self.spin.stop_remote(*target_index) {
                    self.apply_transition(transition);
                }
            }
        }
    }

    fn apply_transition(&mut self, transition: Transition) {
        if let Some(event) = transition.publish {
            self.session.publish(event);
        }
        for command in transition.timers {
            match command {
                TimerCommand::StartTicking { interval_ms } => {
                    if let Some(id) = self.tick_task.take() {
                        self.scheduler.cancel(id);
                    }
                    self.tick_interval_ms = interval_ms;
                    self.tick_task = Some(self.scheduler.schedule(interval_ms, Task::Tick));
                }
                TimerCommand::StopTicking => {
                    if let Some(id) = self.tick_task.take() {
                        self.scheduler.cancel(id);
                    }
                }
                TimerCommand::ScheduleResolve { cycle, after_ms } => {
                    if let Some(id) = self.resolve_task.take() {
                        self.scheduler.cancel(id);
                    }
                    self.resolve_task = Some(self.scheduler.schedule(after_ms, Task::Resolve { cycle }));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
