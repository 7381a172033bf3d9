//! Multi-client synchronization core for the shared wheel.
//!
//! ARCHITECTURE
//! ============
//! There is no server-side authority: every client owns a full replica of
//! the roster and spin state, and "sharing" is each replica applying the
//! same deterministic reducers to the same broadcast stream. The modules
//! split by concern:
//!
//! - [`session`] — readiness-gated publish/subscribe over a [`Transport`].
//! - [`roster`] — the broadcast-incremental wheel roster (ordered names).
//! - [`cursor`] — the presence-authoritative cursor roster.
//! - [`spin`] — the Idle/Spinning/Slowing state machine.
//! - [`angle`] — pure winner-convergence math.
//! - [`scheduler`] — single-threaded cancellable delayed tasks.
//! - [`client`] — the per-client replica wiring all of the above together.
//! - [`local`] — an in-process hub transport for deterministic tests.
//!
//! Everything here is single-threaded and runtime-free; the only
//! asynchronous boundary is the transport, which callers drive by polling.

pub mod angle;
pub mod client;
pub mod consts;
pub mod cursor;
pub mod local;
pub mod roster;
pub mod scheduler;
pub mod session;
pub mod spin;

pub use client::WheelClient;
pub use cursor::{CursorPosition, CursorRoster, ParticipantRecord};
pub use local::{LocalHub, LocalTransport};
pub use roster::WheelRoster;
pub use scheduler::{Scheduler, Task, TaskId};
pub use session::{ChannelSession, Inbound, SessionError, SessionEvent, Transport, TransportError};
pub use spin::{Resolution, SpinMachine, SpinPhase, TimerCommand, Transition};
