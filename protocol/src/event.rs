//! The closed broadcast event vocabulary.
//!
//! DESIGN
//! ======
//! Every application-level broadcast is one of these variants. The tag and
//! payload field names are the wire contract; an unknown tag or a malformed
//! payload fails decoding at the boundary instead of flowing into reducers.

use serde::{Deserialize, Serialize};

use crate::ParticipantId;

/// A broadcast event as it travels between channel members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum Event {
    /// Ephemeral pointer position, percent of the shared container.
    /// Last write wins; values outside [0, 100] are carried as-is.
    #[serde(rename_all = "camelCase")]
    CursorMove {
        participant_id: ParticipantId,
        x: f64,
        y: f64,
    },
    /// Append a display name to the shared wheel roster.
    ParticipantAdded { name: String },
    /// Remove the first value match from the shared wheel roster.
    ParticipantRemoved { name: String },
    /// Every client enters the Spinning phase.
    SpinStarted {},
    /// Every client enters the Slowing phase with a shared stopping point.
    /// `target_index` is at least one roster length, so the winner is
    /// `target_index % roster_len` and the extra turns are `target_index /
    /// roster_len`. Receivers take it verbatim, never recompute.
    #[serde(rename_all = "camelCase")]
    SpinStopped { target_index: u64 },
}

impl Event {
    /// Wire tag of this event, for logging and dispatch.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CursorMove { .. } => "cursor_move",
            Self::ParticipantAdded { .. } => "participant_added",
            Self::ParticipantRemoved { .. } => "participant_removed",
            Self::SpinStarted {} => "spin_started",
            Self::SpinStopped { .. } => "spin_stopped",
        }
    }

    /// Cursor traffic is high-frequency noise; callers use this to keep it
    /// out of info-level logs.
    #[must_use]
    pub fn is_cursor(&self) -> bool {
        matches!(self, Self::CursorMove { .. })
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
