//! Envelope — the unit of broadcast delivery.
//!
//! The envelope stamps an event with its sender and creation time. `ts` is
//! incidental transport metadata; only `sender` and `event` carry protocol
//! meaning. Receivers drop envelopes whose sender equals their own id.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Event, ParticipantId};

/// A single broadcast message on the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: Uuid,
    pub sender: ParticipantId,
    /// Milliseconds since the Unix epoch, set at construction.
    pub ts: i64,
    #[serde(flatten)]
    pub event: Event,
}

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

impl Envelope {
    /// Wrap an event for broadcast from the given sender.
    #[must_use]
    pub fn new(sender: ParticipantId, event: Event) -> Self {
        Self { id: Uuid::new_v4(), sender, ts: now_ms(), event }
    }
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
