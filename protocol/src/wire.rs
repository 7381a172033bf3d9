//! Client↔relay wire messages.
//!
//! DESIGN
//! ======
//! The relay speaks exactly three inbound and three outbound shapes. It
//! never inspects an envelope's payload — broadcast is fan-out only, which
//! is what keeps the relay free of application state.

use serde::{Deserialize, Serialize};

use crate::{Envelope, PresenceMeta};

/// Messages a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Announce membership with a profile payload. The relay answers with a
    /// `presence_sync` to every member, the sender included.
    Track { meta: PresenceMeta },
    /// Fan the envelope out to every other current member. Fire-and-forget:
    /// no acknowledgement, no retry.
    Broadcast { envelope: Envelope },
    /// Depart the channel. Closing the socket has the same effect.
    Leave,
}

/// Messages the relay sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First message after the socket opens; publishing before this point
    /// is a client-side no-op.
    Subscribed { channel: String },
    /// Authoritative full-membership snapshot, re-sent on every change.
    PresenceSync { members: Vec<PresenceMeta> },
    /// An envelope from another member.
    Broadcast { envelope: Envelope },
}

#[cfg(test)]
#[path = "wire_test.rs"]
mod tests;
