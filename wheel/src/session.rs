//! Channel session — readiness-gated publish/subscribe over a transport.
//!
//! DESIGN
//! ======
//! The session layers the typed protocol over two raw transport
//! primitives: presence tracking and fire-and-forget broadcast. It owns one
//! policy worth spelling out: publishing before the channel reports
//! subscribed is a silent no-op, not an error. The first local mutations
//! (and the session's own initial track) happen before the handshake
//! completes, and they must produce single-client effects rather than be
//! queued and replayed as if they were remote changes.
//!
//! Failure semantics are deliberately thin: a transport disconnect drops
//! pending publishes, nothing is retried, and no application state is
//! re-synchronized on a later rejoin.

use protocol::{Envelope, Event, ParticipantId, PresenceMeta};

/// Transport-level failure.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("channel is closed")]
    Closed,
    #[error("transport failure: {0}")]
    Io(String),
}

/// Error joining a channel.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The identity provider produced no usable identity; the session
    /// refuses to join and the caller surfaces a "not connected" state.
    #[error("identity is not resolved; refusing to join")]
    MissingIdentity,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// What a transport hands the session when polled.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// The channel reached the subscribed state; publishes flow from here.
    Subscribed,
    /// Authoritative full-membership snapshot.
    PresenceSync(Vec<PresenceMeta>),
    /// A broadcast envelope from some member (possibly ourselves, if the
    /// transport echoes; the session filters those out).
    Broadcast(Envelope),
    /// The underlying connection is gone. Terminal.
    Disconnected,
}

/// The raw pub/sub primitives the session is built on. Implementations are
/// polled, never blocking — the core stays single-threaded.
pub trait Transport {
    /// Open the named channel. Subscription is confirmed asynchronously via
    /// [`Inbound::Subscribed`].
    ///
    /// # Errors
    ///
    /// Returns a transport error if the channel cannot be opened at all.
    fn join(&mut self, channel: &str) -> Result<(), TransportError>;

    /// Announce presence with the given payload.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the connection is gone.
    fn track(&mut self, meta: &PresenceMeta) -> Result<(), TransportError>;

    /// Fire-and-forget broadcast to all current members.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the connection is gone.
    fn send(&mut self, envelope: Envelope) -> Result<(), TransportError>;

    /// Next queued inbound item, if any.
    fn try_recv(&mut self) -> Option<Inbound>;

    /// Tear down presence and the connection. Remaining members observe the
    /// departure through their next presence snapshot.
    fn leave(&mut self);
}

/// Events the session surfaces to the caller's reducers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PresenceSync(Vec<PresenceMeta>),
    Broadcast(Envelope),
    Disconnected,
}

/// One logical connection to a named pub/sub topic.
#[derive(Debug)]
pub struct ChannelSession<T: Transport> {
    transport: T,
    meta: PresenceMeta,
    channel: String,
    ready: bool,
    connected: bool,
}

impl<T: Transport> ChannelSession<T> {
    /// Join `channel` as the participant described by `meta`.
    ///
    /// # Errors
    ///
    /// [`SessionError::MissingIdentity`] when the display name is empty
    /// (identity resolution failed upstream); transport errors pass
    /// through. No retry in either case.
    pub fn join(channel: &str, meta: PresenceMeta, mut transport: T) -> Result<Self, SessionError> {
        if meta.display_name.trim().is_empty() {
            return Err(SessionError::MissingIdentity);
        }
        transport.join(channel)?;
        Ok(Self {
            transport,
            meta,
            channel: channel.to_owned(),
            ready: false,
            connected: true,
        })
    }

    #[must_use]
    pub fn participant_id(&self) -> ParticipantId {
        self.meta.participant_id
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Whether the subscribe handshake has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The underlying transport, for callers that own endpoint state.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether the underlying connection is still up.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Broadcast an event to the channel. Before the subscribed state this
    /// is a silent no-op; the local mutation that prompted it still applies,
    /// producing a single-client effect until connectivity exists. Returns
    /// whether the event was actually handed to the transport.
    pub fn publish(&mut self, event: Event) -> bool {
        if !self.ready || !self.connected {
            tracing::debug!(event = event.name(), "publish dropped before subscribe");
            return false;
        }
        let envelope = Envelope::new(self.meta.participant_id, event);
        match self.transport.send(envelope) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "publish failed; dropping");
                false
            }
        }
    }

    /// Drain the transport and surface application-level events.
    ///
    /// Handles the handshake internally: `Subscribed` flips readiness and
    /// triggers the one-time presence track. Broadcast envelopes whose
    /// sender is the local participant are dropped here — self-recognition
    /// is an explicit id comparison, applied before any reducer runs.
    pub fn pump(&mut self) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        while let Some(inbound) = self.transport.try_recv() {
            match inbound {
                Inbound::Subscribed => {
                    self.ready = true;
                    if let Err(e) = self.transport.track(&self.meta) {
                        tracing::warn!(error = %e, "presence track failed");
                    }
                    tracing::info!(channel = %self.channel, "channel subscribed");
                }
                Inbound::PresenceSync(members) => {
                    out.push(SessionEvent::PresenceSync(members));
                }
                Inbound::Broadcast(envelope) => {
                    if envelope.sender == self.meta.participant_id {
                        continue;
                    }
                    out.push(SessionEvent::Broadcast(envelope));
                }
                Inbound::Disconnected => {
                    self.ready = false;
                    self.connected = false;
                    tracing::info!(channel = %self.channel, "channel disconnected");
                    out.push(SessionEvent::Disconnected);
                }
            }
        }
        out
    }

    /// Leave the channel. Pending publishes are gone; the caller is
    /// responsible for cancelling its own timers.
    pub fn leave(&mut self) {
        self.transport.leave();
        self.ready = false;
        self.connected = false;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
