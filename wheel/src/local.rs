//! In-process hub transport.
//!
//! DESIGN
//! ======
//! A single-channel, single-threaded stand-in for the relay with the same
//! observable semantics: a full presence snapshot to every member on every
//! membership change, broadcast fan-out that skips the sender, and strict
//! per-sender FIFO delivery. Tests use it to run several replicas against
//! one hub and drive delivery deterministically; the channel name passed to
//! `join` is accepted and ignored.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use protocol::{Envelope, ParticipantId, PresenceMeta};

use crate::session::{Inbound, Transport, TransportError};

#[derive(Default)]
struct HubInner {
    /// Join order; presence snapshots list members in this order.
    order: Vec<ParticipantId>,
    metas: HashMap<ParticipantId, PresenceMeta>,
    queues: HashMap<ParticipantId, VecDeque<Inbound>>,
}

impl HubInner {
    fn snapshot(&self) -> Vec<PresenceMeta> {
        self.order
            .iter()
            .filter_map(|id| self.metas.get(id).cloned())
            .collect()
    }

    fn fan_presence_sync(&mut self) {
        let snapshot = self.snapshot();
        for queue in self.queues.values_mut() {
            queue.push_back(Inbound::PresenceSync(snapshot.clone()));
        }
    }
}

/// The shared hub; clone handles freely, they all point at one channel.
#[derive(Clone, Default)]
pub struct LocalHub {
    inner: Rc<RefCell<HubInner>>,
}

impl LocalHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport endpoint for the given participant.
    #[must_use]
    pub fn transport(&self, id: ParticipantId) -> LocalTransport {
        LocalTransport { inner: Rc::clone(&self.inner), id, joined: false }
    }

    /// Number of members currently joined (tracked or not).
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.inner.borrow().queues.len()
    }
}

/// One member's endpoint on a [`LocalHub`].
pub struct LocalTransport {
    inner: Rc<RefCell<HubInner>>,
    id: ParticipantId,
    joined: bool,
}

impl Transport for LocalTransport {
    fn join(&mut self, _channel: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.borrow_mut();
        if self.joined {
            return Err(TransportError::Io("already joined".into()));
        }
        self.joined = true;
        inner.order.push(self.id);
        let queue = inner.queues.entry(self.id).or_default();
        // The subscribe confirmation is queued, not immediate: the member
        // only learns of it on its next poll, like a real handshake.
        queue.push_back(Inbound::Subscribed);
        Ok(())
    }

    fn track(&mut self, meta: &PresenceMeta) -> Result<(), TransportError> {
        if !self.joined {
            return Err(TransportError::Closed);
        }
        let mut inner = self.inner.borrow_mut();
        inner.metas.insert(self.id, meta.clone());
        inner.fan_presence_sync();
        Ok(())
    }

    fn send(&mut self, envelope: Envelope) -> Result<(), TransportError> {
        if !self.joined {
            return Err(TransportError::Closed);
        }
        let mut inner = self.inner.borrow_mut();
        let sender = self.id;
        for (member, queue) in &mut inner.queues {
            if *member == sender {
                continue;
            }
            queue.push_back(Inbound::Broadcast(envelope.clone()));
        }
        Ok(())
    }

    fn try_recv(&mut self) -> Option<Inbound> {
        self.inner
            .borrow_mut()
            .queues
            .get_mut(&self.id)?
            .pop_front()
    }

    fn leave(&mut self) {
        if !self.joined {
            return;
        }
        self.joined = false;
        let mut inner = self.inner.borrow_mut();
        inner.order.retain(|id| *id != self.id);
        inner.metas.remove(&self.id);
        inner.queues.remove(&self.id);
        inner.fan_presence_sync();
    }
}

#[cfg(test)]
#[path = "local_test.rs"]
mod tests;
