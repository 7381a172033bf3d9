//! Shared relay state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds a map of live channels; each channel knows only its connected
//! members and their tracked presence payloads. There is no application
//! state here at all — the relay never interprets an envelope.

use std::collections::HashMap;
use std::sync::Arc;

use protocol::{PresenceMeta, ServerMessage};
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

// =============================================================================
// MEMBER
// =============================================================================

/// One connected socket on a channel.
pub struct Member {
    /// Sender for outgoing messages; full queues drop frames (fire-and-forget).
    pub tx: mpsc::Sender<ServerMessage>,
    /// The presence payload this member tracked, if it has tracked yet.
    /// Untracked members receive traffic but do not appear in snapshots.
    pub meta: Option<PresenceMeta>,
}

// =============================================================================
// CHANNEL STATE
// =============================================================================

/// Per-channel live state, kept only while members are connected.
pub struct ChannelState {
    pub members: HashMap<Uuid, Member>,
    /// Join order; presence snapshots list members in this order.
    pub order: Vec<Uuid>,
}

impl ChannelState {
    #[must_use]
    pub fn new() -> Self {
        Self { members: HashMap::new(), order: Vec::new() }
    }

    /// Current membership snapshot: every tracked member, join order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PresenceMeta> {
        self.order
            .iter()
            .filter_map(|id| self.members.get(id))
            .filter_map(|member| member.meta.clone())
            .collect()
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared relay state, injected into Axum handlers via State extractor.
#[derive(Clone, Default)]
pub struct AppState {
    pub channels: Arc<RwLock<HashMap<String, ChannelState>>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
