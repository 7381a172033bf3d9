//! Channel service — join/track/broadcast/part.
//!
//! DESIGN
//! ======
//! Presence snapshots go to every member on every membership change, the
//! member that changed included — the snapshot is the reconciliation point
//! every client rebuilds from. Broadcast fan-out excludes the sender: the
//! initiating client already applied its own mutation locally. Both paths
//! are fire-and-forget; a member whose queue is full simply misses the
//! frame and heals on the next snapshot (or not at all, for broadcasts —
//! that gap belongs to the protocol, not the relay).

use protocol::{Envelope, PresenceMeta, ServerMessage};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::state::{AppState, ChannelState, Member};

/// Register a connected socket on a channel.
pub async fn join(state: &AppState, channel: &str, client_id: Uuid, tx: mpsc::Sender<ServerMessage>) {
    let mut channels = state.channels.write().await;
    let channel_state = channels
        .entry(channel.to_owned())
        .or_insert_with(ChannelState::new);
    channel_state.members.insert(client_id, Member { tx, meta: None });
    channel_state.order.push(client_id);
    info!(%channel, %client_id, members = channel_state.members.len(), "client joined channel");
}

/// Store a member's tracked presence payload and resync everyone.
pub async fn track(state: &AppState, channel: &str, client_id: Uuid, meta: PresenceMeta) {
    let mut channels = state.channels.write().await;
    let Some(channel_state) = channels.get_mut(channel) else {
        return;
    };
    let Some(member) = channel_state.members.get_mut(&client_id) else {
        return;
    };
    member.meta = Some(meta);
    fan_presence_sync(channel_state);
}

/// Fan a broadcast envelope to every member except the sender.
pub async fn broadcast(state: &AppState, channel: &str, envelope: Envelope, exclude: Uuid) {
    let channels = state.channels.read().await;
    let Some(channel_state) = channels.get(channel) else {
        return;
    };
    for (client_id, member) in &channel_state.members {
        if *client_id == exclude {
            continue;
        }
        // Best-effort: if a member's queue is full, skip it.
        let _ = member
            .tx
            .try_send(ServerMessage::Broadcast { envelope: envelope.clone() });
    }
}

/// Deregister a socket. Remaining members get a fresh snapshot; an empty
/// channel is evicted.
pub async fn part(state: &AppState, channel: &str, client_id: Uuid) {
    let mut channels = state.channels.write().await;
    let Some(channel_state) = channels.get_mut(channel) else {
        return;
    };
    channel_state.members.remove(&client_id);
    channel_state.order.retain(|id| *id != client_id);
    info!(%channel, %client_id, remaining = channel_state.members.len(), "client left channel");

    if channel_state.members.is_empty() {
        channels.remove(channel);
        info!(%channel, "evicted empty channel");
    } else {
        fan_presence_sync(channel_state);
    }
}

/// Current tracked membership of a channel.
pub async fn snapshot(state: &AppState, channel: &str) -> Vec<PresenceMeta> {
    let channels = state.channels.read().await;
    channels
        .get(channel)
        .map(ChannelState::snapshot)
        .unwrap_or_default()
}

fn fan_presence_sync(channel_state: &ChannelState) {
    let members = channel_state.snapshot();
    for member in channel_state.members.values() {
        let _ = member
            .tx
            .try_send(ServerMessage::PresenceSync { members: members.clone() });
    }
}

#[cfg(test)]
#[path = "channel_test.rs"]
mod tests;
