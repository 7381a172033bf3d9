//! WebSocket handler — presence tracking and broadcast fan-out.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID and enters a `select!` loop:
//! - Incoming client messages → decode + dispatch (track / broadcast / leave)
//! - Queued messages from channel peers → forward to the socket
//!
//! The relay validates shape at the boundary and otherwise never inspects
//! an envelope: broadcast is fan-out, presence is snapshot fan-out, and
//! that is the whole contract.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register member → send `subscribed`
//! 2. Client tracks → snapshot to every member
//! 3. Client broadcasts → envelope to every member but the sender
//! 4. Close or `leave` → deregister → snapshot to the remainder

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use protocol::{ClientMessage, ServerMessage, codec};

use crate::channel;
use crate::state::AppState;

pub async fn handle_ws(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state, channel))
}

async fn run_ws(mut socket: WebSocket, state: AppState, channel_name: String) {
    let client_id = Uuid::new_v4();

    // Per-connection queue for messages fanned in from channel peers.
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(256);
    channel::join(&state, &channel_name, client_id, tx).await;

    let subscribed = ServerMessage::Subscribed { channel: channel_name.clone() };
    if send_message(&mut socket, &subscribed).await.is_err() {
        channel::part(&state, &channel_name, client_id).await;
        return;
    }

    info!(channel = %channel_name, %client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        if handle_text(&state, &channel_name, client_id, &text).await.is_break() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(out) = rx.recv() => {
                if send_message(&mut socket, &out).await.is_err() {
                    break;
                }
            }
        }
    }

    channel::part(&state, &channel_name, client_id).await;
    info!(channel = %channel_name, %client_id, "ws: client disconnected");
}

/// Decode and dispatch one inbound text frame. Malformed input is logged
/// and dropped — never partially applied, never echoed back.
async fn handle_text(
    state: &AppState,
    channel_name: &str,
    client_id: Uuid,
    text: &str,
) -> std::ops::ControlFlow<()> {
    let msg = match codec::decode_client(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: rejected inbound message");
            return std::ops::ControlFlow::Continue(());
        }
    };

    match msg {
        ClientMessage::Track { meta } => {
            info!(channel = %channel_name, %client_id, participant = %meta.participant_id, "ws: presence track");
            channel::track(state, channel_name, client_id, meta).await;
        }
        ClientMessage::Broadcast { envelope } => {
            if !envelope.event.is_cursor() {
                info!(channel = %channel_name, %client_id, event = envelope.event.name(), "ws: broadcast");
            }
            channel::broadcast(state, channel_name, envelope, client_id).await;
        }
        ClientMessage::Leave => return std::ops::ControlFlow::Break(()),
    }
    std::ops::ControlFlow::Continue(())
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<(), ()> {
    let json = match codec::encode_server(msg) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize message");
            return Err(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
