//! WebSocket adapter for the core [`Transport`] trait.
//!
//! The sync core is polled and single-threaded; the socket is async. Two
//! background tasks bridge the gap: a writer draining an outbound queue and
//! a reader mapping relay messages into the core's inbound items. The core
//! side never blocks — `try_recv` pops whatever the reader has queued.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use protocol::{ClientMessage, Envelope, PresenceMeta, ServerMessage, codec};
use wheel::{Inbound, Transport, TransportError};

pub struct WsTransport {
    out: mpsc::UnboundedSender<ClientMessage>,
    inbox: mpsc::UnboundedReceiver<Inbound>,
    connected: bool,
}

impl WsTransport {
    /// Connect to the relay; the channel is part of the URL path.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the websocket handshake fails.
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let (ws, _) = connect_async(url)
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;
        let (mut ws_write, mut ws_read) = ws.split();

        let (out, mut out_rx) = mpsc::unbounded_channel::<ClientMessage>();
        let (inbox_tx, inbox) = mpsc::unbounded_channel::<Inbound>();

        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let Ok(text) = codec::encode_client(&msg) else {
                    continue;
                };
                if ws_write.send(WsMessage::Text(text.into())).await.is_err() {
                    break;
                }
            }
        });

        tokio::spawn(async move {
            while let Some(msg) = ws_read.next().await {
                let text = match msg {
                    Ok(WsMessage::Text(text)) => text,
                    Ok(_) => continue,
                    Err(_) => break,
                };
                let Ok(server_msg) = codec::decode_server(&text) else {
                    continue;
                };
                let inbound = match server_msg {
                    ServerMessage::Subscribed { .. } => Inbound::Subscribed,
                    ServerMessage::PresenceSync { members } => Inbound::PresenceSync(members),
                    ServerMessage::Broadcast { envelope } => Inbound::Broadcast(envelope),
                };
                if inbox_tx.send(inbound).is_err() {
                    break;
                }
            }
            let _ = inbox_tx.send(Inbound::Disconnected);
        });

        Ok(Self { out, inbox, connected: true })
    }

    fn push(&mut self, msg: ClientMessage) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::Closed);
        }
        self.out.send(msg).map_err(|_| TransportError::Closed)
    }
}

impl Transport for WsTransport {
    fn join(&mut self, _channel: &str) -> Result<(), TransportError> {
        // The connection already addresses the channel; subscription is
        // confirmed by the relay's first message.
        if self.connected {
            Ok(())
        } else {
            Err(TransportError::Closed)
        }
    }

    fn track(&mut self, meta: &PresenceMeta) -> Result<(), TransportError> {
        self.push(ClientMessage::Track { meta: meta.clone() })
    }

    fn send(&mut self, envelope: Envelope) -> Result<(), TransportError> {
        self.push(ClientMessage::Broadcast { envelope })
    }

    fn try_recv(&mut self) -> Option<Inbound> {
        self.inbox.try_recv().ok()
    }

    fn leave(&mut self) {
        let _ = self.push(ClientMessage::Leave);
        self.connected = false;
    }
}
