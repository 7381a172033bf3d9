use super::*;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use protocol::{Envelope, Event, PresenceMeta};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_relay() -> String {
    let state = AppState::new();
    let app = crate::routes::app(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("ws://{addr}/ws/lunch")
}

async fn connect(url: &str) -> WsClient {
    let (ws, _) = connect_async(url).await.expect("connect");
    ws
}

async fn send(ws: &mut WsClient, msg: &ClientMessage) {
    let text = codec::encode_client(msg).expect("encode");
    ws.send(WsMessage::Text(text.into())).await.expect("send");
}

async fn recv(ws: &mut WsClient) -> ServerMessage {
    loop {
        let msg = timeout(Duration::from_millis(500), ws.next())
            .await
            .expect("receive timed out")
            .expect("socket closed")
            .expect("socket error");
        if let WsMessage::Text(text) = msg {
            return codec::decode_server(&text).expect("decode");
        }
    }
}

async fn assert_silent(ws: &mut WsClient) {
    assert!(
        timeout(Duration::from_millis(100), ws.next()).await.is_err(),
        "expected no message"
    );
}

fn meta(name: &str) -> PresenceMeta {
    PresenceMeta::new(Uuid::new_v4(), name, None, 1_000)
}

#[tokio::test]
async fn subscribed_arrives_first() {
    let url = spawn_relay().await;
    let mut ws = connect(&url).await;

    let msg = recv(&mut ws).await;
    assert_eq!(msg, ServerMessage::Subscribed { channel: "lunch".into() });
}

#[tokio::test]
async fn track_syncs_every_member_and_broadcast_skips_the_sender() {
    let url = spawn_relay().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;
    recv(&mut a).await; // subscribed
    recv(&mut b).await; // subscribed

    // A tracks: both sockets get the one-member snapshot.
    let meta_a = meta("a");
    send(&mut a, &ClientMessage::Track { meta: meta_a.clone() }).await;
    for ws in [&mut a, &mut b] {
        let ServerMessage::PresenceSync { members } = recv(ws).await else {
            panic!("expected presence_sync");
        };
        assert_eq!(members, vec![meta_a.clone()]);
    }

    // B tracks: both snapshots now carry A then B, join order.
    let meta_b = meta("b");
    send(&mut b, &ClientMessage::Track { meta: meta_b.clone() }).await;
    for ws in [&mut a, &mut b] {
        let ServerMessage::PresenceSync { members } = recv(ws).await else {
            panic!("expected presence_sync");
        };
        assert_eq!(members, vec![meta_a.clone(), meta_b.clone()]);
    }

    // A broadcast reaches B only.
    let envelope = Envelope::new(meta_a.participant_id, Event::SpinStarted {});
    send(&mut a, &ClientMessage::Broadcast { envelope: envelope.clone() }).await;
    assert_eq!(recv(&mut b).await, ServerMessage::Broadcast { envelope });
    assert_silent(&mut a).await;
}

#[tokio::test]
async fn departure_resyncs_the_remainder() {
    let url = spawn_relay().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;
    recv(&mut a).await;
    recv(&mut b).await;

    let meta_a = meta("a");
    let meta_b = meta("b");
    send(&mut a, &ClientMessage::Track { meta: meta_a.clone() }).await;
    send(&mut b, &ClientMessage::Track { meta: meta_b.clone() }).await;
    // Drain the two track-time syncs on A.
    recv(&mut a).await;
    recv(&mut a).await;

    send(&mut b, &ClientMessage::Leave).await;

    let ServerMessage::PresenceSync { members } = recv(&mut a).await else {
        panic!("expected presence_sync");
    };
    assert_eq!(members, vec![meta_a]);
}

#[tokio::test]
async fn malformed_input_is_dropped_not_fatal() {
    let url = spawn_relay().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;
    recv(&mut a).await;
    recv(&mut b).await;

    a.send(WsMessage::Text("{\"type\":\"mystery\"}".into()))
        .await
        .expect("send");

    // The connection survives: a well-formed broadcast still flows.
    let envelope = Envelope::new(Uuid::new_v4(), Event::ParticipantAdded { name: "Kimbap".into() });
    send(&mut a, &ClientMessage::Broadcast { envelope: envelope.clone() }).await;
    assert_eq!(recv(&mut b).await, ServerMessage::Broadcast { envelope });
}

#[tokio::test]
async fn ordering_is_preserved_per_sender() {
    let url = spawn_relay().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;
    recv(&mut a).await;
    recv(&mut b).await;

    let sender = Uuid::new_v4();
    let first = Envelope::new(sender, Event::SpinStarted {});
    let second = Envelope::new(sender, Event::SpinStopped { target_index: 4 });
    send(&mut a, &ClientMessage::Broadcast { envelope: first.clone() }).await;
    send(&mut a, &ClientMessage::Broadcast { envelope: second.clone() }).await;

    assert_eq!(recv(&mut b).await, ServerMessage::Broadcast { envelope: first });
    assert_eq!(recv(&mut b).await, ServerMessage::Broadcast { envelope: second });
}
