use super::*;

use protocol::Event;
use uuid::Uuid;

fn meta(id: Uuid, name: &str) -> PresenceMeta {
    PresenceMeta::new(id, name, None, 1_000)
}

fn drain(transport: &mut LocalTransport) -> Vec<Inbound> {
    std::iter::from_fn(|| transport.try_recv()).collect()
}

#[test]
fn join_queues_a_subscribe_confirmation() {
    let hub = LocalHub::new();
    let id = Uuid::new_v4();
    let mut t = hub.transport(id);

    t.join("lunch").expect("join");
    assert_eq!(drain(&mut t), vec![Inbound::Subscribed]);
}

#[test]
fn double_join_is_rejected() {
    let hub = LocalHub::new();
    let mut t = hub.transport(Uuid::new_v4());
    t.join("lunch").expect("join");
    assert!(t.join("lunch").is_err());
}

#[test]
fn track_fans_a_snapshot_to_every_member() {
    let hub = LocalHub::new();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut ta = hub.transport(a);
    let mut tb = hub.transport(b);
    ta.join("lunch").expect("join a");
    tb.join("lunch").expect("join b");
    drain(&mut ta);
    drain(&mut tb);

    ta.track(&meta(a, "a")).expect("track a");

    for t in [&mut ta, &mut tb] {
        let inbound = drain(t);
        assert_eq!(inbound, vec![Inbound::PresenceSync(vec![meta(a, "a")])]);
    }
}

#[test]
fn broadcast_skips_the_sender() {
    let hub = LocalHub::new();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut ta = hub.transport(a);
    let mut tb = hub.transport(b);
    ta.join("lunch").expect("join a");
    tb.join("lunch").expect("join b");
    drain(&mut ta);
    drain(&mut tb);

    let envelope = Envelope::new(a, Event::SpinStarted {});
    ta.send(envelope.clone()).expect("send");

    assert!(drain(&mut ta).is_empty());
    assert_eq!(drain(&mut tb), vec![Inbound::Broadcast(envelope)]);
}

#[test]
fn per_sender_delivery_preserves_send_order() {
    let hub = LocalHub::new();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut ta = hub.transport(a);
    let mut tb = hub.transport(b);
    ta.join("lunch").expect("join a");
    tb.join("lunch").expect("join b");
    drain(&mut tb);

    let first = Envelope::new(a, Event::ParticipantAdded { name: "one".into() });
    let second = Envelope::new(a, Event::ParticipantAdded { name: "two".into() });
    ta.send(first.clone()).expect("send");
    ta.send(second.clone()).expect("send");

    assert_eq!(
        drain(&mut tb),
        vec![Inbound::Broadcast(first), Inbound::Broadcast(second)]
    );
}

#[test]
fn leave_removes_the_member_and_resyncs_the_rest() {
    let hub = LocalHub::new();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut ta = hub.transport(a);
    let mut tb = hub.transport(b);
    ta.join("lunch").expect("join a");
    tb.join("lunch").expect("join b");
    ta.track(&meta(a, "a")).expect("track a");
    tb.track(&meta(b, "b")).expect("track b");
    drain(&mut ta);
    drain(&mut tb);

    ta.leave();

    assert_eq!(hub.member_count(), 1);
    assert_eq!(drain(&mut tb), vec![Inbound::PresenceSync(vec![meta(b, "b")])]);
}

#[test]
fn send_before_join_is_a_transport_error() {
    let hub = LocalHub::new();
    let a = Uuid::new_v4();
    let mut t = hub.transport(a);
    assert!(t.send(Envelope::new(a, Event::SpinStarted {})).is_err());
    assert!(t.track(&meta(a, "a")).is_err());
}
