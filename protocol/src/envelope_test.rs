use super::*;

#[test]
fn new_stamps_sender_and_timestamp() {
    let sender = Uuid::new_v4();
    let env = Envelope::new(sender, Event::SpinStarted {});
    assert_eq!(env.sender, sender);
    assert!(env.ts > 0);
}

#[test]
fn event_fields_flatten_into_the_envelope() {
    let env = Envelope::new(Uuid::new_v4(), Event::SpinStopped { target_index: 7 });
    let json: serde_json::Value = serde_json::to_value(&env).expect("serialize");

    // The event tag and payload sit beside id/sender/ts, not nested twice.
    assert_eq!(json["event"], "spin_stopped");
    assert_eq!(json["payload"]["targetIndex"], 7);
    assert_eq!(json["sender"], env.sender.to_string());
}

#[test]
fn json_round_trip() {
    let env = Envelope::new(
        Uuid::new_v4(),
        Event::CursorMove { participant_id: Uuid::new_v4(), x: 42.0, y: -3.5 },
    );
    let json = serde_json::to_string(&env).expect("serialize");
    let restored: Envelope = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, env);
}

#[test]
fn envelope_with_unknown_event_is_rejected() {
    let text = format!(
        r#"{{"id":"{}","sender":"{}","ts":1,"event":"mystery","payload":{{}}}}"#,
        Uuid::new_v4(),
        Uuid::new_v4()
    );
    assert!(serde_json::from_str::<Envelope>(&text).is_err());
}
