use super::*;

fn roster_of(names: &[&str]) -> WheelRoster {
    let mut roster = WheelRoster::new();
    for name in names {
        roster.apply(&Event::ParticipantAdded { name: (*name).to_owned() });
    }
    roster
}

#[test]
fn local_add_trims_and_publishes() {
    let mut roster = WheelRoster::new();
    let event = roster.add_local("  Kimbap  ").expect("added");
    assert_eq!(event, Event::ParticipantAdded { name: "Kimbap".into() });
    assert_eq!(roster.entries(), ["Kimbap"]);
}

#[test]
fn local_add_refuses_empty_and_duplicate() {
    let mut roster = roster_of(&["Kimbap"]);
    assert!(roster.add_local("   ").is_none());
    assert!(roster.add_local("Kimbap").is_none());
    assert_eq!(roster.len(), 1);
}

#[test]
fn local_remove_is_by_index() {
    let mut roster = roster_of(&["Kimbap", "Bibimbap", "Ramen"]);
    let event = roster.remove_local(1).expect("removed");
    assert_eq!(event, Event::ParticipantRemoved { name: "Bibimbap".into() });
    assert_eq!(roster.entries(), ["Kimbap", "Ramen"]);
    assert!(roster.remove_local(5).is_none());
}

#[test]
fn remote_add_has_no_idempotence_guard() {
    // A replayed participant_added duplicates the entry; the protocol does
    // not deduplicate broadcasts.
    let mut roster = WheelRoster::new();
    let event = Event::ParticipantAdded { name: "Kimbap".into() };
    assert!(roster.apply(&event));
    assert!(roster.apply(&event));
    assert_eq!(roster.entries(), ["Kimbap", "Kimbap"]);
}

#[test]
fn remote_remove_takes_first_match_only() {
    let mut roster = roster_of(&["A", "A", "B"]);
    assert!(roster.apply(&Event::ParticipantRemoved { name: "A".into() }));
    assert_eq!(roster.entries(), ["A", "B"]);
}

#[test]
fn remote_remove_of_unknown_name_is_a_no_op() {
    let mut roster = roster_of(&["A"]);
    assert!(!roster.apply(&Event::ParticipantRemoved { name: "Z".into() }));
    assert_eq!(roster.entries(), ["A"]);
}

#[test]
fn non_roster_events_are_ignored() {
    let mut roster = roster_of(&["A"]);
    assert!(!roster.apply(&Event::SpinStarted {}));
    assert!(!roster.apply(&Event::SpinStopped { target_index: 3 }));
    assert_eq!(roster.entries(), ["A"]);
}

#[test]
fn order_is_append_order() {
    let roster = roster_of(&["Kimbap", "Bibimbap", "Ramen"]);
    assert_eq!(roster.get(0), Some("Kimbap"));
    assert_eq!(roster.get(1), Some("Bibimbap"));
    assert_eq!(roster.get(2), Some("Ramen"));
}
