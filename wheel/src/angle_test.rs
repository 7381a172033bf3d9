use super::*;

#[test]
fn winner_is_target_mod_len() {
    assert_eq!(winner_index(4, 3), Some(1));
    assert_eq!(winner_index(7, 3), Some(1));
    assert_eq!(winner_index(3, 3), Some(0));
    assert_eq!(winner_index(5, 1), Some(0));
}

#[test]
fn winner_is_invariant_under_extra_full_rotations() {
    for len in 1..=8_usize {
        for target in 0..24_u64 {
            let base = winner_index(target, len);
            for k in 1..=4_u64 {
                assert_eq!(winner_index(target + k * len as u64, len), base);
            }
        }
    }
}

#[test]
fn empty_roster_has_no_winner() {
    assert_eq!(winner_index(4, 0), None);
    assert_eq!(resting_angle(4, 0, 720.0), None);
}

#[test]
fn spin_angle_steps_per_tick() {
    assert!((spin_angle(0) - 0.0).abs() < f64::EPSILON);
    assert!((spin_angle(1) - 36.0).abs() < f64::EPSILON);
    assert!((spin_angle(10) - 360.0).abs() < f64::EPSILON);
}

#[test]
fn resting_angle_is_forward_only() {
    for last in [0.0, 1.0, 123.4, 359.9, 360.0, 1234.5, 7199.9] {
        let angle = resting_angle(4, 3, last).expect("angle");
        assert!(angle >= last, "angle {angle} regressed from {last}");
    }
}

#[test]
fn resting_angle_mod_360_is_identical_across_clients() {
    // Two clients stopped at different Spinning angles must render the same
    // resting position.
    let a = resting_angle(4, 3, 72.0).expect("angle");
    let b = resting_angle(4, 3, 3_564.0).expect("angle");
    let rem_a = a.rem_euclid(360.0);
    let rem_b = b.rem_euclid(360.0);
    assert!((rem_a - rem_b).abs() < 1e-9);
}

#[test]
fn resting_angle_lands_on_the_winning_slice_midpoint() {
    // len 3, winner 1: slice 120°, midpoint 120 + 60 = 180.
    let angle = resting_angle(4, 3, 0.0).expect("angle");
    assert!((angle.rem_euclid(360.0) - 180.0).abs() < 1e-9);

    // len 4, winner 0: midpoint 45.
    let angle = resting_angle(4, 4, 0.0).expect("angle");
    assert!((angle.rem_euclid(360.0) - 45.0).abs() < 1e-9);
}

#[test]
fn extra_turns_come_from_target_over_len() {
    // target 7, len 3 → two extra turns past the last whole rotation.
    let angle = resting_angle(7, 3, 0.0).expect("angle");
    assert!((angle - (720.0 + 180.0)).abs() < 1e-9);
}

#[test]
fn single_entry_wheel_always_wins_entry_zero() {
    for target in 1..6_u64 {
        assert_eq!(winner_index(target, 1), Some(0));
        let angle = resting_angle(target, 1, 0.0).expect("angle");
        assert!((angle.rem_euclid(360.0) - 180.0).abs() < 1e-9);
    }
}
