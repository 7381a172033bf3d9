//! Winner convergence math.
//!
//! DESIGN
//! ======
//! All three functions are pure so two clients with the same inputs land on
//! the same result without any coordination. The resting angle is only
//! required to be identical modulo 360° across clients; the absolute turn
//! count may differ because each client starts from its own last Spinning
//! angle.

use crate::consts::SPIN_DEGREES_PER_TICK;

/// Winner position for a shared stopping point: `target_index % roster_len`.
///
/// `None` for an empty roster — a roster that drained between Slowing and
/// resolution yields "no winner", never a modulo-by-zero.
#[must_use]
pub fn winner_index(target_index: u64, roster_len: usize) -> Option<usize> {
    if roster_len == 0 {
        return None;
    }
    let len = roster_len as u64;
    #[allow(clippy::cast_possible_truncation)]
    let index = (target_index % len) as usize;
    Some(index)
}

/// Display angle while Spinning: a fixed step per tick.
#[must_use]
pub fn spin_angle(current_index: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let ticks = current_index as f64;
    ticks * SPIN_DEGREES_PER_TICK
}

/// Final resting angle for a completed spin.
///
/// Invariants:
/// - forward-only: the result is never less than `last_angle`;
/// - the result mod 360 depends only on `(target_index, roster_len)`, so
///   every client renders the same resting position;
/// - the winning slice's midpoint sits under the fixed pointer;
/// - extra full turns come from `target_index / roster_len` (at least one,
///   since the stopping client always adds a full roster length).
///
/// `None` for an empty roster.
#[must_use]
pub fn resting_angle(target_index: u64, roster_len: usize, last_angle: f64) -> Option<f64> {
    let winner = winner_index(target_index, roster_len)?;

    #[allow(clippy::cast_precision_loss)]
    let slice = 360.0 / roster_len as f64;
    #[allow(clippy::cast_precision_loss)]
    let midpoint = winner as f64 * slice + slice / 2.0;

    #[allow(clippy::cast_precision_loss)]
    let extra_turns = (target_index / roster_len as u64).max(1) as f64;

    // Floor to the last whole turn so the result stays ahead of last_angle
    // while its value mod 360 is untouched by where the wheel happened to be.
    let completed = (last_angle / 360.0).floor() * 360.0;
    Some(completed + extra_turns * 360.0 + midpoint)
}

#[cfg(test)]
#[path = "angle_test.rs"]
mod tests;
