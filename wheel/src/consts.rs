//! Timing and display constants shared by every replica.

/// Milliseconds between animation ticks while the wheel is Spinning.
pub const BASE_TICK_MS: u64 = 30;

/// Fixed deceleration window between entering Slowing and resolving the
/// winner. Each client counts it from its own Slowing entry.
pub const SLOWING_MS: u64 = 3_000;

/// Degrees of display rotation added per Spinning tick.
pub const SPIN_DEGREES_PER_TICK: f64 = 36.0;
