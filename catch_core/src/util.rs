//! Common period helpers for catch_core.

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Compute the period in microseconds for a given rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 microsecond.
#[inline]
pub fn period_us(hz: u32) -> u64 {
    (MICROS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Number of base ticks between two runs of a task at `task_hz`.
/// - Clamps `task_hz` to at least 1.
/// - Never returns 0; a task faster than the base rate runs every tick.
#[inline]
pub fn period_ticks(base_hz: u32, task_hz: u32) -> u64 {
    (u64::from(base_hz) / u64::from(task_hz.max(1))).max(1)
}
