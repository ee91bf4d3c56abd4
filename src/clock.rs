//! The two clocks the server runs on.
//!
//! Waiter deadlines and key TTLs are measured on a monotonic clock so they
//! are immune to wall-clock adjustments (NTP, manual changes). Stream ID
//! generation needs real Unix time, so it reads the wall clock instead.
//! Nothing in the crate mixes the two.

use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Milliseconds on a monotonic clock, anchored at the first call.
///
/// Only differences between two readings are meaningful; the value has no
/// relation to the Unix epoch.
pub fn monotonic_now_ms() -> u64 {
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_millis() as u64
}

/// Milliseconds since the Unix epoch on the wall clock.
///
/// Can jump forwards or backwards with the system clock; the stream engine
/// handles backward jumps when generating IDs.
pub fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
