//! Common time and statistics helpers for latency_core.

use std::time::Instant;

/// Signed fractional seconds from `origin` to `t`.
///
/// `Instant` subtraction saturates, so both directions are measured and the
/// earlier-than-origin case is negated.
#[inline]
pub fn seconds_from(origin: Instant, t: Instant) -> f64 {
    if t >= origin {
        t.duration_since(origin).as_secs_f64()
    } else {
        -origin.duration_since(t).as_secs_f64()
    }
}

/// Median of a slice, sorting a local copy. Even lengths average the two
/// middle values. Empty input returns None.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
