//! Continuous-time view of one channel from a batch of reports.

use crate::util::seconds_from;
use latency_traits::Report;
use std::time::Instant;

/// Which report timestamp a trajectory is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBasis {
    /// The producer's estimate of when the measurement was taken.
    Sample,
    /// When the report reached this process.
    Arrival,
}

/// One sampled point: seconds relative to the trajectory origin, and the
/// channel value at that time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub time: f64,
    pub value: f64,
}

/// A sorted, interpolatable time series for a single channel.
///
/// Entries are sorted ascending by time. Equal-time entries keep their
/// insertion order (stable sort) and `lookup` at such a time returns the
/// first of them; this tie-break is deterministic but otherwise arbitrary.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    entries: Vec<Entry>,
}

impl Trajectory {
    /// Build a trajectory from a report batch. Reports whose value count does
    /// not cover `channel` are silently skipped.
    pub fn from_reports(
        reports: &[Report],
        origin: Instant,
        channel: usize,
        basis: TimeBasis,
    ) -> Self {
        let mut entries: Vec<Entry> = reports
            .iter()
            .filter(|r| channel < r.values.len())
            .map(|r| {
                let stamp = match basis {
                    TimeBasis::Sample => r.sample_time,
                    TimeBasis::Arrival => r.arrival_time,
                };
                Entry {
                    time: seconds_from(origin, stamp),
                    value: r.values[channel],
                }
            })
            .collect();
        entries.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Interpolated value at time `t` (seconds relative to the origin).
    ///
    /// Empty trajectories return 0. Times at or outside the recorded range
    /// clamp to the first/last value; interior times interpolate linearly
    /// between the bracketing entries.
    pub fn lookup(&self, t: f64) -> f64 {
        let Some(first) = self.entries.first() else {
            return 0.0;
        };
        // `last` exists whenever `first` does.
        let last = self.entries[self.entries.len() - 1];
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First entry with time >= t; the guards above keep idx interior.
        let idx = self.entries.partition_point(|e| e.time < t);
        let hi = self.entries[idx];
        if hi.time == t {
            return hi.value;
        }
        let lo = self.entries[idx - 1];
        let span = hi.time - lo.time;
        if span <= 0.0 {
            return lo.value;
        }
        let frac = (t - lo.time) / span;
        lo.value + frac * (hi.value - lo.value)
    }
}
