//! Oscillation period estimation from a live report stream.
//!
//! Keeps a sliding time window of reports, picks the channel that moves the
//! most, and times the signal's mean crossings. No sinusoidal model is
//! assumed; the estimate is the median spacing of adjacent crossings.

use crate::util::{median, seconds_from};
use latency_traits::Report;
use std::collections::VecDeque;

/// Sliding-window length for period estimation.
#[derive(Debug, Clone)]
pub struct EstimatorCfg {
    /// Retained time span in seconds; estimates need a full window.
    pub window_s: f64,
}

impl Default for EstimatorCfg {
    fn default() -> Self {
        Self { window_s: 1.0 }
    }
}

/// Estimates the dominant period of a roughly periodic signal.
///
/// Returns -1 from every query until enough data has accumulated; the
/// sentinel means "not enough information yet", never an error.
pub struct OscillationEstimator {
    cfg: EstimatorCfg,
    window: VecDeque<Report>,
    window_reached: bool,
}

impl OscillationEstimator {
    pub fn new(cfg: EstimatorCfg) -> Self {
        Self {
            cfg,
            window: VecDeque::new(),
            window_reached: false,
        }
    }

    /// Append a batch of reports, evict anything older than the window, and
    /// attempt a period estimate. A report whose value count differs from the
    /// window's discards the accumulated window (keeping the new report) and
    /// makes this call report -1.
    pub fn add_reports_and_estimate_period(&mut self, reports: &[Report]) -> f64 {
        let mut consistent = true;
        for report in reports {
            consistent &= self.add_report(report.clone());
        }
        if !consistent {
            return -1.0;
        }
        self.estimate_period()
    }

    fn add_report(&mut self, report: Report) -> bool {
        let Some(front) = self.window.front() else {
            self.window.push_back(report);
            return true;
        };

        // A device's arity is fixed; a mismatch means the stream changed out
        // from under us, so statistics over the old window are meaningless.
        if report.values.len() != front.values.len() {
            self.window.clear();
            self.window_reached = false;
            self.window.push_back(report);
            return false;
        }

        self.window.push_back(report);
        while let (Some(front), Some(back)) = (self.window.front(), self.window.back()) {
            if seconds_from(front.sample_time, back.sample_time) <= self.cfg.window_s {
                break;
            }
            self.window_reached = true;
            self.window.pop_front();
        }
        true
    }

    fn estimate_period(&self) -> f64 {
        if !self.window_reached {
            return -1.0;
        }

        // The channel that moved the most carries the oscillation.
        let (means, deviations) = self.channel_statistics();
        if means.is_empty() || deviations.len() != means.len() {
            return -1.0;
        }
        let mut channel = 0;
        let mut max_dev = deviations[0];
        for (i, &dev) in deviations.iter().enumerate().skip(1) {
            if dev > max_dev {
                max_dev = dev;
                channel = i;
            }
        }

        // Walk the window in time order. A sample at least half a deviation
        // from the mean arms crossing detection; a later sign change of the
        // mean-centered value records a crossing and disarms.
        let half_dev = 0.5 * max_dev;
        let Some(front_time) = self.window.front().map(|r| r.sample_time) else {
            return -1.0;
        };
        let mut armed = false;
        let mut prev_centered: Option<f64> = None;
        let mut crossings: Vec<f64> = Vec::new();
        for report in &self.window {
            let centered = report.values[channel] - means[channel];
            if let Some(prev) = prev_centered
                && armed
                && centered.signum() != prev.signum()
            {
                crossings.push(seconds_from(front_time, report.sample_time));
                armed = false;
            }
            if centered.abs() >= half_dev && half_dev > 0.0 {
                armed = true;
            }
            prev_centered = Some(centered);
        }

        if crossings.len() < 2 {
            return -1.0;
        }
        let intervals: Vec<f64> = crossings.windows(2).map(|w| w[1] - w[0]).collect();
        match median(&intervals) {
            // Adjacent mean crossings are half a period apart.
            Some(half_period) => 2.0 * half_period,
            None => -1.0,
        }
    }

    /// Per-channel mean and standard deviation over the window, computed in
    /// one pass. Empty vectors when there is no data.
    fn channel_statistics(&self) -> (Vec<f64>, Vec<f64>) {
        let Some(front) = self.window.front() else {
            return (Vec::new(), Vec::new());
        };
        let num_channels = front.values.len();
        if num_channels == 0 {
            return (Vec::new(), Vec::new());
        }

        let mut sums = vec![0.0; num_channels];
        let mut square_sums = vec![0.0; num_channels];
        for report in &self.window {
            for i in 0..num_channels {
                sums[i] += report.values[i];
                square_sums[i] += report.values[i] * report.values[i];
            }
        }

        let n = self.window.len() as f64;
        let means: Vec<f64> = sums.iter().map(|s| s / n).collect();
        let deviations: Vec<f64> = square_sums
            .iter()
            .zip(&means)
            .map(|(sq, mean)| (sq / n - mean * mean).max(0.0).sqrt())
            .collect();
        (means, deviations)
    }
}
