//! Temporal registration between a reference stream and a device under test.
//!
//! Accumulates the two report sets collected during a measurement run and
//! finds the time shift that minimizes the squared error between the test
//! trace and the calibration-mapped reference trace.

use crate::calibration::CalibrationMap;
use crate::error::AlignError;
use crate::trajectory::{TimeBasis, Trajectory};
use latency_traits::Report;

/// Offset search bounds. The defaults cover sub-second device latencies at
/// millisecond resolution; results are quantized to `step_s`.
#[derive(Debug, Clone)]
pub struct AlignerCfg {
    /// Candidate offsets span `[-max_offset_s, +max_offset_s]`.
    pub max_offset_s: f64,
    /// Grid resolution in seconds.
    pub step_s: f64,
}

impl Default for AlignerCfg {
    fn default() -> Self {
        Self {
            max_offset_s: 0.3,
            step_s: 0.001,
        }
    }
}

/// Grid-search latency estimator over two report collections.
pub struct LatencyAligner {
    map: CalibrationMap,
    cfg: AlignerCfg,
    reference_reports: Vec<Report>,
    test_reports: Vec<Report>,
}

impl LatencyAligner {
    pub fn new(map: CalibrationMap, cfg: AlignerCfg) -> Self {
        Self {
            map,
            cfg,
            reference_reports: Vec::new(),
            test_reports: Vec::new(),
        }
    }

    pub fn calibration(&self) -> &CalibrationMap {
        &self.map
    }

    /// Append reference-device reports for latency determination. The
    /// calibration table must be built first.
    pub fn add_reference_reports(&mut self, reports: Vec<Report>) -> Result<(), AlignError> {
        if !self.map.is_built() {
            return Err(AlignError::TableNotBuilt);
        }
        self.reference_reports.extend(reports);
        Ok(())
    }

    /// Append device-under-test reports for latency determination. The
    /// calibration table must be built first.
    pub fn add_test_reports(&mut self, reports: Vec<Report>) -> Result<(), AlignError> {
        if !self.map.is_built() {
            return Err(AlignError::TableNotBuilt);
        }
        self.test_reports.extend(reports);
        Ok(())
    }

    /// Find the offset in seconds that best explains the test trace as a
    /// delayed copy of the calibration-mapped reference trace. Positive means
    /// the test device lags the reference.
    ///
    /// Bounded grid search: the zero offset is evaluated first, then every
    /// candidate from `-max_offset_s` upward at `step_s` resolution; a
    /// strictly smaller error is required to displace the incumbent, so ties
    /// resolve to the earliest offset in scan order.
    pub fn compute_latency(
        &self,
        reference_channel: usize,
        test_channel: usize,
        basis: TimeBasis,
    ) -> Result<f64, AlignError> {
        let first_reference = self
            .reference_reports
            .first()
            .ok_or(AlignError::NoReferenceReports)?;
        let first_test = self.test_reports.first().ok_or(AlignError::NoTestReports)?;

        // Common origin: the earlier of the two collections' first stamp.
        let stamp = |r: &Report| match basis {
            TimeBasis::Sample => r.sample_time,
            TimeBasis::Arrival => r.arrival_time,
        };
        let origin = stamp(first_reference).min(stamp(first_test));

        let reference =
            Trajectory::from_reports(&self.reference_reports, origin, reference_channel, basis);
        let test = Trajectory::from_reports(&self.test_reports, origin, test_channel, basis);

        let mut best_offset = 0.0;
        let mut best_err = self.alignment_error(&reference, &test, 0.0);

        let steps = (self.cfg.max_offset_s / self.cfg.step_s).round() as i64;
        for i in -steps..=steps {
            let offset = i as f64 * self.cfg.step_s;
            let err = self.alignment_error(&reference, &test, offset);
            if err < best_err {
                best_err = err;
                best_offset = offset;
            }
        }

        tracing::debug!(
            offset_s = best_offset,
            sse = best_err,
            samples = test.len(),
            "latency grid search complete"
        );
        Ok(best_offset)
    }

    /// Sum of squared errors between the test samples and the shifted,
    /// calibration-mapped reference trajectory.
    fn alignment_error(&self, reference: &Trajectory, test: &Trajectory, offset: f64) -> f64 {
        test.entries()
            .iter()
            .map(|entry| {
                let mapped = self.map.value_for_code(reference.lookup(entry.time - offset));
                let err = mapped - entry.value;
                err * err
            })
            .sum()
    }
}
