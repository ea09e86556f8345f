//! Empirical mapping from a device's integer raw codes to reference values.
//!
//! Scattered (code, value) observations are bucketed per code, reduced to a
//! mean-per-code table, gap-filled by linear interpolation, and repaired
//! toward the mapping's overall trend.

use crate::error::CalibrationError;

/// Largest raw code a reference device can report (10-bit ADC resolution).
pub const RAW_CODE_MAX: usize = 1023;

/// Diagnostics from `build_table`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Interior codes with no observation that were filled by interpolation.
    pub interpolated: usize,
    /// Adjacent steps overwritten because they ran against the overall trend.
    pub monotonicity_fixes: usize,
}

/// Raw-code to reference-value lookup table built from observations.
#[derive(Debug, Clone)]
pub struct CalibrationMap {
    buckets: Vec<Vec<f64>>,
    mean: Vec<f64>,
    min_code: usize,
    max_code: usize,
    built: bool,
}

impl Default for CalibrationMap {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationMap {
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); RAW_CODE_MAX + 1],
            mean: Vec::new(),
            // Bounds start inverted and tighten as observations arrive.
            min_code: RAW_CODE_MAX,
            max_code: 0,
            built: false,
        }
    }

    /// Record one (raw code, reference value) observation. Returns false and
    /// has no effect when `code` lies outside `[0, RAW_CODE_MAX]`.
    pub fn add_observation(&mut self, code: f64, value: f64) -> bool {
        if !(0.0..=RAW_CODE_MAX as f64).contains(&code) {
            return false;
        }
        let index = code as usize;
        self.buckets[index].push(value);
        if index < self.min_code {
            self.min_code = index;
        }
        if index > self.max_code {
            self.max_code = index;
        }
        true
    }

    /// Smallest raw code with at least one observation.
    pub fn min_code(&self) -> usize {
        self.min_code
    }

    /// Largest raw code with at least one observation.
    pub fn max_code(&self) -> usize {
        self.max_code
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Reduce the observation buckets to a dense mean table over the observed
    /// code range: per-code means, linear gap fill for unobserved interior
    /// codes, then a single forward sweep that overwrites any adjacent step
    /// running against the endpoint-to-endpoint trend.
    ///
    /// The sweep does not re-verify global monotonicity after patching; a
    /// patched value can still disagree with a value two steps away.
    pub fn build_table(&mut self) -> Result<TableStats, CalibrationError> {
        // Observations at fewer than two distinct codes cannot anchor a range.
        if self.max_code <= self.min_code {
            return Err(CalibrationError::InsufficientData);
        }

        let mut mean: Vec<f64> = self
            .buckets
            .iter()
            .map(|bucket| {
                if bucket.is_empty() {
                    0.0
                } else {
                    bucket.iter().sum::<f64>() / bucket.len() as f64
                }
            })
            .collect();

        let mut stats = TableStats::default();

        // Fill interior gaps. max_code has data, so a next observed code
        // always exists.
        let mut i = self.min_code + 1;
        while i < self.max_code {
            if self.buckets[i].is_empty() {
                let mut next = i + 1;
                while self.buckets[next].is_empty() {
                    next += 1;
                }
                let base = i - 1;
                let gap = (next - base) as f64;
                let base_val = mean[base];
                let diff = mean[next] - base_val;
                for j in i..next {
                    mean[j] = base_val + (j - base) as f64 / gap * diff;
                    stats.interpolated += 1;
                }
                i = next;
            } else {
                i += 1;
            }
        }

        // Trend direction from the endpoint means; any adjacent step that
        // violates it has its lower-index value overwritten by its successor.
        let expect_falling = mean[self.max_code] < mean[self.min_code];
        for i in self.min_code..self.max_code {
            let falling = mean[i + 1] < mean[i];
            if falling != expect_falling {
                mean[i] = mean[i + 1];
                stats.monotonicity_fixes += 1;
            }
        }

        tracing::debug!(
            min_code = self.min_code,
            max_code = self.max_code,
            interpolated = stats.interpolated,
            monotonicity_fixes = stats.monotonicity_fixes,
            "calibration table built"
        );
        self.mean = mean;
        self.built = true;
        Ok(stats)
    }

    /// Reference value for a raw code, rounded and clamped into the observed
    /// code range. Returns 0 until a table has been built.
    pub fn value_for_code(&self, code: f64) -> f64 {
        if !self.built {
            return 0.0;
        }
        let index = (code.round().max(0.0) as usize).clamp(self.min_code, self.max_code);
        self.mean[index]
    }
}
