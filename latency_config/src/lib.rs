#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and calibration-observation parsing for the latency rig.
//!
//! - `RigConfig` and sub-structs are deserialized from TOML and validated.
//! - Observation CSV loader enforces headers and rejects codes outside the
//!   10-bit converter range before they reach the calibration table.
use serde::Deserialize;

/// Largest raw code a 10-bit converter can report.
pub const RAW_CODE_MAX: u16 = 1023;

/// Calibration observation CSV schema.
///
/// Expected headers:
/// code,value
///
/// Example:
/// code,value
/// 12,0.02
/// 980,1.71
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ObservationRow {
    pub code: u16,
    pub value: f64,
}

/// One report stream: where it comes from and which channel to align on.
#[derive(Debug, Deserialize)]
pub struct ChannelCfg {
    /// Serial port path; None selects the rig's default for this role.
    pub port: Option<String>,
    #[serde(default)]
    pub channel: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AlignerToml {
    /// Candidate offsets span +/- this many seconds.
    pub max_offset_s: f64,
    /// Offset grid resolution in seconds.
    pub step_s: f64,
}

impl Default for AlignerToml {
    fn default() -> Self {
        Self {
            max_offset_s: 0.3,
            step_s: 0.001,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EstimatorToml {
    /// Sliding-window span in seconds for period estimation.
    pub window_s: f64,
}

impl Default for EstimatorToml {
    fn default() -> Self {
        Self { window_s: 1.0 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
}

#[derive(Debug, Deserialize)]
pub struct RigConfig {
    pub reference: ChannelCfg,
    pub test: ChannelCfg,
    #[serde(default)]
    pub aligner: AlignerToml,
    #[serde(default)]
    pub estimator: EstimatorToml,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<RigConfig, toml::de::Error> {
    toml::from_str::<RigConfig>(s)
}

impl RigConfig {
    pub fn validate(&self) -> eyre::Result<()> {
        // Aligner
        if !(self.aligner.step_s.is_finite() && self.aligner.step_s > 0.0) {
            eyre::bail!("aligner.step_s must be finite and > 0");
        }
        if !(self.aligner.max_offset_s.is_finite() && self.aligner.max_offset_s > 0.0) {
            eyre::bail!("aligner.max_offset_s must be finite and > 0");
        }
        if self.aligner.step_s > self.aligner.max_offset_s {
            eyre::bail!("aligner.step_s must not exceed aligner.max_offset_s");
        }
        if self.aligner.max_offset_s > 10.0 {
            eyre::bail!("aligner.max_offset_s is unreasonably large (>10s)");
        }

        // Estimator
        if !(self.estimator.window_s.is_finite() && self.estimator.window_s > 0.0) {
            eyre::bail!("estimator.window_s must be finite and > 0");
        }
        if self.estimator.window_s > 60.0 {
            eyre::bail!("estimator.window_s is unreasonably large (>60s)");
        }

        // Channels: a report rarely carries more than a handful of values
        if self.reference.channel > 15 {
            eyre::bail!("reference.channel must be in 0..=15");
        }
        if self.test.channel > 15 {
            eyre::bail!("test.channel must be in 0..=15");
        }

        Ok(())
    }
}

pub fn load_observations_csv(path: &std::path::Path) -> eyre::Result<Vec<ObservationRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open observation CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["code", "value"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "observation CSV must have headers 'code,value', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<ObservationRow>().enumerate() {
        match rec {
            Ok(row) => {
                if row.code > RAW_CODE_MAX {
                    eyre::bail!(
                        "CSV row {}: code {} exceeds the 10-bit maximum {}",
                        idx + 2,
                        row.code,
                        RAW_CODE_MAX
                    );
                }
                if !row.value.is_finite() {
                    eyre::bail!("CSV row {}: value must be finite", idx + 2);
                }
                rows.push(row);
            }
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    if rows.len() < 2 {
        eyre::bail!(
            "calibration requires at least two observation rows, got {}",
            rows.len()
        );
    }

    Ok(rows)
}
