#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core latency-measurement logic (transport-agnostic).
//!
//! This crate estimates the end-to-end latency between two independently
//! sampled measurement streams: a low-latency ground-truth sensor and a
//! device under test reporting the same physical quantity through an unknown
//! channel. All device interaction goes through `latency_traits::Device`.
//!
//! ## Architecture
//!
//! - **Session**: per-device acquisition thread with a drainable FIFO report
//!   buffer (`session` module)
//! - **Trajectory**: sorted, interpolatable time-series view of one channel
//!   from a batch of reports (`trajectory` module)
//! - **Calibration**: raw-code to reference-value lookup table built from
//!   scattered observations (`calibration` module)
//! - **Alignment**: grid search for the offset that best explains the test
//!   trace as a delayed copy of the reference (`aligner` module)
//! - **Oscillation**: sliding-window period estimation from zero crossings
//!   (`oscillation` module)

// Module declarations
pub mod aligner;
pub mod calibration;
pub mod error;
pub mod mocks;
pub mod oscillation;
pub mod session;
pub mod trajectory;
pub mod util;

pub use aligner::{AlignerCfg, LatencyAligner};
pub use calibration::{CalibrationMap, RAW_CODE_MAX, TableStats};
pub use error::{AlignError, CalibrationError};
pub use oscillation::{EstimatorCfg, OscillationEstimator};
pub use session::DeviceSession;
pub use trajectory::{TimeBasis, Trajectory};
