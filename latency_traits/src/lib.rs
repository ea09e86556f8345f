pub mod clock;

pub use clock::{Clock, MonotonicClock};

use std::time::Instant;

/// Boxed error type used across the device seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One set of channel values that arrived together from a single device.
///
/// A given device always reports the same number of values. `sample_time` is
/// the best estimate of when the physical measurement was taken;
/// `arrival_time` is when the report reached this process. When the producer
/// cannot estimate the sample time, both fields hold the arrival time.
#[derive(Debug, Clone)]
pub struct Report {
    pub values: Vec<f64>,
    pub sample_time: Instant,
    pub arrival_time: Instant,
}

/// Destination for reports produced inside `Device::service`.
///
/// Implementations stamp the arrival time at push. Passing `None` for
/// `sample_time` means "unknown"; the sink substitutes the arrival time.
pub trait ReportSink {
    fn push(&mut self, values: Vec<f64>, sample_time: Option<Instant>);
}

/// A source of timestamped value reports, driven by an acquisition loop that
/// the session owns.
///
/// `open` runs once on the acquisition thread before polling begins, `service`
/// is called repeatedly and should push any new reports into the sink, and
/// `close` runs once when the loop ends. Any `Err` marks the session broken;
/// there are no internal retries. Examples of implementors include serial
/// streaming microcontrollers and network analog/tracker clients.
pub trait Device: Send {
    fn open(&mut self) -> Result<(), BoxError>;
    fn service(&mut self, sink: &mut dyn ReportSink) -> Result<(), BoxError>;
    fn close(&mut self) -> Result<(), BoxError>;
}
