//! Test and helper mocks for latency_core

use latency_traits::{BoxError, Device, ReportSink};
use std::time::Instant;

/// A device that opens and services successfully but never reports anything;
/// useful for exercising session lifecycle without real hardware.
pub struct IdleDevice;

impl Device for IdleDevice {
    fn open(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
    fn service(&mut self, _sink: &mut dyn ReportSink) -> Result<(), BoxError> {
        // Yield so a busy-polling test loop doesn't starve the consumer.
        std::thread::yield_now();
        Ok(())
    }
    fn close(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// A device whose open always fails; sessions on it report broken
/// immediately.
pub struct UnopenableDevice;

impl Device for UnopenableDevice {
    fn open(&mut self) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("device not present")))
    }
    fn service(&mut self, _sink: &mut dyn ReportSink) -> Result<(), BoxError> {
        Ok(())
    }
    fn close(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// A device that emits a prepared sequence of reports, one per service call,
/// then idles.
pub struct ScriptedDevice {
    script: std::vec::IntoIter<(Vec<f64>, Option<Instant>)>,
}

impl ScriptedDevice {
    pub fn new(reports: Vec<(Vec<f64>, Option<Instant>)>) -> Self {
        Self {
            script: reports.into_iter(),
        }
    }
}

impl Device for ScriptedDevice {
    fn open(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
    fn service(&mut self, sink: &mut dyn ReportSink) -> Result<(), BoxError> {
        match self.script.next() {
            Some((values, sample_time)) => sink.push(values, sample_time),
            None => std::thread::yield_now(),
        }
        Ok(())
    }
    fn close(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}
