//! Per-device acquisition sessions.
//!
//! Spawns a thread that owns the `Device`, drives its open/service/close
//! hooks, and pushes timestamped reports through an unbounded channel that
//! the consumer drains in batches.
//!
//! Safety: each `DeviceSession` spawns exactly one thread that is shut down
//! when the session is stopped or dropped, preventing thread leaks.
use crossbeam_channel as xch;
use latency_traits::clock::Clock;
use latency_traits::{Device, Report, ReportSink};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Sink handed to `Device::service`; stamps arrival times and forwards
/// reports to the session's channel.
struct ChannelSink<'a, C: Clock> {
    tx: &'a xch::Sender<Report>,
    clock: &'a C,
    disconnected: bool,
}

impl<C: Clock> ReportSink for ChannelSink<'_, C> {
    fn push(&mut self, values: Vec<f64>, sample_time: Option<Instant>) {
        let arrival_time = self.clock.now();
        // Unknown sample time means the arrival time is the best estimate.
        let sample_time = sample_time.unwrap_or(arrival_time);
        let report = Report {
            values,
            sample_time,
            arrival_time,
        };
        if self.tx.send(report).is_err() {
            self.disconnected = true;
        }
    }
}

/// One device's acquisition loop plus the pending-report buffer it feeds.
///
/// Reports are never dropped between push and drain, and each drain returns
/// its batch in arrival order.
pub struct DeviceSession {
    rx: xch::Receiver<Report>,
    broken: Arc<AtomicBool>,
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    /// Join handle for graceful thread cleanup
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl DeviceSession {
    /// Spawn the acquisition thread and block until it is observably running
    /// or broken, so an immediate open failure is visible through
    /// `is_broken()` as soon as this returns.
    pub fn spawn<D, C>(mut device: D, clock: C) -> Self
    where
        D: Device + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let (tx, rx) = xch::unbounded();
        let broken = Arc::new(AtomicBool::new(false));
        let broken_clone = broken.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let (ready_tx, ready_rx) = xch::bounded::<()>(1);

        let join_handle = std::thread::spawn(move || {
            if let Err(e) = device.open() {
                tracing::warn!(error = %e, "device open failed, session broken");
                broken_clone.store(true, Ordering::Relaxed);
            }
            // Readiness handshake: the parent is allowed to return only once
            // running-or-broken can be observed.
            let _ = ready_tx.send(());

            if !broken_clone.load(Ordering::Relaxed) {
                let mut sink = ChannelSink {
                    tx: &tx,
                    clock: &clock,
                    disconnected: false,
                };
                loop {
                    // Immediate shutdown check (lock-free atomic)
                    if shutdown_clone.load(Ordering::Relaxed) {
                        tracing::debug!("acquisition thread received shutdown signal");
                        break;
                    }

                    if let Err(e) = device.service(&mut sink) {
                        tracing::warn!(error = %e, "device service failed, session broken");
                        broken_clone.store(true, Ordering::Relaxed);
                        break;
                    }
                    if sink.disconnected {
                        tracing::debug!("session consumer disconnected, exiting thread");
                        break;
                    }
                    // No sleep here: the loop busy-polls so that arrival
                    // timestamps add as little delay as possible, even at the
                    // cost of a full core.
                }
            }

            // Orderly close is attempted even after open/service failure.
            if let Err(e) = device.close() {
                tracing::warn!(error = %e, "device close failed, session broken");
                broken_clone.store(true, Ordering::Relaxed);
            }
            tracing::trace!("acquisition thread exiting cleanly");
        });

        // recv fails only if the thread died before the handshake; the join
        // in stop/drop surfaces that panic.
        let _ = ready_rx.recv();

        Self {
            rx,
            broken,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Swap out and return every pending report, oldest first. Never blocks;
    /// an empty batch just means nothing arrived since the last drain.
    pub fn drain(&self) -> Vec<Report> {
        self.rx.try_iter().collect()
    }

    /// True once any open/service/close step failed. Latches; a broken
    /// session never reports healthy again.
    pub fn is_broken(&self) -> bool {
        self.broken.load(Ordering::Relaxed)
    }

    /// Signal the acquisition loop to exit and wait until it has. Idempotent,
    /// and safe to call on a session whose open already failed.
    pub fn stop(&mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("acquisition thread joined successfully");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we may be in Drop)
                    tracing::warn!(?e, "acquisition thread panicked during shutdown");
                }
            }
        }
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}
