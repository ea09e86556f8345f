use latency_core::{EstimatorCfg, OscillationEstimator};
use latency_traits::Report;
use std::time::{Duration, Instant};

fn report_at(origin: Instant, t_secs: f64, values: Vec<f64>) -> Report {
    let stamp = origin + Duration::from_secs_f64(t_secs);
    Report {
        values,
        sample_time: stamp,
        arrival_time: stamp,
    }
}

/// Triangle wave in `[-1, 1]` with the given period.
fn triangle(t: f64, period: f64) -> f64 {
    let x = (t / period).fract();
    if x < 0.5 { 4.0 * x - 1.0 } else { 3.0 - 4.0 * x }
}

/// A 0.2s triangle on channel 1 next to a flat channel 0, sampled every 10ms.
fn triangle_reports(origin: Instant, from_s: f64, until_s: f64) -> Vec<Report> {
    let mut reports = Vec::new();
    let mut i = (from_s / 0.01).round() as u64;
    loop {
        let t = i as f64 * 0.01;
        if t >= until_s {
            break;
        }
        reports.push(report_at(origin, t, vec![42.0, triangle(t, 0.2)]));
        i += 1;
    }
    reports
}

#[test]
fn recovers_the_period_of_a_triangle_wave() {
    let mut estimator = OscillationEstimator::new(EstimatorCfg { window_s: 1.0 });
    let origin = Instant::now();
    let period = estimator.add_reports_and_estimate_period(&triangle_reports(origin, 0.0, 2.5));
    assert!(
        (period - 0.2).abs() < 0.025,
        "expected ~0.2s period, got {period}s"
    );
}

#[test]
fn picks_the_channel_with_the_largest_deviation() {
    // Channel 0 carries the slow wave, channel 1 a much bigger fast one.
    let mut estimator = OscillationEstimator::new(EstimatorCfg { window_s: 1.0 });
    let origin = Instant::now();
    let mut reports = Vec::new();
    for i in 0..250 {
        let t = i as f64 * 0.01;
        reports.push(report_at(
            origin,
            t,
            vec![triangle(t, 0.5), 100.0 * triangle(t, 0.2)],
        ));
    }
    let period = estimator.add_reports_and_estimate_period(&reports);
    assert!(
        (period - 0.2).abs() < 0.025,
        "expected the louder channel's 0.2s period, got {period}s"
    );
}

#[test]
fn partial_window_returns_minus_one() {
    let mut estimator = OscillationEstimator::new(EstimatorCfg { window_s: 1.0 });
    let origin = Instant::now();
    // Only 0.5s of data against a 1.0s window.
    let period = estimator.add_reports_and_estimate_period(&triangle_reports(origin, 0.0, 0.5));
    assert_eq!(period, -1.0);
}

#[test]
fn estimate_becomes_available_once_the_window_fills() {
    let mut estimator = OscillationEstimator::new(EstimatorCfg { window_s: 1.0 });
    let origin = Instant::now();
    assert_eq!(
        estimator.add_reports_and_estimate_period(&triangle_reports(origin, 0.0, 0.8)),
        -1.0
    );
    let period = estimator.add_reports_and_estimate_period(&triangle_reports(origin, 0.8, 2.5));
    assert!((period - 0.2).abs() < 0.025);
}

#[test]
fn flat_signal_has_no_period() {
    let mut estimator = OscillationEstimator::new(EstimatorCfg { window_s: 1.0 });
    let origin = Instant::now();
    let reports: Vec<Report> = (0..300)
        .map(|i| report_at(origin, i as f64 * 0.01, vec![7.0, 7.0]))
        .collect();
    assert_eq!(estimator.add_reports_and_estimate_period(&reports), -1.0);
}

#[test]
fn arity_change_discards_the_window() {
    let mut estimator = OscillationEstimator::new(EstimatorCfg { window_s: 1.0 });
    let origin = Instant::now();
    estimator.add_reports_and_estimate_period(&triangle_reports(origin, 0.0, 2.5));

    // A single three-channel report invalidates the batch and the window.
    let odd = vec![report_at(origin, 2.5, vec![1.0, 2.0, 3.0])];
    assert_eq!(estimator.add_reports_and_estimate_period(&odd), -1.0);

    // The window restarts with the new arity and must refill before
    // estimating again.
    let refill: Vec<Report> = (0..30)
        .map(|i| {
            let t = 2.51 + i as f64 * 0.01;
            report_at(origin, t, vec![1.0, 2.0, triangle(t, 0.2)])
        })
        .collect();
    assert_eq!(estimator.add_reports_and_estimate_period(&refill), -1.0);
}
