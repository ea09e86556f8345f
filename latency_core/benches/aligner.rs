use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use latency_core::trajectory::TimeBasis;
use latency_core::{AlignerCfg, CalibrationMap, LatencyAligner};
use latency_traits::Report;
use std::time::{Duration, Instant};

// Generate a noisy sine trace as (raw code, seconds) samples
fn synth_reports(n: usize, delay_s: f64, noise_amp: f64, seed: u32) -> Vec<Report> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f64 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    };
    let origin = Instant::now();
    let mut v = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 * 0.002;
        let s = (t * 6.0).sin();
        let noise = (next_f64() * 2.0 - 1.0) * noise_amp;
        let code = 512.0 + 400.0 * s + noise;
        let stamp = origin + Duration::from_secs_f64(t + delay_s);
        v.push(Report {
            values: vec![code],
            sample_time: stamp,
            arrival_time: stamp,
        });
    }
    v
}

fn identity_map() -> CalibrationMap {
    let mut map = CalibrationMap::new();
    for code in 0..=1023u32 {
        map.add_observation(f64::from(code), f64::from(code));
    }
    map.build_table().unwrap();
    map
}

pub fn bench_grid_search(c: &mut Criterion) {
    let mut g = c.benchmark_group("grid_search");
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p latency_core --bench aligner
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(1));
        }
    } else {
        g.sample_size(30);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }

    for &n in &[500usize, 2_000, 5_000] {
        let reference = synth_reports(n, 0.0, 2.0, 0xC0FFEE);
        let test = synth_reports(n, 0.04, 2.0, 0xBEEF);
        g.bench_function(format!("compute_latency_{n}"), |b| {
            b.iter_batched(
                || {
                    let mut aligner = LatencyAligner::new(identity_map(), AlignerCfg::default());
                    aligner.add_reference_reports(reference.clone()).unwrap();
                    aligner.add_test_reports(test.clone()).unwrap();
                    aligner
                },
                |aligner| {
                    let latency = aligner.compute_latency(0, 0, TimeBasis::Sample);
                    black_box(latency)
                },
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

criterion_group!(aligner, bench_grid_search);
criterion_main!(aligner);
