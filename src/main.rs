//! Sine/cosine accuracy and speed report.
//!
//! Runs the scalar, vector and parallel vector sincos kernels over seeded random
//! inputs, prints the time each takes next to `std`, and the ULP distance of
//! every kernel from `std` and from each other.
//!
//! Usage: `lanefold [ELEMENTS]` (default 1 000 000). Set `RUST_LOG=debug` to see
//! the capability checks.

use std::process::ExitCode;
use std::time::{Duration, Instant};

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lanefold::oracle::{ulps_f32, ulps_f64, UlpStats};
use lanefold::simd::SimdSinCos;
use lanefold::Capabilities;

const DEFAULT_ELEMENTS: usize = 1_000_000;
const INPUT_RANGE: f64 = 1000.0;
const SEED: u64 = 0x5EED;

fn time<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

fn print_row(name: &str, elapsed: Duration, baseline: Duration, sin: UlpStats, cos: UlpStats) {
    let speedup = baseline.as_secs_f64() / elapsed.as_secs_f64().max(f64::MIN_POSITIVE);
    println!(
        "  {name:<16} {:>10.3} ms {speedup:>7.2}x   sin max {:>3} mean {:.3}   cos max {:>3} mean {:.3}",
        elapsed.as_secs_f64() * 1e3,
        sin.max,
        sin.mean,
        cos.max,
        cos.mean,
    );
}

macro_rules! report {
    ($t:ty, $ulps:ident, $inputs:expr) => {{
        let inputs: Vec<$t> = $inputs;
        println!("\n{} ({} elements)", stringify!($t), inputs.len());

        let ((std_sin, std_cos), std_time) = time(|| -> (Vec<$t>, Vec<$t>) {
            inputs.iter().map(|x| x.sin_cos()).unzip()
        });
        let scalar = time(|| inputs.as_slice().scalar_sincos());
        let simd = time(|| inputs.as_slice().simd_sincos());
        let parallel = time(|| inputs.as_slice().par_simd_sincos());

        let against_std = |(s, c): &(Vec<$t>, Vec<$t>)| {
            (
                UlpStats::collect(s, &std_sin, $ulps),
                UlpStats::collect(c, &std_cos, $ulps),
            )
        };

        print_row("std", std_time, std_time, UlpStats::default(), UlpStats::default());
        for (name, (result, elapsed)) in [("scalar", &scalar), ("simd", &simd), ("parallel simd", &parallel)] {
            let (sin, cos) = against_std(result);
            print_row(name, *elapsed, std_time, sin, cos);
        }

        let (sin, cos) = (
            UlpStats::collect(&simd.0 .0, &scalar.0 .0, $ulps),
            UlpStats::collect(&simd.0 .1, &scalar.0 .1, $ulps),
        );
        println!(
            "  simd vs scalar: sin max {} ulp, cos max {} ulp",
            sin.max, cos.max
        );
        if sin.max > 1 || cos.max > 1 {
            log::warn!(
                "{} vector kernel drifted from the scalar oracle (sin {}, cos {} ulp)",
                stringify!($t),
                sin.max,
                cos.max
            );
        }
    }};
}

fn main() -> ExitCode {
    env_logger::init();

    let elements = match std::env::args().nth(1) {
        None => DEFAULT_ELEMENTS,
        Some(arg) => match arg.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                eprintln!("expected a positive element count, got {arg:?}");
                return ExitCode::FAILURE;
            }
        },
    };

    let capabilities = Capabilities::active();
    println!("lanefold sincos report, {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!(
        "backend {} (fma: {}), inputs uniform in [-{INPUT_RANGE}, {INPUT_RANGE})",
        capabilities.isa, capabilities.fused_multiply_add
    );
    if !capabilities.check_runtime() {
        eprintln!("this CPU does not support the compiled backend");
        return ExitCode::FAILURE;
    }

    let mut rng = StdRng::seed_from_u64(SEED);
    let wide: Vec<f64> = (0..elements)
        .map(|_| rng.random_range(-INPUT_RANGE..INPUT_RANGE))
        .collect();

    report!(f32, ulps_f32, wide.iter().map(|&x| x as f32).collect());
    report!(f64, ulps_f64, wide);

    ExitCode::SUCCESS
}
