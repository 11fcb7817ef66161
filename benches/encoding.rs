use std::hint::black_box;
use std::time::{Duration, Instant};

use qrsmith::{encode, ECLevel};

const ITERATIONS: u32 = 50;

fn benchmark_encoding(label: &str, data: &str, ecl: ECLevel) -> Duration {
    let start = Instant::now();
    let mut version = 0;
    for _ in 0..ITERATIONS {
        let symbol = encode(black_box(data), ecl, 1).expect("Failed to encode benchmark data");
        version = *symbol.version();
    }
    let elapsed = start.elapsed();
    println!(
        "{label:<24} version {version:>2}, level {ecl}: {:?} per symbol",
        elapsed / ITERATIONS
    );
    elapsed
}

fn main() {
    println!("🚀 Running qrsmith Encoding Benchmarks");
    println!("======================================\n");

    let total_start = Instant::now();

    let url = "https://example.com/some/longer/path?query=value";
    let alnum = "QRSMITH ALPHANUMERIC PAYLOAD 0123456789 $%*+-./:".repeat(10);
    let numeric = "1234567890".repeat(300);
    let bytes = "Hello, world! 🌏 ".repeat(60);

    let mut timings = Vec::new();
    for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
        timings.push(benchmark_encoding("Short byte (url)", url, ecl));
        timings.push(benchmark_encoding("Alphanumeric", &alnum, ecl));
        timings.push(benchmark_encoding("Numeric", &numeric, ecl));
        timings.push(benchmark_encoding("Long byte (utf-8)", &bytes, ecl));
        println!();
    }

    let total_time = total_start.elapsed();
    println!("✅ All benchmarks completed!");
    println!("Total time elapsed: {:?}", total_time);
    println!("Slowest case: {:?}", timings.iter().max().copied().unwrap_or_default() / ITERATIONS);
}
