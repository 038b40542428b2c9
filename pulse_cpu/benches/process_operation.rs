//! Pipeline throughput benchmarks

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use pulse::op::{ComplexityClass, Operation};
use pulse_cpu::profile::test_support::reference_profile;
use pulse_cpu::{ComplexityLevel, CpuEngine};

/// Benchmark the full pipeline at each dial level.
fn bench_dial_levels(c: &mut Criterion) {
    let op = Operation::new("bench", "compute", ComplexityClass::Quadratic, "cpp", 65_536);

    for level in [
        ComplexityLevel::Minimal,
        ComplexityLevel::Basic,
        ComplexityLevel::Advanced,
        ComplexityLevel::Maximum,
    ] {
        let mut engine = CpuEngine::new(reference_profile()).unwrap();
        engine.set_complexity_level(level);
        let mut tick = 0u64;

        c.bench_function(&format!("process_operation_{level}"), |b| {
            b.iter(|| {
                tick += 1;
                black_box(engine.process_operation(black_box(&op), tick));
            });
        });
    }
}

/// Benchmark the operation types with the most divergent feature paths.
fn bench_operation_types(c: &mut Criterion) {
    let mut engine = CpuEngine::new(reference_profile()).unwrap();
    let mut tick = 0u64;

    for op_type in ["matrix_multiply", "database_query", "api_route"] {
        let op = Operation::new("bench", op_type, ComplexityClass::Linear, "rust", 10_240);
        c.bench_function(&format!("process_{op_type}"), |b| {
            b.iter(|| {
                tick += 1;
                black_box(engine.process_operation(black_box(&op), tick));
            });
        });
    }
}

criterion_group!(benches, bench_dial_levels, bench_operation_types);
criterion_main!(benches);
