//! # Engine Scenario Tests
//!
//! End-to-end pipeline behavior on the Xeon-class reference profile:
//! language contrast, SIMD contrast, complexity ordering, thermal
//! accumulation, and the complexity dial.

use std::time::Duration;

use pulse::op::{ComplexityClass, Operation, metrics as keys};
use pulse_cpu::profile::test_support::reference_profile;
use pulse_cpu::{ComplexityLevel, CpuEngine};

fn engine() -> CpuEngine {
    CpuEngine::new(reference_profile()).unwrap()
}

/// Fresh-reset processing time for one operation.
fn fresh_time(engine: &mut CpuEngine, op: &Operation) -> Duration {
    engine.reset_state();
    engine.process_operation(op, 1).processing_time
}

/// C++ outruns Python on an otherwise identical operation.
#[test]
fn s1_cpp_beats_python() {
    let mut engine = engine();
    let cpp = Operation::new("s1-cpp", "compute", ComplexityClass::Linear, "cpp", 10_240);
    let python = Operation::new("s1-py", "compute", ComplexityClass::Linear, "python", 10_240);

    let cpp_time = fresh_time(&mut engine, &cpp);
    let python_time = fresh_time(&mut engine, &python);
    assert!(
        python_time > cpp_time,
        "python ({python_time:?}) must be slower than cpp ({cpp_time:?})"
    );
}

/// Matrix multiplication vectorizes heavily; database queries barely.
#[test]
fn s2_simd_contrast() {
    let mut engine = engine();
    let matrix =
        Operation::new("s2-mm", "matrix_multiply", ComplexityClass::Cubic, "cpp", 102_400);
    let query =
        Operation::new("s2-db", "database_query", ComplexityClass::Cubic, "cpp", 102_400);

    engine.reset_state();
    let matrix_result = engine.process_operation(&matrix, 1);
    engine.reset_state();
    let query_result = engine.process_operation(&query, 1);

    assert!(matrix_result.metrics[keys::VECTORIZATION_RATIO] >= 0.80);
    assert!(query_result.metrics[keys::VECTORIZATION_RATIO] <= 0.30);
    assert!(matrix_result.metrics[keys::VECTOR_SPEEDUP] > query_result.metrics[keys::VECTOR_SPEEDUP]);
}

/// Processing time increases strictly with complexity class.
#[test]
fn s3_complexity_ordering() {
    let mut engine = engine();
    let classes = [
        ComplexityClass::Constant,
        ComplexityClass::Logarithmic,
        ComplexityClass::Linear,
        ComplexityClass::Quadratic,
    ];

    let times: Vec<Duration> = classes
        .iter()
        .map(|&complexity| {
            let op = Operation::new("s3", "compute", complexity, "cpp", 10_240);
            fresh_time(&mut engine, &op)
        })
        .collect();

    assert!(
        times.windows(2).all(|w| w[0] < w[1]),
        "times must increase strictly with complexity: {times:?}"
    );
}

/// Sustained quadratic work heats the die without breaching the limit.
#[test]
fn s4_thermal_accumulation() {
    let mut engine = engine();
    engine.reset_state();
    let ambient = engine.state().thermal.ambient_c;
    let op = Operation::new("s4", "compute", ComplexityClass::Quadratic, "cpp", 65_536);

    for tick in 1..=15 {
        let result = engine.process_operation(&op, tick);
        let temp = result.metrics[keys::TEMPERATURE_C];
        assert!(temp <= 96.0, "temperature {temp} exceeded the limit");
    }
    let final_temp = engine.state().thermal.current_temp_c;
    assert!(
        final_temp > ambient,
        "15 quadratic operations must heat the die ({final_temp} vs ambient {ambient})"
    );
}

/// Fresh-reset runs of the same operation land within 100% of each other.
#[test]
fn repeated_fresh_runs_are_stable() {
    let mut engine = engine();
    let op = Operation::new("stable", "compute", ComplexityClass::Linear, "cpp", 10_240);

    let times: Vec<f64> =
        (0..5).map(|_| fresh_time(&mut engine, &op).as_secs_f64()).collect();
    let min = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max = times.iter().copied().fold(0.0, f64::max);
    assert!(max <= min * 2.0, "variance above 100%: {times:?}");
}

/// The dial changes the answer and Maximum reports the full metric set.
#[test]
fn s6_complexity_dial() {
    let mut engine = engine();
    let op = Operation::new("s6", "matrix_multiply", ComplexityClass::Quadratic, "cpp", 65_536);

    engine.set_complexity_level(ComplexityLevel::Minimal);
    engine.reset_state();
    let minimal = engine.process_operation(&op, 1);

    engine.set_complexity_level(ComplexityLevel::Maximum);
    engine.reset_state();
    let maximum = engine.process_operation(&op, 1);

    assert_ne!(minimal.processing_time, maximum.processing_time);
    for key in keys::REQUIRED {
        assert!(maximum.metrics.contains_key(key), "maximum missing {key}");
    }
    assert!(maximum.metrics.len() >= keys::REQUIRED.len());
    assert!(maximum.metrics.len() > minimal.metrics.len());
}

/// Cubic work oversubscribes physical cores and collects the SMT bonus.
#[test]
fn hyperthreading_engages_on_oversubscribed_work() {
    let mut engine = engine();
    let op = Operation::new("ht", "compute", ComplexityClass::Cubic, "cpp", 10_240);
    let result = engine.process_operation(&op, 1);
    // 32 requested threads on 24 physical cores: the SMT factor is < 1.
    assert!(result.metrics[keys::HT_FACTOR] < 1.0);
    assert_eq!(result.metrics[keys::ACTIVE_CORES], 24.0);
}

/// Single-core work boosts to the peak clock on a cold die.
#[test]
fn single_core_boost_on_cold_die() {
    let mut engine = engine();
    let op = Operation::new("boost", "compute", ComplexityClass::Constant, "cpp", 1024);
    let result = engine.process_operation(&op, 1);
    assert_eq!(result.metrics[keys::BOOST_CLOCK_GHZ], 3.7);
    assert_eq!(result.metrics[keys::ACTIVE_CORES], 1.0);
}

/// Cache warming makes identical operations faster over time.
#[test]
fn cache_warms_across_operations() {
    let mut engine = engine();
    let op = Operation::new("warm", "compute", ComplexityClass::Linear, "cpp", 4_096);

    engine.reset_state();
    let first = engine.process_operation(&op, 1);
    let mut last = first.clone();
    for tick in 2..=50 {
        last = engine.process_operation(&op, tick);
    }
    assert!(last.metrics[keys::CACHE_HIT_RATIO] > first.metrics[keys::CACHE_HIT_RATIO]);
    assert!(last.metrics[keys::MEMORY_MULTIPLIER] < first.metrics[keys::MEMORY_MULTIPLIER]);
}
