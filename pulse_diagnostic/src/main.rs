//! # PULSE Diagnostic Service
//!
//! Drives a short, bounded simulation against a CPU profile and reports
//! coordinator and component health: loads the profile, registers a set
//! of CPU components, feeds them a canned operation mix, and prints the
//! performance snapshot at the end.
//!
//! This binary is an embedder of the core, not part of its contract —
//! the library crates define no CLI of their own.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pulse::op::{ComplexityClass, Operation, OperationResult};
use pulse_clock::TickCoordinator;
use pulse_cpu::{ComplexityLevel, CpuComponent, CpuEngine, CpuProfile};
use tokio::sync::mpsc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "pulse_diagnostic", about = "PULSE simulation core diagnostics")]
struct Args {
    /// CPU profile to load.
    #[arg(long, default_value = "profiles/cpu/intel_xeon_6142.json")]
    profile: PathBuf,

    /// Number of CPU components to register.
    #[arg(long, default_value_t = 3)]
    components: u32,

    /// Simulation ticks to run. The default comfortably covers the
    /// canned operation mix on the shipped profiles.
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,

    /// Scaling factor (> 1 is faster than real time).
    #[arg(long, default_value_t = 100.0)]
    scaling: f64,

    /// Engine complexity level: minimal, basic, advanced, or maximum.
    #[arg(long, default_value = "maximum")]
    level: ComplexityLevel,
}

/// Canned operation mix exercising the divergent feature paths.
fn operation_mix(component: u32) -> Vec<Operation> {
    let specs = [
        ("matrix_multiply", ComplexityClass::Cubic, "cpp", 102_400u64),
        ("database_query", ComplexityClass::Linearithmic, "go", 32_768),
        ("compute", ComplexityClass::Quadratic, "rust", 65_536),
        ("string_process", ComplexityClass::Linear, "python", 10_240),
        ("api_route", ComplexityClass::Logarithmic, "javascript", 2_048),
    ];
    specs
        .iter()
        .enumerate()
        .map(|(i, (op_type, complexity, language, data_size))| {
            Operation::new(
                format!("cpu-{component}-op-{i}"),
                *op_type,
                *complexity,
                *language,
                *data_size,
            )
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .compact()
        .init();

    let args = Args::parse();
    info!(profile = %args.profile.display(), "loading CPU profile");
    let profile = CpuProfile::load(&args.profile)?;

    let coordinator = TickCoordinator::new();
    coordinator.set_scaling_factor(args.scaling)?;

    let mut result_streams: Vec<(String, mpsc::UnboundedReceiver<OperationResult>)> = Vec::new();
    for i in 0..args.components {
        let id = format!("cpu-{i}");
        let mut engine = CpuEngine::new(profile.clone())?;
        engine.set_complexity_level(args.level);
        let (component, results) = CpuComponent::new(&id, engine);
        coordinator.register_component(component)?;
        result_streams.push((id, results));
    }

    // Feed each component its operation mix before starting the clock.
    for (i, (id, _)) in result_streams.iter().enumerate() {
        let sender = coordinator
            .operation_sender(id)
            .ok_or_else(|| format!("component {id} not registered"))?;
        for op in operation_mix(i as u32) {
            sender.send(op).await?;
        }
    }

    info!(
        components = args.components,
        ticks = args.ticks,
        scaling = args.scaling,
        level = %args.level,
        "starting simulation"
    );
    coordinator.start()?;

    // Run until the tick budget is consumed.
    while coordinator.current_tick() < args.ticks {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    coordinator.stop()?;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // ── Report ──
    let metrics = coordinator.performance_metrics();
    info!("simulation finished");
    info!(
        current_tick = metrics.current_tick,
        simulation_time_ms = metrics.simulation_time.as_millis() as u64,
        real_time_ms = metrics.real_time_elapsed.as_millis() as u64,
        efficiency_ratio = format!("{:.3}", metrics.efficiency_ratio).as_str(),
        tick_utilization = format!("{:.3}", metrics.tick_utilization).as_str(),
        ticks_per_second = format!("{:.0}", metrics.ticks_per_second).as_str(),
        "coordinator metrics"
    );

    for status in coordinator.delivery_status() {
        info!(
            component_id = %status.id,
            healthy = status.healthy,
            queued = status.channel_length,
            capacity = status.channel_capacity,
            "delivery status"
        );
    }

    for (id, results) in &mut result_streams {
        let mut completed = 0u32;
        while let Ok(result) = results.try_recv() {
            completed += 1;
            info!(
                component_id = %id.as_str(),
                operation_id = %result.operation_id,
                processing_time_us = result.processing_time.as_micros() as u64,
                completion_tick = result.completion_tick,
                "operation result"
            );
        }
        if completed == 0 {
            error!(component_id = %id.as_str(), "no operations completed within the tick budget");
        }
    }

    Ok(())
}
