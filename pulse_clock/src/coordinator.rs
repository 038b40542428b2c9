//! Global tick coordinator: fixed-rate clock, component registry, per-tick
//! fan-out, pause/resume, scaling factor, and performance metrics.
//!
//! ## Tick loop
//!
//! A periodic timer fires every `TICK_DURATION / scaling_factor`. Each
//! iteration increments the tick counters, snapshots the registry under a
//! read lock (released before any send), and fans the tick out to every
//! component in parallel with a per-send timeout of half a tick. The
//! coordinator never waits for components to *process* a tick — only for
//! delivery — so one slow component cannot serialize the others.
//!
//! ## Failure semantics
//!
//! Delivery timeouts are logged and counted against component health; the
//! tick is dropped for that component and never retried. Panics inside
//! delivery tasks are absorbed. Only [`TickCoordinator::stop`] or the
//! external shutdown signal ends the loop.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use pulse::consts::{DEFAULT_TICK_CHANNEL_CAPACITY, TICK_DELIVERY_TIMEOUT, TICK_STATS_WINDOW};
use pulse::op::Operation;
use pulse::time::{Tick, duration_of, scaled_tick_interval};
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::component::{Component, ComponentRuntime, HealthCell};
use crate::error::{ClockResult, CoordinatorError};

// ─── Lifecycle ──────────────────────────────────────────────────────

/// Coordinator lifecycle state.
///
/// Transitions: Idle→Running (start), Running↔Paused (pause/resume),
/// Running|Paused→Stopped (stop). Stopped is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// Created, not yet driving ticks.
    Idle,
    /// Tick loop running.
    Running,
    /// Tick loop parked between two ticks.
    Paused,
    /// Terminal. Components have been asked to stop.
    Stopped,
}

/// Control word broadcast to the tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Run,
    Pause,
    Stop,
}

// ─── Tick Statistics ────────────────────────────────────────────────

/// Rolling per-tick wall-time statistics.
///
/// Keeps a bounded window for the rolling average plus all-time maximum
/// and overrun count. O(1) per record.
#[derive(Debug)]
pub struct TickStats {
    window: VecDeque<Duration>,
    window_sum: Duration,
    /// Maximum observed tick wall time.
    pub max_tick_time: Duration,
    /// Ticks whose fan-out exceeded the scaled tick interval.
    pub overruns: u64,
    /// Total ticks recorded.
    pub recorded: u64,
}

impl TickStats {
    fn new() -> Self {
        Self {
            window: VecDeque::with_capacity(TICK_STATS_WINDOW),
            window_sum: Duration::ZERO,
            max_tick_time: Duration::ZERO,
            overruns: 0,
            recorded: 0,
        }
    }

    /// Record one tick's fan-out wall time against its budget.
    fn record(&mut self, elapsed: Duration, budget: Duration) {
        self.recorded += 1;
        self.window.push_back(elapsed);
        self.window_sum += elapsed;
        if self.window.len() > TICK_STATS_WINDOW {
            if let Some(evicted) = self.window.pop_front() {
                self.window_sum = self.window_sum.saturating_sub(evicted);
            }
        }
        if elapsed > self.max_tick_time {
            self.max_tick_time = elapsed;
        }
        if elapsed > budget {
            self.overruns += 1;
        }
    }

    /// Rolling average over the last [`TICK_STATS_WINDOW`] ticks.
    pub fn average(&self) -> Duration {
        if self.window.is_empty() {
            Duration::ZERO
        } else {
            self.window_sum / self.window.len() as u32
        }
    }
}

// ─── Snapshots ──────────────────────────────────────────────────────

/// Coordinator performance snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    /// Current simulation tick.
    pub current_tick: Tick,
    /// Total ticks driven since creation.
    pub total_ticks: u64,
    /// Ticks driven per wall-clock second.
    pub ticks_per_second: f64,
    /// Rolling average fan-out wall time (window = 100 ticks).
    pub average_tick_time: Duration,
    /// Maximum fan-out wall time.
    pub max_tick_time: Duration,
    /// Simulated time elapsed (`current_tick × TICK_DURATION`).
    pub simulation_time: Duration,
    /// Wall-clock time since `start()` (frozen at `stop()`).
    pub real_time_elapsed: Duration,
    /// Current scaling factor.
    pub scaling_factor: f64,
    /// Registered component count.
    pub component_count: usize,
    /// `simulation_time / real_time_elapsed`.
    pub efficiency_ratio: f64,
    /// `average_tick_time / (TICK_DURATION / scaling_factor)`; above 1 the
    /// simulator cannot keep up.
    pub tick_utilization: f64,
    /// Ticks whose fan-out exceeded the scaled interval.
    pub overruns: u64,
}

/// Per-component tick delivery snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryStatus {
    /// Component identifier.
    pub id: String,
    /// Health verdict (misses within threshold, worker live).
    pub healthy: bool,
    /// Ticks queued and not yet consumed.
    pub channel_length: usize,
    /// Tick channel capacity.
    pub channel_capacity: usize,
    /// `channel_length / channel_capacity`.
    pub utilization: f64,
}

// ─── Coordinator ────────────────────────────────────────────────────

struct RunTiming {
    started_at: Option<Instant>,
    frozen_elapsed: Option<Duration>,
}

struct Inner {
    current_tick: AtomicU64,
    total_ticks: AtomicU64,
    scaling_bits: AtomicU64,
    state: Mutex<CoordinatorState>,
    registry: RwLock<BTreeMap<String, crate::component::ComponentHandle>>,
    stats: Mutex<TickStats>,
    timing: Mutex<RunTiming>,
    control_tx: watch::Sender<Control>,
    shutdown_tx: watch::Sender<bool>,
}

impl Inner {
    fn scaling(&self) -> f64 {
        f64::from_bits(self.scaling_bits.load(Ordering::Acquire))
    }

    fn real_elapsed(&self) -> Duration {
        let timing = self.timing.lock();
        timing
            .frozen_elapsed
            .or_else(|| timing.started_at.map(|t| t.elapsed()))
            .unwrap_or(Duration::ZERO)
    }

    /// Stop unconditionally (external cancellation path).
    fn force_stop(&self) {
        let mut state = self.state.lock();
        if *state == CoordinatorState::Stopped {
            return;
        }
        *state = CoordinatorState::Stopped;
        drop(state);

        let mut timing = self.timing.lock();
        if timing.frozen_elapsed.is_none() {
            timing.frozen_elapsed = timing.started_at.map(|t| t.elapsed());
        }
        drop(timing);

        let _ = self.control_tx.send(Control::Stop);
        let _ = self.shutdown_tx.send(true);
        info!("coordinator stopped");
    }
}

/// The global tick coordinator.
///
/// Cheap to clone; all clones share the same simulation. Requires a tokio
/// runtime: `register_component` and `start` spawn tasks.
#[derive(Clone)]
pub struct TickCoordinator {
    inner: Arc<Inner>,
}

impl Default for TickCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl TickCoordinator {
    /// Create an idle coordinator at real-time scaling.
    pub fn new() -> Self {
        let (control_tx, _) = watch::channel(Control::Run);
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                current_tick: AtomicU64::new(0),
                total_ticks: AtomicU64::new(0),
                scaling_bits: AtomicU64::new(1.0f64.to_bits()),
                state: Mutex::new(CoordinatorState::Idle),
                registry: RwLock::new(BTreeMap::new()),
                stats: Mutex::new(TickStats::new()),
                timing: Mutex::new(RunTiming { started_at: None, frozen_elapsed: None }),
                control_tx,
                shutdown_tx,
            }),
        }
    }

    // ── Registry ──

    /// Register a component with the default tick channel capacity and
    /// start its worker.
    pub fn register_component<C: Component>(&self, component: C) -> ClockResult<()> {
        self.register_component_with_capacity(component, DEFAULT_TICK_CHANNEL_CAPACITY)
    }

    /// Register a component with an explicit tick channel capacity
    /// (clamped up to the contract minimum of 100) and start its worker.
    pub fn register_component_with_capacity<C: Component>(
        &self,
        component: C,
        capacity: usize,
    ) -> ClockResult<()> {
        let id = component.id().to_string();
        let mut registry = self.inner.registry.write();
        if registry.contains_key(&id) {
            return Err(CoordinatorError::DuplicateComponent { id });
        }
        let handle =
            ComponentRuntime::spawn(component, capacity, self.inner.shutdown_tx.subscribe());
        info!(
            component_id = %id,
            capacity = handle.tick_channel_capacity(),
            "component registered"
        );
        registry.insert(id, handle);
        Ok(())
    }

    /// Remove a component; its worker drains pending ticks and exits.
    pub fn unregister_component(&self, id: &str) -> ClockResult<()> {
        let handle = self
            .inner
            .registry
            .write()
            .remove(id)
            .ok_or_else(|| CoordinatorError::ComponentNotFound { id: id.to_string() })?;
        info!(component_id = id, "component unregistered");
        tokio::spawn(handle.stop());
        Ok(())
    }

    /// Number of registered components.
    pub fn component_count(&self) -> usize {
        self.inner.registry.read().len()
    }

    /// Clonable sender for a component's operation queue.
    pub fn operation_sender(&self, id: &str) -> Option<mpsc::Sender<Operation>> {
        self.inner.registry.read().get(id).map(|h| h.operation_sender())
    }

    // ── Lifecycle ──

    /// Begin driving ticks. Idle→Running.
    pub fn start(&self) -> ClockResult<()> {
        self.start_with_shutdown(None)
    }

    /// Begin driving ticks under an external root shutdown signal.
    ///
    /// When the signal flips to `true` the loop exits on its next
    /// iteration and every component worker exits at its next select,
    /// exactly as if [`stop`](Self::stop) had been called.
    pub fn start_with_shutdown(
        &self,
        external: Option<watch::Receiver<bool>>,
    ) -> ClockResult<()> {
        {
            let mut state = self.inner.state.lock();
            if *state != CoordinatorState::Idle {
                return Err(CoordinatorError::InvalidState { operation: "start", state: *state });
            }
            *state = CoordinatorState::Running;
        }
        self.inner.timing.lock().started_at = Some(Instant::now());
        let _ = self.inner.control_tx.send(Control::Run);

        let inner = Arc::clone(&self.inner);
        let control_rx = self.inner.control_tx.subscribe();
        tokio::spawn(tick_loop(inner, control_rx, external));
        info!(scaling = self.scaling_factor(), "coordinator started");
        Ok(())
    }

    /// Stop the simulation. Running|Paused→Stopped (terminal).
    pub fn stop(&self) -> ClockResult<()> {
        {
            let state = self.inner.state.lock();
            match *state {
                CoordinatorState::Running | CoordinatorState::Paused => {}
                s => {
                    return Err(CoordinatorError::InvalidState { operation: "stop", state: s });
                }
            }
        }
        self.inner.force_stop();
        Ok(())
    }

    /// Park the tick loop between two ticks. Running→Paused.
    ///
    /// Ticks already delivered to component channels are unaffected.
    pub fn pause(&self) -> ClockResult<()> {
        let mut state = self.inner.state.lock();
        if *state != CoordinatorState::Running {
            return Err(CoordinatorError::InvalidState { operation: "pause", state: *state });
        }
        *state = CoordinatorState::Paused;
        let _ = self.inner.control_tx.send(Control::Pause);
        info!("coordinator paused");
        Ok(())
    }

    /// Resume a paused simulation. Paused→Running.
    pub fn resume(&self) -> ClockResult<()> {
        let mut state = self.inner.state.lock();
        if *state != CoordinatorState::Paused {
            return Err(CoordinatorError::InvalidState { operation: "resume", state: *state });
        }
        *state = CoordinatorState::Running;
        let _ = self.inner.control_tx.send(Control::Run);
        info!("coordinator resumed");
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CoordinatorState {
        *self.inner.state.lock()
    }

    // ── Scaling ──

    /// Set the simulation speed. `x > 1` is faster than real time (the
    /// wall-clock tick interval becomes `TICK_DURATION / x`); `x < 1` is
    /// slow motion. Takes effect at the next loop iteration.
    pub fn set_scaling_factor(&self, x: f64) -> ClockResult<()> {
        if !x.is_finite() || x <= 0.0 {
            return Err(CoordinatorError::InvalidScalingFactor { value: x });
        }
        self.inner.scaling_bits.store(x.to_bits(), Ordering::Release);
        info!(scaling = x, "scaling factor updated");
        Ok(())
    }

    /// Current scaling factor.
    pub fn scaling_factor(&self) -> f64 {
        self.inner.scaling()
    }

    /// Current simulation tick.
    pub fn current_tick(&self) -> Tick {
        self.inner.current_tick.load(Ordering::Acquire)
    }

    // ── Snapshots ──

    /// Coordinator performance snapshot.
    pub fn performance_metrics(&self) -> PerformanceMetrics {
        let current_tick = self.inner.current_tick.load(Ordering::Acquire);
        let total_ticks = self.inner.total_ticks.load(Ordering::Acquire);
        let (average_tick_time, max_tick_time, overruns) = {
            let stats = self.inner.stats.lock();
            (stats.average(), stats.max_tick_time, stats.overruns)
        };
        let real_time_elapsed = self.inner.real_elapsed();
        let scaling_factor = self.inner.scaling();
        let simulation_time = duration_of(current_tick);

        let real_secs = real_time_elapsed.as_secs_f64();
        let ticks_per_second = if real_secs > 0.0 { total_ticks as f64 / real_secs } else { 0.0 };
        let efficiency_ratio =
            if real_secs > 0.0 { simulation_time.as_secs_f64() / real_secs } else { 0.0 };
        let budget = scaled_tick_interval(scaling_factor).as_secs_f64();
        let tick_utilization =
            if budget > 0.0 { average_tick_time.as_secs_f64() / budget } else { 0.0 };

        PerformanceMetrics {
            current_tick,
            total_ticks,
            ticks_per_second,
            average_tick_time,
            max_tick_time,
            simulation_time,
            real_time_elapsed,
            scaling_factor,
            component_count: self.component_count(),
            efficiency_ratio,
            tick_utilization,
            overruns,
        }
    }

    /// Per-component delivery snapshot.
    pub fn delivery_status(&self) -> Vec<DeliveryStatus> {
        self.inner
            .registry
            .read()
            .values()
            .map(|h| {
                let channel_length = h.tick_channel_depth();
                let channel_capacity = h.tick_channel_capacity();
                DeliveryStatus {
                    id: h.id().to_string(),
                    healthy: h.is_healthy(),
                    channel_length,
                    channel_capacity,
                    utilization: channel_length as f64 / channel_capacity as f64,
                }
            })
            .collect()
    }
}

// ─── Tick Loop ──────────────────────────────────────────────────────

async fn tick_loop(
    inner: Arc<Inner>,
    mut control: watch::Receiver<Control>,
    mut external: Option<watch::Receiver<bool>>,
) {
    let mut scaling = inner.scaling();
    let mut interval = tokio::time::interval(scaled_tick_interval(scaling));
    interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
    debug!(scaling, "tick loop entered");

    loop {
        // Copy the control word out so the watch guard never crosses an
        // await point.
        let ctl = *control.borrow();
        match ctl {
            Control::Stop => break,
            Control::Pause => {
                // Park between two ticks; realign the timer on resume so
                // the paused span is not replayed as a burst.
                if control.changed().await.is_err() {
                    break;
                }
                interval.reset();
                continue;
            }
            Control::Run => {}
        }

        let now_scaling = inner.scaling();
        if now_scaling != scaling {
            scaling = now_scaling;
            interval = tokio::time::interval(scaled_tick_interval(scaling));
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        }

        tokio::select! {
            _ = interval.tick() => {
                run_one_tick(&inner, scaling).await;
            }
            res = control.changed() => {
                if res.is_err() {
                    break;
                }
            }
            cancelled = wait_external(external.as_mut()) => {
                if cancelled {
                    inner.force_stop();
                    break;
                }
                // Sender dropped without cancelling: ignore it from now on.
                external = None;
            }
        }
    }

    debug!(final_tick = inner.current_tick.load(Ordering::Acquire), "tick loop exited");
}

/// Resolve to `true` when the external signal flips to cancelled, `false`
/// when its sender is dropped, and never when there is no signal.
async fn wait_external(external: Option<&mut watch::Receiver<bool>>) -> bool {
    match external {
        Some(rx) => loop {
            if rx.changed().await.is_err() {
                return false;
            }
            if *rx.borrow() {
                return true;
            }
        },
        None => std::future::pending().await,
    }
}

async fn run_one_tick(inner: &Arc<Inner>, scaling: f64) {
    let tick = inner.current_tick.fetch_add(1, Ordering::AcqRel) + 1;
    inner.total_ticks.fetch_add(1, Ordering::AcqRel);

    // Snapshot under the read lock; release before any send.
    let snapshot: Vec<(String, mpsc::Sender<Tick>, Arc<HealthCell>)> = {
        let registry = inner.registry.read();
        registry
            .values()
            .map(|h| (h.id().to_string(), h.tick_sender(), h.health()))
            .collect()
    };

    let started = Instant::now();
    let mut deliveries = JoinSet::new();
    for (id, tx, health) in snapshot {
        deliveries.spawn(deliver_tick(id, tx, health, tick));
    }
    while let Some(joined) = deliveries.join_next().await {
        if let Err(e) = joined {
            if e.is_panic() {
                // The loop survives anything a delivery task does.
                error!(tick, "tick delivery task panicked");
            }
        }
    }

    let elapsed = started.elapsed();
    inner.stats.lock().record(elapsed, scaled_tick_interval(scaling));
}

async fn deliver_tick(
    id: String,
    tx: mpsc::Sender<Tick>,
    health: Arc<HealthCell>,
    tick: Tick,
) {
    match tx.send_timeout(tick, TICK_DELIVERY_TIMEOUT).await {
        Ok(()) => health.on_delivered(),
        Err(SendTimeoutError::Timeout(_)) => {
            let consecutive_misses = health.on_missed();
            error!(
                component_id = %id,
                tick,
                consecutive_misses,
                "tick delivery timed out; tick dropped"
            );
        }
        Err(SendTimeoutError::Closed(_)) => {
            debug!(component_id = %id, tick, "tick channel closed; worker gone");
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pulse::consts::TICK_DURATION;

    struct Noop(String);

    impl Component for Noop {
        fn id(&self) -> &str {
            &self.0
        }

        fn process_tick(&mut self, _tick: Tick) {}
    }

    #[test]
    fn tick_stats_window_and_max() {
        let mut stats = TickStats::new();
        let budget = Duration::from_micros(10);
        assert_eq!(stats.average(), Duration::ZERO);

        stats.record(Duration::from_micros(4), budget);
        stats.record(Duration::from_micros(6), budget);
        assert_eq!(stats.average(), Duration::from_micros(5));
        assert_eq!(stats.max_tick_time, Duration::from_micros(6));
        assert_eq!(stats.overruns, 0);

        stats.record(Duration::from_micros(12), budget);
        assert_eq!(stats.overruns, 1);
        assert_eq!(stats.max_tick_time, Duration::from_micros(12));
    }

    #[test]
    fn tick_stats_window_evicts_old_samples() {
        let mut stats = TickStats::new();
        let budget = Duration::from_secs(1);
        for _ in 0..TICK_STATS_WINDOW {
            stats.record(Duration::from_micros(100), budget);
        }
        // A window full of 100 µs samples then 100 fresh 10 µs samples
        // shifts the average all the way down.
        for _ in 0..TICK_STATS_WINDOW {
            stats.record(Duration::from_micros(10), budget);
        }
        assert_eq!(stats.average(), Duration::from_micros(10));
        assert_eq!(stats.window.len(), TICK_STATS_WINDOW);
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let coordinator = TickCoordinator::new();
        coordinator.register_component(Noop("a".into())).unwrap();
        let err = coordinator.register_component(Noop("a".into())).unwrap_err();
        assert!(matches!(err, CoordinatorError::DuplicateComponent { id } if id == "a"));
    }

    #[tokio::test]
    async fn unregister_unknown_component_fails() {
        let coordinator = TickCoordinator::new();
        let err = coordinator.unregister_component("ghost").unwrap_err();
        assert!(matches!(err, CoordinatorError::ComponentNotFound { .. }));
    }

    #[tokio::test]
    async fn lifecycle_transitions_are_enforced() {
        let coordinator = TickCoordinator::new();

        // Idle: only start is valid.
        assert!(matches!(
            coordinator.stop().unwrap_err(),
            CoordinatorError::InvalidState { operation: "stop", .. }
        ));
        assert!(matches!(
            coordinator.pause().unwrap_err(),
            CoordinatorError::InvalidState { operation: "pause", .. }
        ));

        coordinator.start().unwrap();
        assert_eq!(coordinator.state(), CoordinatorState::Running);
        assert!(matches!(
            coordinator.start().unwrap_err(),
            CoordinatorError::InvalidState { operation: "start", .. }
        ));

        coordinator.pause().unwrap();
        assert_eq!(coordinator.state(), CoordinatorState::Paused);
        assert!(matches!(
            coordinator.pause().unwrap_err(),
            CoordinatorError::InvalidState { operation: "pause", .. }
        ));
        coordinator.resume().unwrap();

        coordinator.stop().unwrap();
        assert_eq!(coordinator.state(), CoordinatorState::Stopped);
        // Stopped is terminal.
        assert!(coordinator.start().is_err());
        assert!(coordinator.resume().is_err());
        assert!(coordinator.stop().is_err());
    }

    #[tokio::test]
    async fn scaling_factor_is_validated() {
        let coordinator = TickCoordinator::new();
        assert!(coordinator.set_scaling_factor(0.0).is_err());
        assert!(coordinator.set_scaling_factor(-2.0).is_err());
        assert!(coordinator.set_scaling_factor(f64::NAN).is_err());
        assert!(coordinator.set_scaling_factor(f64::INFINITY).is_err());
        coordinator.set_scaling_factor(4.0).unwrap();
        assert_eq!(coordinator.scaling_factor(), 4.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn pause_stops_tick_advance() {
        let coordinator = TickCoordinator::new();
        coordinator.start().unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        coordinator.pause().unwrap();
        // Let the loop observe the pause, then confirm the tick is frozen.
        tokio::time::sleep(Duration::from_millis(5)).await;
        let frozen = coordinator.current_tick();
        assert!(frozen > 0);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(coordinator.current_tick(), frozen);

        coordinator.resume().unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(coordinator.current_tick() > frozen);
        coordinator.stop().unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn external_shutdown_stops_the_loop() {
        let coordinator = TickCoordinator::new();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        coordinator.start_with_shutdown(Some(cancel_rx)).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        cancel_tx.send(true).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(coordinator.state(), CoordinatorState::Stopped);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn performance_metrics_are_consistent() {
        let coordinator = TickCoordinator::new();
        coordinator.register_component(Noop("m".into())).unwrap();
        coordinator.start().unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        coordinator.stop().unwrap();
        // Let the loop finish its in-flight tick before sampling.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let m = coordinator.performance_metrics();
        assert!(m.current_tick > 0);
        assert_eq!(m.current_tick, m.total_ticks);
        assert_eq!(m.simulation_time, TICK_DURATION * m.current_tick as u32);
        assert!(m.real_time_elapsed > Duration::ZERO);
        assert!(m.ticks_per_second > 0.0);
        assert_eq!(m.component_count, 1);
        assert!(m.efficiency_ratio > 0.0);
    }
}
