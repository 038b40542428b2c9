//! Per-component worker runtime.
//!
//! Each registered component is owned exclusively by one worker task that
//! consumes its bounded tick channel. The coordinator holds a
//! [`ComponentHandle`] for delivery and health inspection only; component
//! state is never shared.
//!
//! ## Worker loop
//!
//! The worker selects between three suspension points and nothing else:
//! an incoming tick (drive one simulation step), an incoming operation
//! (enqueue into component-local state), and the shutdown signal (drain
//! pending ticks, exit). Ticks arrive strictly increasing per component
//! because the channel is FIFO and the coordinator sends sequentially per
//! channel.
//!
//! A panic inside the component callback is caught, the component is marked
//! unhealthy, and the worker exits; the coordinator keeps running.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use pulse::consts::{
    DEFAULT_OPERATION_CHANNEL_CAPACITY, MIN_TICK_CHANNEL_CAPACITY, MISSED_TICK_THRESHOLD,
};
use pulse::op::Operation;
use pulse::time::Tick;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, warn};

/// A simulation entity driven by the tick coordinator.
///
/// Implementations own all of their state; `process_tick` may mutate
/// component-local state only and must return in well under one tick
/// duration on average.
pub trait Component: Send + 'static {
    /// Stable identifier, unique within a coordinator.
    fn id(&self) -> &str;

    /// Advance local state by one simulation step.
    fn process_tick(&mut self, tick: Tick);

    /// Accept an operation into the component's input queue.
    ///
    /// Tick-only components can ignore this.
    fn enqueue_operation(&mut self, _op: Operation) {}
}

// ─── Health Tracking ────────────────────────────────────────────────

/// Shared health state for one component.
///
/// Written by the coordinator (delivery outcomes) and the worker
/// (liveness); read by health snapshots. Lock-free.
#[derive(Debug)]
pub struct HealthCell {
    consecutive_misses: AtomicU32,
    alive: AtomicBool,
    panicked: AtomicBool,
}

impl HealthCell {
    fn new() -> Self {
        Self {
            consecutive_misses: AtomicU32::new(0),
            alive: AtomicBool::new(true),
            panicked: AtomicBool::new(false),
        }
    }

    /// Record an on-time delivery: the consecutive-miss run ends.
    pub(crate) fn on_delivered(&self) {
        self.consecutive_misses.store(0, Ordering::Release);
    }

    /// Record a dropped tick. Returns the new consecutive-miss count.
    pub(crate) fn on_missed(&self) -> u32 {
        self.consecutive_misses.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn mark_exited(&self) {
        self.alive.store(false, Ordering::Release);
    }

    pub(crate) fn mark_panicked(&self) {
        self.panicked.store(true, Ordering::Release);
        self.alive.store(false, Ordering::Release);
    }

    /// Consecutive missed deliveries since the last success.
    pub fn consecutive_misses(&self) -> u32 {
        self.consecutive_misses.load(Ordering::Acquire)
    }

    /// Worker task is still running.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Worker unwound out of a component callback.
    pub fn has_panicked(&self) -> bool {
        self.panicked.load(Ordering::Acquire)
    }

    /// Healthy iff the worker is live and the consecutive-miss run is
    /// within the threshold.
    pub fn is_healthy(&self) -> bool {
        self.is_alive() && self.consecutive_misses() <= MISSED_TICK_THRESHOLD
    }
}

// ─── Component Handle ───────────────────────────────────────────────

/// Coordinator-side handle to a spawned component.
///
/// Dropping the handle closes the component's channels; the worker drains
/// and exits on its own.
#[derive(Debug)]
pub struct ComponentHandle {
    id: String,
    tick_tx: mpsc::Sender<Tick>,
    op_tx: mpsc::Sender<Operation>,
    health: Arc<HealthCell>,
    worker: tokio::task::JoinHandle<()>,
}

impl ComponentHandle {
    /// Component identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current health verdict (consecutive misses within threshold and
    /// worker live).
    pub fn is_healthy(&self) -> bool {
        self.health.is_healthy()
    }

    /// Shared health cell, for delivery bookkeeping and snapshots.
    pub fn health(&self) -> Arc<HealthCell> {
        Arc::clone(&self.health)
    }

    /// Sender for the component's bounded tick channel.
    pub(crate) fn tick_sender(&self) -> mpsc::Sender<Tick> {
        self.tick_tx.clone()
    }

    /// Submit an operation without blocking. On a full or closed queue the
    /// operation is handed back to the caller.
    pub fn try_send_operation(&self, op: Operation) -> Result<(), Operation> {
        self.op_tx.try_send(op).map_err(|e| match e {
            mpsc::error::TrySendError::Full(op) | mpsc::error::TrySendError::Closed(op) => op,
        })
    }

    /// Clonable sender for the component's operation queue.
    pub fn operation_sender(&self) -> mpsc::Sender<Operation> {
        self.op_tx.clone()
    }

    /// Ticks currently queued and not yet consumed by the worker.
    pub fn tick_channel_depth(&self) -> usize {
        self.tick_tx.max_capacity() - self.tick_tx.capacity()
    }

    /// Total tick channel capacity.
    pub fn tick_channel_capacity(&self) -> usize {
        self.tick_tx.max_capacity()
    }

    /// Close the component's channels and wait for the worker to drain
    /// pending ticks and exit.
    pub async fn stop(self) {
        let Self { id, tick_tx, op_tx, worker, .. } = self;
        drop(tick_tx);
        drop(op_tx);
        if let Err(e) = worker.await {
            if e.is_panic() {
                error!(component_id = %id, "component worker panicked during shutdown");
            }
        }
    }
}

// ─── Worker ─────────────────────────────────────────────────────────

/// Spawns component workers and wires their channels.
pub struct ComponentRuntime;

impl ComponentRuntime {
    /// Spawn the worker for `component` under the given shutdown signal.
    ///
    /// `tick_capacity` below the contract minimum of
    /// [`MIN_TICK_CHANNEL_CAPACITY`] is clamped up to it.
    pub fn spawn<C: Component>(
        component: C,
        tick_capacity: usize,
        shutdown: watch::Receiver<bool>,
    ) -> ComponentHandle {
        let capacity = if tick_capacity < MIN_TICK_CHANNEL_CAPACITY {
            warn!(
                component_id = component.id(),
                requested = tick_capacity,
                clamped = MIN_TICK_CHANNEL_CAPACITY,
                "tick channel capacity below contract minimum"
            );
            MIN_TICK_CHANNEL_CAPACITY
        } else {
            tick_capacity
        };

        let (tick_tx, tick_rx) = mpsc::channel(capacity);
        let (op_tx, op_rx) = mpsc::channel(DEFAULT_OPERATION_CHANNEL_CAPACITY);
        let health = Arc::new(HealthCell::new());
        let id = component.id().to_string();

        let worker = tokio::spawn(worker_loop(
            component,
            tick_rx,
            op_rx,
            shutdown,
            Arc::clone(&health),
        ));

        ComponentHandle { id, tick_tx, op_tx, health, worker }
    }
}

async fn worker_loop<C: Component>(
    mut component: C,
    mut tick_rx: mpsc::Receiver<Tick>,
    mut op_rx: mpsc::Receiver<Operation>,
    mut shutdown: watch::Receiver<bool>,
    health: Arc<HealthCell>,
) {
    let id = component.id().to_string();
    let mut last_tick: Option<Tick> = None;
    let mut ops_open = true;

    loop {
        tokio::select! {
            res = shutdown.changed() => {
                // A dropped shutdown sender counts as a shutdown request.
                if res.is_err() || *shutdown.borrow() {
                    drain_pending(&mut component, &mut tick_rx, &health, &mut last_tick);
                    break;
                }
            }
            maybe_tick = tick_rx.recv() => match maybe_tick {
                Some(tick) => {
                    if !run_tick(&mut component, tick, &health, &mut last_tick) {
                        break;
                    }
                }
                // Channel closed: the component was unregistered.
                None => break,
            },
            maybe_op = op_rx.recv(), if ops_open => match maybe_op {
                Some(op) => {
                    if catch_unwind(AssertUnwindSafe(|| component.enqueue_operation(op)))
                        .is_err()
                    {
                        error!(component_id = %id, "component panicked in enqueue_operation");
                        health.mark_panicked();
                        break;
                    }
                }
                None => ops_open = false,
            },
        }
    }

    health.mark_exited();
    debug!(component_id = %id, last_tick, "component worker exited");
}

/// Run one tick through the component, recovering from panics.
///
/// Returns `false` when the worker must exit.
fn run_tick<C: Component>(
    component: &mut C,
    tick: Tick,
    health: &HealthCell,
    last_tick: &mut Option<Tick>,
) -> bool {
    // FIFO channel + sequential sender: per-component ticks are strictly
    // increasing. Dropped ticks may create gaps, never reordering.
    debug_assert!(last_tick.is_none_or(|t| tick > t));
    *last_tick = Some(tick);

    match catch_unwind(AssertUnwindSafe(|| component.process_tick(tick))) {
        Ok(()) => true,
        Err(_) => {
            error!(component_id = component.id(), tick, "component panicked in process_tick");
            health.mark_panicked();
            false
        }
    }
}

/// Consume ticks already delivered to the channel before exiting.
fn drain_pending<C: Component>(
    component: &mut C,
    tick_rx: &mut mpsc::Receiver<Tick>,
    health: &HealthCell,
    last_tick: &mut Option<Tick>,
) {
    while let Ok(tick) = tick_rx.try_recv() {
        if !run_tick(component, tick, health, last_tick) {
            return;
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
