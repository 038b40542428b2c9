//! CPU-backed simulation component.
//!
//! [`CpuComponent`] bridges the tick coordinator and the engine: it owns
//! one [`CpuEngine`] (the single-owner contract by construction) and a
//! FIFO of pending operations. Each tick it completes the in-flight
//! operation once its completion tick arrives — emitting the
//! [`OperationResult`] on an unbounded channel — and starts the next
//! queued one by consulting the engine.
//!
//! Operations execute one at a time per component: the engine's parallel
//! stage already models intra-operation concurrency, and per-component
//! FIFO order is part of the runtime contract.

use std::collections::VecDeque;

use pulse::op::{Operation, OperationResult};
use pulse::time::Tick;
use pulse_clock::Component;
use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::CpuEngine;

/// A component that processes operations through a CPU engine.
pub struct CpuComponent {
    id: String,
    engine: CpuEngine,
    pending: VecDeque<Operation>,
    in_flight: Option<OperationResult>,
    results_tx: mpsc::UnboundedSender<OperationResult>,
    completed: u64,
}

impl CpuComponent {
    /// Create a component around an engine. The returned receiver yields
    /// one [`OperationResult`] per completed operation.
    pub fn new(
        id: impl Into<String>,
        engine: CpuEngine,
    ) -> (Self, mpsc::UnboundedReceiver<OperationResult>) {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        (
            Self {
                id: id.into(),
                engine,
                pending: VecDeque::new(),
                in_flight: None,
                results_tx,
                completed: 0,
            },
            results_rx,
        )
    }

    /// The wrapped engine, for configuration before registration.
    pub fn engine_mut(&mut self) -> &mut CpuEngine {
        &mut self.engine
    }

    /// Operations completed so far.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Operations queued and not yet started.
    pub fn queue_depth(&self) -> usize {
        self.pending.len()
    }
}

impl Component for CpuComponent {
    fn id(&self) -> &str {
        &self.id
    }

    fn process_tick(&mut self, tick: Tick) {
        // Finish the in-flight operation once its tick arrives.
        if let Some(result) = self.in_flight.take_if(|r| tick >= r.completion_tick) {
            self.completed += 1;
            debug!(
                component_id = %self.id,
                operation_id = %result.operation_id,
                tick,
                "operation completed"
            );
            // A dropped receiver just means nobody is listening anymore.
            let _ = self.results_tx.send(result);
        }

        // Start the next queued operation.
        if self.in_flight.is_none() {
            if let Some(op) = self.pending.pop_front() {
                self.in_flight = Some(self.engine.process_operation(&op, tick));
            }
        }
    }

    fn enqueue_operation(&mut self, op: Operation) {
        self.pending.push_back(op);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
