//! Admission control for forwarded connections.
//!
//! # Responsibilities
//! - Own the count of currently forwarded connections
//! - Admit or reject new connections against a fixed ceiling
//! - Release each admitted slot exactly once
//!
//! # Design Decisions
//! - Check-and-increment is a single compare-and-swap; the runtime is
//!   multi-threaded so a separate load and add would overshoot the ceiling
//! - Release is tied to `Drop` of the permit, so every terminal path of a
//!   forwarded connection (end of stream, client abort, upstream error,
//!   panic) gives the slot back
//! - Rejection never queues; the caller retries

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::observability::metrics;

/// Global atomic counter for connection IDs.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifier of one admitted connection, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Bounded admission gate in front of a single upstream.
#[derive(Debug)]
pub struct ConnectionGate {
    active: AtomicUsize,
    max_connections: usize,
}

impl ConnectionGate {
    /// Create a gate admitting at most `max_connections` at once.
    pub fn new(max_connections: usize) -> Self {
        Self {
            active: AtomicUsize::new(0),
            max_connections,
        }
    }

    /// Try to take a slot.
    ///
    /// Returns `None` without touching the count when the gate is full.
    pub fn try_admit(self: &Arc<Self>) -> Option<AdmissionPermit> {
        let mut current = self.active.load(Ordering::Acquire);
        loop {
            if current >= self.max_connections {
                tracing::info!(
                    active = current,
                    max_connections = self.max_connections,
                    "Gate full, rejecting connection"
                );
                metrics::record_gate_rejection();
                return None;
            }
            match self.active.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        let id = ConnectionId::next();
        tracing::info!(connection_id = %id, active = current + 1, "Connection admitted");
        metrics::record_gate_admission(current + 1);

        Some(AdmissionPermit {
            gate: Arc::clone(self),
            id,
        })
    }

    /// Number of currently admitted connections.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Configured ceiling.
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    fn release(&self, id: ConnectionId) {
        let previous = self.active.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "gate released more slots than admitted");
        tracing::info!(connection_id = %id, active = previous - 1, "Connection closed");
        metrics::record_gate_release(previous - 1);
    }
}

/// A held gate slot.
///
/// Dropping the permit releases the slot. It is neither `Clone` nor
/// `Copy`, so each admission is released exactly once.
#[derive(Debug)]
pub struct AdmissionPermit {
    gate: Arc<ConnectionGate>,
    id: ConnectionId,
}

impl AdmissionPermit {
    /// This connection's ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.gate.release(self.id);
    }
}
