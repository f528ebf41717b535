//! Stock reservations taken during placement, and the outbox of compensations that
//! could not be delivered.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// Stock removed from the inventory on behalf of an order that is not yet persisted.
///
/// Also recorded for a decrement whose outcome is unknown (timed out, connection lost);
/// releasing it by `reservation_id` is a no-op if the decrement never applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub reservation_id: String,
    pub product_id: String,
    pub restaurant_id: String,
    pub amount: u32,
}

/// A compensating stock increment that failed and is waiting to be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingCompensation {
    pub reservation_id: String,
    pub product_id: String,
    pub restaurant_id: String,
    pub amount: u32,
    /// The error that triggered the compensation.
    pub reason: String,
    /// Delivery attempts made so far.
    pub attempts: u32,
}

impl PendingCompensation {
    pub fn new(reservation: &Reservation, reason: impl Into<String>) -> Self {
        Self {
            reservation_id: reservation.reservation_id.clone(),
            product_id: reservation.product_id.clone(),
            restaurant_id: reservation.restaurant_id.clone(),
            amount: reservation.amount,
            reason: reason.into(),
            attempts: 1,
        }
    }
}

/// In-memory outbox shared by every clone of the orchestrator.
#[derive(Clone, Default)]
pub struct CompensationOutbox {
    pending: Arc<Mutex<Vec<PendingCompensation>>>,
}

impl CompensationOutbox {
    pub fn push(&self, entry: PendingCompensation) {
        self.pending.lock().push(entry);
    }

    /// Takes every pending entry, leaving the outbox empty.
    pub fn drain(&self) -> Vec<PendingCompensation> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn snapshot(&self) -> Vec<PendingCompensation> {
        self.pending.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

/// Outcome of one [`retry_compensations`](super::OrderOrchestrator::retry_compensations) pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RetryReport {
    pub succeeded: usize,
    pub requeued: usize,
}
