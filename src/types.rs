//! Shared primitive IDs and order lifecycle enums.

use serde::{Deserialize, Serialize};

/// Monotonic order identifier.
pub type OrderId = u64;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted and waiting in the dispatch queue.
    Registered,
    /// Handed off from the front of the queue.
    Dispatched,
    /// Withdrawn by the caller.
    Cancelled,
}

impl OrderStatus {
    /// True for statuses that belong in the dispatch queue.
    ///
    /// Rollback re-enqueues an order exactly when its restored status is
    /// pending in this sense.
    pub fn is_pending(self) -> bool {
        matches!(self, OrderStatus::Registered)
    }
}
