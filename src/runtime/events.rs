//! Runtime event stream payloads.

use crate::types::OrderId;

/// Events emitted from the single-writer service loop after each successful
/// mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    /// A new order entered the ledger and the queue.
    Created {
        /// Created order id.
        id: OrderId,
    },
    /// An order was cancelled.
    Cancelled {
        /// Cancelled order id.
        id: OrderId,
    },
    /// The queue head was dispatched.
    Dispatched {
        /// Dispatched order id.
        id: OrderId,
    },
    /// The most recent operation was undone.
    RolledBack {
        /// Id of the order the undone operation touched.
        id: OrderId,
    },
}
