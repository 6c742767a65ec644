//! Mutating operation records kept by the undo history.

use serde::{Deserialize, Serialize};

use crate::order::OrderRecord;

/// Immutable record of one mutating service operation.
///
/// Snapshots are owned copies taken before the record is pushed, so later
/// mutation of the live order never alters history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// A new order was registered and enqueued.
    Create {
        /// Snapshot of the order as created.
        after: OrderRecord,
    },
    /// An order was cancelled and pulled from the queue.
    Cancel {
        /// Snapshot prior to cancellation.
        before: OrderRecord,
        /// Snapshot after cancellation.
        after: OrderRecord,
    },
    /// The queue head was dispatched.
    Dispatch {
        /// Snapshot prior to dispatch.
        before: OrderRecord,
        /// Snapshot after dispatch.
        after: OrderRecord,
    },
}
