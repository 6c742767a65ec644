//! Order domain record and create payload.

use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus};

/// Fully materialized, authoritative order record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Stable order identifier, never reused.
    pub id: OrderId,
    /// Name of the ordering customer.
    pub customer_name: String,
    /// Free-text description of the order contents.
    pub description: String,
    /// Order amount, strictly positive at creation.
    pub amount: f64,
    /// Current lifecycle status.
    pub status: OrderStatus,
}

/// Create payload used to register a new [`OrderRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// Name of the ordering customer.
    pub customer_name: String,
    /// Free-text description of the order contents.
    pub description: String,
    /// Order amount, strictly positive.
    pub amount: f64,
}
