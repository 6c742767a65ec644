use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    op::Operation,
    order::{OrderDraft, OrderRecord},
    types::{OrderId, OrderStatus},
};

use super::{history::OperationHistory, queue::DispatchQueue, store::OrderStore};

/// Failure taxonomy for service operations.
///
/// Every variant leaves the ledger untouched: an operation either completes
/// its store, queue, and history updates or none of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Input rejected before any state changed. Names the offending field.
    #[error("{field} {problem}")]
    Validation {
        /// Draft field that failed validation.
        field: &'static str,
        /// What was wrong with it.
        problem: &'static str,
    },
    /// No order with the requested id.
    #[error("order {0} not found")]
    NotFound(OrderId),
    /// The operation cannot proceed given current state.
    #[error("{0}")]
    Conflict(&'static str),
}

/// Aggregate counters computed in one pass over the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderStats {
    /// Number of orders ever registered and still in the ledger.
    pub total: usize,
    /// Sum of amounts over all orders.
    pub total_amount: f64,
    /// Sum of amounts excluding cancelled orders.
    pub total_amount_active: f64,
    /// Orders currently registered.
    pub registered: usize,
    /// Orders dispatched.
    pub dispatched: usize,
    /// Orders cancelled.
    pub cancelled: usize,
}

/// Orchestrator owning the order store, the dispatch queue, the operation
/// history, and the id counter.
///
/// Every mutating operation validates, mutates the store, adjusts the queue,
/// and pushes a before/after snapshot onto the history, in that order.
/// [`OrderService::rollback_last`] pops the history and replays the inverse.
#[derive(Debug)]
pub struct OrderService {
    store: OrderStore,
    queue: DispatchQueue,
    history: OperationHistory,
    next_id: OrderId,
}

impl Default for OrderService {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderService {
    pub fn new() -> Self {
        Self {
            store: OrderStore::new(),
            queue: DispatchQueue::new(),
            history: OperationHistory::new(),
            next_id: 1,
        }
    }

    /// Registers a new order, enqueues it at the back, and records the
    /// creation.
    ///
    /// Ids are sequential starting at 1 and are never reused, even after the
    /// creation is rolled back.
    pub fn create(&mut self, draft: OrderDraft) -> Result<OrderRecord, ServiceError> {
        validate(&draft)?;

        let id = self.next_id;
        self.next_id += 1;

        let rec = OrderRecord {
            id,
            customer_name: draft.customer_name,
            description: draft.description,
            amount: draft.amount,
            status: OrderStatus::Registered,
        };

        self.store.insert(rec.clone());
        self.queue.enqueue_back(id);
        self.history.push(Operation::Create { after: rec.clone() });
        tracing::debug!(id, amount = rec.amount, "order registered");
        Ok(rec)
    }

    /// All orders in creation order, unfiltered.
    pub fn list(&self) -> Vec<&OrderRecord> {
        self.store.iter().collect()
    }

    pub fn list_cloned(&self) -> Vec<OrderRecord> {
        self.store.iter().cloned().collect()
    }

    pub fn get(&self, id: OrderId) -> Result<&OrderRecord, ServiceError> {
        self.store.get(id).ok_or(ServiceError::NotFound(id))
    }

    pub fn get_cloned(&self, id: OrderId) -> Result<OrderRecord, ServiceError> {
        self.get(id).cloned()
    }

    /// Cancels the order, pulling it from the queue wherever it sits.
    ///
    /// Cancel is status-blind: an already dispatched or cancelled order is
    /// flipped to `Cancelled` again and a history record is still pushed.
    pub fn cancel(&mut self, id: OrderId) -> Result<OrderRecord, ServiceError> {
        let rec = self.store.get_mut(id).ok_or(ServiceError::NotFound(id))?;

        let before = rec.clone();
        rec.status = OrderStatus::Cancelled;
        let after = rec.clone();

        self.queue.remove(id);
        self.history.push(Operation::Cancel {
            before,
            after: after.clone(),
        });
        tracing::debug!(id, "order cancelled");
        Ok(after)
    }

    /// Dispatches the order at the front of the queue.
    ///
    /// Pending orders are served strictly FIFO by enqueue time; ids removed
    /// by cancellation are simply no longer there to dispatch.
    pub fn dispatch_next(&mut self) -> Result<OrderRecord, ServiceError> {
        let id = self
            .queue
            .dequeue_front()
            .ok_or(ServiceError::Conflict("queue empty"))?;

        let Some(rec) = self.store.get_mut(id) else {
            // A queued id must exist in the store; put it back so the
            // failed dispatch leaves no visible mutation.
            self.queue.enqueue_front(id);
            return Err(ServiceError::Conflict("inconsistent state"));
        };

        let before = rec.clone();
        rec.status = OrderStatus::Dispatched;
        let after = rec.clone();

        self.history.push(Operation::Dispatch {
            before,
            after: after.clone(),
        });
        tracing::debug!(id, "order dispatched");
        Ok(after)
    }

    /// Undoes the single most recent mutating operation, whichever order it
    /// touched.
    ///
    /// Creation is undone by deleting the order outright. Cancel and dispatch
    /// are undone by restoring the prior status and, when that status is
    /// pending, re-enqueueing: at the back for a cancel, at the front for a
    /// dispatch so the order regains its original place in line.
    pub fn rollback_last(&mut self) -> Result<OrderRecord, ServiceError> {
        let op = self
            .history
            .pop()
            .ok_or(ServiceError::Conflict("nothing to rollback"))?;

        let rec = match op {
            Operation::Create { after } => {
                self.store.remove(after.id);
                self.queue.remove(after.id);
                after
            }
            Operation::Cancel { before, .. } => self.restore(before, Reinsert::Back)?,
            Operation::Dispatch { before, .. } => self.restore(before, Reinsert::Front)?,
        };

        tracing::debug!(id = rec.id, "operation rolled back");
        Ok(rec)
    }

    fn restore(
        &mut self,
        before: OrderRecord,
        position: Reinsert,
    ) -> Result<OrderRecord, ServiceError> {
        let rec = self
            .store
            .get_mut(before.id)
            .ok_or(ServiceError::Conflict("inconsistent state"))?;

        rec.status = before.status;
        let restored = rec.clone();

        if restored.status.is_pending() {
            // Remove first in case the id is somehow still queued.
            self.queue.remove(restored.id);
            match position {
                Reinsert::Back => self.queue.enqueue_back(restored.id),
                Reinsert::Front => self.queue.enqueue_front(restored.id),
            }
        }

        Ok(restored)
    }

    /// Computes all six aggregate values in a single pass over the ledger.
    pub fn stats(&self) -> OrderStats {
        let mut stats = OrderStats::default();

        for rec in self.store.iter() {
            stats.total += 1;
            stats.total_amount += rec.amount;
            if rec.status != OrderStatus::Cancelled {
                stats.total_amount_active += rec.amount;
            }
            match rec.status {
                OrderStatus::Registered => stats.registered += 1,
                OrderStatus::Dispatched => stats.dispatched += 1,
                OrderStatus::Cancelled => stats.cancelled += 1,
            }
        }

        stats
    }

    /// Sums every order amount by per-element recursion over the
    /// materialized list: head amount plus the sum of the remainder, with an
    /// empty remainder summing to 0.
    ///
    /// Recursion depth equals the order count, so a very large ledger can
    /// exhaust the stack.
    pub fn total_amount_recursive(&self) -> f64 {
        let amounts: Vec<f64> = self.store.iter().map(|rec| rec.amount).collect();
        sum_remainder(&amounts)
    }

    /// Number of orders in the ledger.
    pub fn count(&self) -> usize {
        self.store.len()
    }

    /// Queued ids front to back, for callers that inspect dispatch order.
    pub fn queued_ids(&self) -> Vec<OrderId> {
        self.queue.iter().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

/// Where a rolled-back order re-enters the queue.
enum Reinsert {
    Back,
    Front,
}

fn validate(draft: &OrderDraft) -> Result<(), ServiceError> {
    if draft.customer_name.trim().is_empty() {
        return Err(ServiceError::Validation {
            field: "customer_name",
            problem: "must not be empty",
        });
    }
    if draft.description.trim().is_empty() {
        return Err(ServiceError::Validation {
            field: "description",
            problem: "must not be empty",
        });
    }
    if draft.amount <= 0.0 {
        return Err(ServiceError::Validation {
            field: "amount",
            problem: "must be greater than zero",
        });
    }
    Ok(())
}

fn sum_remainder(amounts: &[f64]) -> f64 {
    match amounts.split_first() {
        None => 0.0,
        Some((head, rest)) => head + sum_remainder(rest),
    }
}
