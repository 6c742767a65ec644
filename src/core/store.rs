use hashbrown::HashMap;

use crate::{order::OrderRecord, types::OrderId};

/// Insertion-ordered collection of every order ever registered, keyed by id.
///
/// Enumeration order equals creation order; cancel, dispatch, and rollback
/// never reorder it. Orders only leave the store when their creation is
/// rolled back.
#[derive(Debug, Default)]
pub struct OrderStore {
    records: HashMap<OrderId, OrderRecord>,
    order: Vec<OrderId>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record at the end of the enumeration order.
    ///
    /// Ids are issued by the service, so an id is inserted at most once.
    pub fn insert(&mut self, rec: OrderRecord) {
        self.order.push(rec.id);
        self.records.insert(rec.id, rec);
    }

    pub fn get(&self, id: OrderId) -> Option<&OrderRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: OrderId) -> Option<&mut OrderRecord> {
        self.records.get_mut(&id)
    }

    /// Removes and returns the record, unlinking it from the enumeration
    /// order. Returns `None` when the id is unknown.
    pub fn remove(&mut self, id: OrderId) -> Option<OrderRecord> {
        let rec = self.records.remove(&id)?;
        if let Some(pos) = self.order.iter().position(|x| *x == id) {
            self.order.remove(pos);
        }
        Some(rec)
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.records.contains_key(&id)
    }

    /// Iterates records in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &OrderRecord> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
