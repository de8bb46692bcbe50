use std::collections::BTreeMap;

use crate::models::RecordId;

/// Id-keyed record map with its own id counter.
///
/// Ids start at 1, grow by one per insert and are never handed out twice,
/// even after the record holding them is removed. Iteration is in id order,
/// which is creation order.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    records: BTreeMap<RecordId, T>,
    next_id: RecordId,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { records: BTreeMap::new(), next_id: 1 }
    }
}

impl<T: Clone> Collection<T> {
    pub fn new() -> Self { Self::default() }

    /// All records in creation order.
    pub fn list(&self) -> Vec<T> {
        self.records.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut T> {
        self.records.get_mut(&id)
    }

    /// Reserve the next id, build the record with it and store it.
    pub fn insert_with<F>(&mut self, build: F) -> T
    where
        F: FnOnce(RecordId) -> T,
    {
        let id = self.next_id;
        self.next_id += 1;
        let record = build(id);
        self.records.insert(id, record.clone());
        record
    }

    /// Remove by id; returns the removed record if it existed.
    pub fn remove(&mut self, id: RecordId) -> Option<T> {
        self.records.remove(&id)
    }

    /// First record matching `pred`, skipping `except` (the record being
    /// updated, when checking a rename against everyone else).
    pub fn find_other<P>(&self, except: Option<RecordId>, mut pred: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.records
            .iter()
            .filter(|(id, _)| Some(**id) != except)
            .map(|(_, v)| v)
            .find(|v| pred(v))
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}
