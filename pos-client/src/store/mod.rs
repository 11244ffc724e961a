//! Normalized entity stores
//!
//! Each store exclusively owns its entity array plus a status histogram that
//! is maintained incrementally on every mutation (a full refresh recomputes
//! it). Cross-store references are by id lookup only; a table update must be
//! re-propagated explicitly to any store holding a denormalized copy.

use shared::EntityId;
use shared::util::now_millis;
use std::collections::HashMap;
use std::hash::Hash;

/// Implemented by entities held in an [`EntityStore`].
pub trait Entity: Clone + PartialEq + std::fmt::Debug {
    type Status: Copy + Eq + Hash + std::fmt::Debug;

    fn id(&self) -> EntityId;
    fn status(&self) -> Self::Status;
}

impl Entity for shared::models::DiningTable {
    type Status = shared::models::TableStatus;

    fn id(&self) -> EntityId {
        self.id
    }

    fn status(&self) -> Self::Status {
        self.status
    }
}

impl Entity for shared::models::Order {
    type Status = shared::models::OrderStatus;

    fn id(&self) -> EntityId {
        self.id
    }

    fn status(&self) -> Self::Status {
        self.status
    }
}

/// Store for one entity type
#[derive(Debug, Clone, PartialEq)]
pub struct EntityStore<T: Entity> {
    entities: Vec<T>,
    status_counts: HashMap<T::Status, usize>,
    pub loading: bool,
    pub error: Option<String>,
    last_fetched_at: Option<i64>,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            status_counts: HashMap::new(),
            loading: false,
            error: None,
            last_fetched_at: None,
        }
    }

    pub fn entities(&self) -> &[T] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Aggregate count for one status
    pub fn count_of(&self, status: T::Status) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    /// The incrementally maintained histogram
    pub fn status_counts(&self) -> &HashMap<T::Status, usize> {
        &self.status_counts
    }

    /// Histogram recomputed from the entity array. Must always equal
    /// [`status_counts`](Self::status_counts); tests assert this after every
    /// mutation.
    pub fn recomputed_counts(&self) -> HashMap<T::Status, usize> {
        let mut counts = HashMap::new();
        for entity in &self.entities {
            *counts.entry(entity.status()).or_insert(0) += 1;
        }
        counts
    }

    pub fn last_fetched_at(&self) -> Option<i64> {
        self.last_fetched_at
    }

    /// True when the watermark is within `window_ms` of now.
    pub fn is_fresh(&self, window_ms: i64) -> bool {
        match self.last_fetched_at {
            Some(at) => now_millis() - at < window_ms,
            None => false,
        }
    }

    /// Full refresh from the server; recomputes the histogram and resets the
    /// watermark.
    pub fn replace_all(&mut self, entities: Vec<T>) {
        self.entities = entities;
        self.status_counts = self.recomputed_counts();
        self.loading = false;
        self.error = None;
        self.last_fetched_at = Some(now_millis());
    }

    /// Replace-by-id if present, else insert at head.
    pub fn upsert_one(&mut self, entity: T) {
        match self.entities.iter().position(|e| e.id() == entity.id()) {
            Some(idx) => {
                let prior = self.entities[idx].status();
                self.bump(prior, -1);
                self.bump(entity.status(), 1);
                self.entities[idx] = entity;
            }
            None => {
                self.bump(entity.status(), 1);
                self.entities.insert(0, entity);
            }
        }
    }

    /// Remove by id, decrementing the count for the entity's prior status.
    pub fn remove_one(&mut self, id: EntityId) -> Option<T> {
        let idx = self.entities.iter().position(|e| e.id() == id)?;
        let entity = self.entities.remove(idx);
        self.bump(entity.status(), -1);
        Some(entity)
    }

    fn bump(&mut self, status: T::Status, delta: isize) {
        let entry = self.status_counts.entry(status).or_insert(0);
        if delta < 0 {
            *entry = entry.saturating_sub(delta.unsigned_abs());
        } else {
            *entry += delta as usize;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{DiningTable, TableStatus};

    fn table(id: i64, status: TableStatus) -> DiningTable {
        DiningTable {
            id: EntityId::Remote(id),
            number: id as i32,
            capacity: 4,
            status,
            customer_name: None,
            reservation_note: None,
        }
    }

    fn assert_counts_consistent(store: &EntityStore<DiningTable>) {
        let recomputed = store.recomputed_counts();
        for (status, count) in store.status_counts() {
            assert_eq!(recomputed.get(status).copied().unwrap_or(0), *count);
        }
        for (status, count) in &recomputed {
            assert_eq!(store.count_of(*status), *count);
        }
    }

    #[test]
    fn test_replace_all_builds_histogram() {
        let mut store = EntityStore::new();
        store.replace_all(vec![
            table(1, TableStatus::Available),
            table(2, TableStatus::Occupied),
            table(3, TableStatus::Available),
        ]);

        assert_eq!(store.count_of(TableStatus::Available), 2);
        assert_eq!(store.count_of(TableStatus::Occupied), 1);
        assert!(store.last_fetched_at().is_some());
        assert_counts_consistent(&store);
    }

    #[test]
    fn test_upsert_inserts_at_head() {
        let mut store = EntityStore::new();
        store.replace_all(vec![table(1, TableStatus::Available)]);
        store.upsert_one(table(2, TableStatus::Reserved));

        assert_eq!(store.entities()[0].id, EntityId::Remote(2));
        assert_eq!(store.len(), 2);
        assert_counts_consistent(&store);
    }

    #[test]
    fn test_upsert_replaces_and_moves_counts() {
        let mut store = EntityStore::new();
        store.replace_all(vec![table(1, TableStatus::Available)]);
        store.upsert_one(table(1, TableStatus::Occupied));

        assert_eq!(store.len(), 1);
        assert_eq!(store.count_of(TableStatus::Available), 0);
        assert_eq!(store.count_of(TableStatus::Occupied), 1);
        assert_counts_consistent(&store);
    }

    #[test]
    fn test_remove_decrements_prior_status() {
        let mut store = EntityStore::new();
        store.replace_all(vec![
            table(1, TableStatus::Reserved),
            table(2, TableStatus::Reserved),
        ]);
        let removed = store.remove_one(EntityId::Remote(1)).unwrap();

        assert_eq!(removed.id, EntityId::Remote(1));
        assert_eq!(store.count_of(TableStatus::Reserved), 1);
        assert_counts_consistent(&store);
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut store: EntityStore<DiningTable> = EntityStore::new();
        assert!(store.remove_one(EntityId::Remote(99)).is_none());
    }

    #[test]
    fn test_freshness_window() {
        let mut store: EntityStore<DiningTable> = EntityStore::new();
        assert!(!store.is_fresh(30_000));

        store.replace_all(vec![]);
        assert!(store.is_fresh(30_000));
        assert!(!store.is_fresh(0));
    }

    #[test]
    fn test_histogram_stays_consistent_across_mutation_sequence() {
        let mut store = EntityStore::new();
        store.replace_all(vec![
            table(1, TableStatus::Available),
            table(2, TableStatus::Occupied),
        ]);
        store.upsert_one(table(3, TableStatus::Reserved));
        assert_counts_consistent(&store);
        store.upsert_one(table(1, TableStatus::Disabled));
        assert_counts_consistent(&store);
        store.remove_one(EntityId::Remote(2));
        assert_counts_consistent(&store);
        store.upsert_one(table(2, TableStatus::Available));
        assert_counts_consistent(&store);
    }
}
