//! Aggregate client state
//!
//! The three coupled stores live behind one lock. The sync engine takes the
//! write lock exactly once per logical transition, so a cross-store effect
//! (order created + table occupied) is never observable half-applied.

use crate::store::EntityStore;
use parking_lot::RwLock;
use shared::models::{DiningTable, Order};
use std::sync::Arc;

/// The three normalized stores
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PosState {
    pub tables: EntityStore<DiningTable>,
    pub orders: EntityStore<Order>,
    /// Orders awaiting payment closure (denormalized copies, keyed by order
    /// id; populated by the Done transition, drained by close/pay).
    pub cashier: EntityStore<Order>,
}

impl PosState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_handle(self) -> StateHandle {
        Arc::new(RwLock::new(self))
    }
}

/// Shared handle to the client state
pub type StateHandle = Arc<RwLock<PosState>>;
