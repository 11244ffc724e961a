//! Optimistic state synchronization
//!
//! `SyncEngine` is the single command handler for all store mutations.
//! Every user action follows the same flow:
//!
//! ```text
//! action
//!     ├─ 1. Guard check against current store state (no network)
//!     ├─ 2. Snapshot every store the action touches
//!     ├─ 3. Apply the optimistic post-state under one write lock
//!     ├─ 4. Issue the network call(s)
//!     ├─ 5a. Success: swap optimistic entities for server entities
//!     │       (a Local placeholder is removed, never merged by id)
//!     └─ 5b. Failure: restore the snapshots, resolve the error, notify,
//!             and force-refresh affected stores on stale errors
//! ```
//!
//! Cross-store effects (order ↔ table ↔ cashier queue) are applied inside the
//! same write-lock acquisition, so no reader ever observes one side without
//! the other.
//!
//! Fetches are guarded by per-store tickets: a response is applied only if no
//! newer fetch for that store has been issued since, so a slow early fetch
//! can never overwrite a fresher one.

mod cashier;
mod orders;
mod tables;

use crate::api::PosApi;
use crate::cache::TtlCache;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::notify::{Notice, NoticeKind, Notifier};
use crate::state::{PosState, StateHandle};
use shared::EntityId;
use shared::models::MenuItem;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;

const MENU_CACHE_KEY: &str = "menu";

/// A rejected mutation: the resolved error plus the submitted payload,
/// returned so the caller can restore its input form and retry without
/// re-entering data.
#[derive(Debug)]
pub struct Rejected<P> {
    pub error: ClientError,
    pub payload: P,
}

impl<P> Rejected<P> {
    pub fn new(error: ClientError, payload: P) -> Self {
        Self { error, payload }
    }
}

/// Which store an action touched (for forced refresh after stale errors)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoreKind {
    Tables,
    Orders,
    Cashier,
}

/// The optimistic mutation engine over the three stores
pub struct SyncEngine {
    api: Arc<dyn PosApi>,
    state: StateHandle,
    notifier: Notifier,
    config: ClientConfig,
    /// Monotonic fetch tickets; stale responses are dropped
    table_ticket: Arc<AtomicU64>,
    order_ticket: Arc<AtomicU64>,
    cashier_ticket: Arc<AtomicU64>,
    menu_cache: Arc<TtlCache<&'static str, Vec<MenuItem>>>,
}

impl SyncEngine {
    pub fn new(api: Arc<dyn PosApi>, config: ClientConfig) -> Self {
        let ttl = Duration::from_millis(config.freshness_window_ms.max(0) as u64);
        Self::with_menu_cache(api, config, Arc::new(TtlCache::new(ttl)))
    }

    /// Construct with an externally owned menu cache, so callers sharing the
    /// cache across engines (or tests controlling its TTL) can inject one.
    pub fn with_menu_cache(
        api: Arc<dyn PosApi>,
        config: ClientConfig,
        menu_cache: Arc<TtlCache<&'static str, Vec<MenuItem>>>,
    ) -> Self {
        Self {
            api,
            state: PosState::new().into_handle(),
            notifier: Notifier::new(),
            config,
            table_ticket: Arc::new(AtomicU64::new(0)),
            order_ticket: Arc::new(AtomicU64::new(0)),
            cashier_ticket: Arc::new(AtomicU64::new(0)),
            menu_cache,
        }
    }

    /// Handle to the stores; readers take the read lock directly.
    pub fn state(&self) -> StateHandle {
        self.state.clone()
    }

    /// Subscribe to user-facing notices (toasts, auth redirects).
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notifier.subscribe()
    }

    pub(crate) fn api(&self) -> &dyn PosApi {
        self.api.as_ref()
    }

    pub(crate) fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub(crate) fn handle(&self) -> &StateHandle {
        &self.state
    }

    /// Server-assigned id, or the guard rejection for unacknowledged entities.
    pub(crate) fn remote_id(id: EntityId) -> ClientResult<i64> {
        id.as_remote().ok_or_else(|| {
            ClientError::InvalidOperation(format!("{} has not been acknowledged by the server", id))
        })
    }

    // ========== Fetch policy ==========

    /// Refresh the table store.
    ///
    /// Inside the freshness window this is a no-op serving the current
    /// snapshot, unless `force` is set (stale errors force; user pull-to-
    /// refresh forces).
    pub async fn fetch_tables(&self, force: bool) -> ClientResult<()> {
        if !force && self.state.read().tables.is_fresh(self.config.freshness_window_ms) {
            tracing::debug!("Table fetch inside freshness window, serving snapshot");
            return Ok(());
        }
        let ticket = self.table_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().tables.loading = true;

        match self.api.list_tables().await {
            Ok(tables) => {
                let mut state = self.state.write();
                if ticket != self.table_ticket.load(Ordering::SeqCst) {
                    tracing::debug!(ticket, "Dropping stale table fetch result");
                    return Ok(());
                }
                tracing::debug!(count = tables.len(), "Table store refreshed");
                state.tables.replace_all(tables);
                Ok(())
            }
            Err(error) => {
                let mut state = self.state.write();
                if ticket == self.table_ticket.load(Ordering::SeqCst) {
                    state.tables.loading = false;
                    state.tables.error = Some(error.to_string());
                }
                drop(state);
                self.notifier.error(error.to_string());
                Err(error)
            }
        }
    }

    /// Refresh the order store.
    pub async fn fetch_orders(&self, force: bool) -> ClientResult<()> {
        if !force && self.state.read().orders.is_fresh(self.config.freshness_window_ms) {
            tracing::debug!("Order fetch inside freshness window, serving snapshot");
            return Ok(());
        }
        let ticket = self.order_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().orders.loading = true;

        match self.api.list_orders().await {
            Ok(orders) => {
                let mut state = self.state.write();
                if ticket != self.order_ticket.load(Ordering::SeqCst) {
                    tracing::debug!(ticket, "Dropping stale order fetch result");
                    return Ok(());
                }
                tracing::debug!(count = orders.len(), "Order store refreshed");
                state.orders.replace_all(orders);
                Ok(())
            }
            Err(error) => {
                let mut state = self.state.write();
                if ticket == self.order_ticket.load(Ordering::SeqCst) {
                    state.orders.loading = false;
                    state.orders.error = Some(error.to_string());
                }
                drop(state);
                self.notifier.error(error.to_string());
                Err(error)
            }
        }
    }

    /// Refresh the cashier queue: the subset of orders awaiting payment.
    pub async fn fetch_cashier_queue(&self, force: bool) -> ClientResult<()> {
        if !force && self.state.read().cashier.is_fresh(self.config.freshness_window_ms) {
            tracing::debug!("Cashier fetch inside freshness window, serving snapshot");
            return Ok(());
        }
        let ticket = self.cashier_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().cashier.loading = true;

        match self.api.list_orders().await {
            Ok(orders) => {
                let queue: Vec<_> = orders
                    .into_iter()
                    .filter(|o| o.status.awaits_payment())
                    .collect();
                let mut state = self.state.write();
                if ticket != self.cashier_ticket.load(Ordering::SeqCst) {
                    tracing::debug!(ticket, "Dropping stale cashier fetch result");
                    return Ok(());
                }
                tracing::debug!(count = queue.len(), "Cashier queue refreshed");
                state.cashier.replace_all(queue);
                Ok(())
            }
            Err(error) => {
                let mut state = self.state.write();
                if ticket == self.cashier_ticket.load(Ordering::SeqCst) {
                    state.cashier.loading = false;
                    state.cashier.error = Some(error.to_string());
                }
                drop(state);
                self.notifier.error(error.to_string());
                Err(error)
            }
        }
    }

    /// Menu items, served from the TTL cache when live.
    ///
    /// The menu is reference data shared by every dashboard; it has no store
    /// of its own and no optimistic path.
    pub async fn menu(&self) -> ClientResult<Vec<MenuItem>> {
        if let Some(items) = self.menu_cache.get(&MENU_CACHE_KEY) {
            tracing::debug!(count = items.len(), "Serving menu from cache");
            return Ok(items);
        }
        let items = self.api.list_menu().await?;
        self.menu_cache.insert(MENU_CACHE_KEY, items.clone());
        tracing::debug!(count = items.len(), "Menu refreshed");
        Ok(items)
    }

    /// Drop the cached menu; the next [`menu`](Self::menu) call goes live.
    pub fn invalidate_menu(&self) {
        self.menu_cache.invalidate(&MENU_CACHE_KEY);
    }

    // ========== Failure resolution ==========

    /// Resolve a mutation failure after rollback: route the notice and
    /// force-refresh the affected stores when the entity went stale under us.
    pub(crate) async fn handle_failure(&self, error: &ClientError, affected: &[StoreKind]) {
        match error.kind() {
            ErrorKind::Validation => self.notifier.notify(NoticeKind::Warning, error.to_string()),
            ErrorKind::Auth => self.notifier.notify(NoticeKind::AuthRequired, error.to_string()),
            ErrorKind::Stale | ErrorKind::Network => self.notifier.error(error.to_string()),
        }

        if error.triggers_refetch() {
            for store in affected {
                let result = match store {
                    StoreKind::Tables => self.fetch_tables(true).await,
                    StoreKind::Orders => self.fetch_orders(true).await,
                    StoreKind::Cashier => self.fetch_cashier_queue(true).await,
                };
                if let Err(e) = result {
                    tracing::warn!(store = ?store, error = %e, "Forced refresh after stale error failed");
                }
            }
        }
    }
}

impl Clone for SyncEngine {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
            table_ticket: self.table_ticket.clone(),
            order_ticket: self.order_ticket.clone(),
            cashier_ticket: self.cashier_ticket.clone(),
            menu_cache: self.menu_cache.clone(),
        }
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("base_url", &self.config.base_url)
            .finish()
    }
}
