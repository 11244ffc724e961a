//! POS client state core
//!
//! Client-side state synchronization for the point-of-sale dashboards
//! (waiter, cashier, admin). Three normalized entity stores (tables, orders,
//! cashier queue) are kept consistent with the REST backend through
//! optimistic mutations:
//!
//! ```text
//! user action → SyncEngine
//!     ├─ 1. Guard check (status machine, occupancy)
//!     ├─ 2. Snapshot affected stores
//!     ├─ 3. Apply optimistic state (one write lock, cross-store atomic)
//!     ├─ 4. Issue network call(s)
//!     ├─ 5a. Success: replace optimistic entities with server entities
//!     └─ 5b. Failure: restore snapshots, emit notice, return form payload
//! ```
//!
//! Reads go straight to the stores; derived views (filter, sort, pagination,
//! payment math) are pure functions in [`projections`].

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logger;
pub mod notify;
pub mod projections;
pub mod state;
pub mod store;
pub mod sync;

pub use api::{HttpApi, PosApi};
pub use cache::TtlCache;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorKind};
pub use notify::{Notice, NoticeKind, Notifier};
pub use state::{PosState, StateHandle};
pub use store::{Entity, EntityStore};
pub use sync::{Rejected, SyncEngine};
