//! REST API collaborator
//!
//! The backend surface the client core consumes, behind a trait so the sync
//! engine never constructs its transport directly and tests can substitute an
//! in-process mock.

mod http;

pub use http::HttpApi;

use crate::error::ClientResult;
use async_trait::async_trait;
use shared::models::{
    DiningTable, MenuItem, Order, OrderClosed, OrderCreate, OrderItemInput, PaymentInput,
    PaymentRecord, TableUpdate,
};

/// Backend REST surface
///
/// All ids are server-assigned (`Remote`); an entity still carrying a local
/// placeholder id has nothing to address on the server.
#[async_trait]
pub trait PosApi: Send + Sync {
    // ========== Tables ==========
    async fn list_tables(&self) -> ClientResult<Vec<DiningTable>>;
    async fn update_table(&self, id: i64, update: TableUpdate) -> ClientResult<DiningTable>;

    // ========== Orders ==========
    async fn list_orders(&self) -> ClientResult<Vec<Order>>;
    async fn create_order(&self, payload: OrderCreate) -> ClientResult<Order>;
    async fn delete_order(&self, id: i64) -> ClientResult<()>;

    // ========== Line items ==========
    async fn add_item(&self, order_id: i64, item: OrderItemInput) -> ClientResult<Order>;
    async fn update_item(
        &self,
        order_id: i64,
        item_id: i64,
        quantity: i32,
        note: Option<String>,
    ) -> ClientResult<Order>;
    async fn remove_item(&self, order_id: i64, item_id: i64) -> ClientResult<Order>;

    // ========== Status transitions ==========
    async fn complete_order(&self, id: i64) -> ClientResult<Order>;
    async fn cancel_order(&self, id: i64, reason: Option<String>) -> ClientResult<Order>;
    async fn close_order(&self, id: i64, payment: PaymentInput) -> ClientResult<OrderClosed>;

    // ========== Menu and payments ==========
    async fn list_menu(&self) -> ClientResult<Vec<MenuItem>>;
    async fn list_payments(&self) -> ClientResult<Vec<PaymentRecord>>;

    /// Receipt document generated by the backend; opaque bytes, rendering is
    /// not our concern.
    async fn download_receipt(&self, order_id: i64) -> ClientResult<Vec<u8>>;
}
