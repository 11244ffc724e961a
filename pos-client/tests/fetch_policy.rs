//! Fetch policy: freshness window, stale response tickets, menu cache.

mod common;

use common::MockApi;
use pos_client::error::ClientError;
use pos_client::{ClientConfig, SyncEngine};
use shared::models::{DiningTable, TableStatus};
use shared::EntityId;
use std::sync::Arc;
use std::time::Duration;

fn config() -> ClientConfig {
    ClientConfig::new("http://localhost:8080")
}

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

#[tokio::test]
async fn test_fetch_inside_freshness_window_is_a_no_op() {
    let api = Arc::new(MockApi::new());
    api.seed_table(1, TableStatus::Available);
    let engine = SyncEngine::new(api.clone(), config());

    engine.fetch_tables(false).await.unwrap();
    engine.fetch_tables(false).await.unwrap();
    assert_eq!(api.calls_of("list_tables"), 1);

    engine.fetch_tables(true).await.unwrap();
    assert_eq!(api.calls_of("list_tables"), 2);
}

#[tokio::test]
async fn test_zero_window_always_fetches() {
    let api = Arc::new(MockApi::new());
    let engine = SyncEngine::new(api.clone(), config().with_freshness_window_ms(0));

    engine.fetch_orders(false).await.unwrap();
    engine.fetch_orders(false).await.unwrap();
    assert_eq!(api.calls_of("list_orders"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_slow_fetch_cannot_overwrite_fresher_result() {
    let api = Arc::new(MockApi::new());
    // First fetch answers late with the old layout, second answers quickly
    // with the current one.
    api.script_table_fetch(
        Duration::from_millis(200),
        vec![table(1, TableStatus::Available)],
    );
    api.script_table_fetch(
        Duration::from_millis(10),
        vec![table(1, TableStatus::Occupied)],
    );
    let engine = SyncEngine::new(api.clone(), config());

    let (slow, fast) = tokio::join!(engine.fetch_tables(true), engine.fetch_tables(true));
    slow.unwrap();
    fast.unwrap();

    // The late result was dropped; the store keeps the fresher fetch.
    let state = engine.state();
    let state = state.read();
    assert_eq!(
        state.tables.get(EntityId::Remote(1)).unwrap().status,
        TableStatus::Occupied
    );
    assert!(!state.tables.loading);
}

#[tokio::test]
async fn test_fetch_failure_records_error_and_clears_loading() {
    let api = Arc::new(MockApi::new());
    let engine = SyncEngine::new(api.clone(), config());

    api.fail_next(ClientError::Server("boom".to_string()));
    engine.fetch_orders(true).await.unwrap_err();

    let state = engine.state();
    let state = state.read();
    assert!(!state.orders.loading);
    assert!(state.orders.error.is_some());
    assert!(state.orders.is_empty());
}

#[tokio::test]
async fn test_cashier_queue_holds_only_orders_awaiting_payment() {
    let api = Arc::new(MockApi::new());
    api.seed_order(1, None, shared::models::OrderStatus::Waiting);
    api.seed_order(2, None, shared::models::OrderStatus::Done);
    api.seed_order(3, None, shared::models::OrderStatus::Paid);
    let engine = SyncEngine::new(api.clone(), config());

    engine.fetch_cashier_queue(true).await.unwrap();

    let state = engine.state();
    let state = state.read();
    assert_eq!(state.cashier.len(), 1);
    assert!(state.cashier.contains(EntityId::Remote(2)));
}

#[tokio::test]
async fn test_menu_served_from_cache_until_invalidated() {
    let api = Arc::new(MockApi::new());
    api.seed_menu_item(1, "Nasi Goreng", 25_000.0);
    let engine = SyncEngine::new(api.clone(), config());

    let first = engine.menu().await.unwrap();
    let second = engine.menu().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(api.calls_of("list_menu"), 1);

    engine.invalidate_menu();
    engine.menu().await.unwrap();
    assert_eq!(api.calls_of("list_menu"), 2);
}
