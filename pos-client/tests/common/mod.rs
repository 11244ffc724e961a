#![allow(dead_code)]

//! In-process mock backend for sync engine tests
//!
//! Behaves like a tiny server over owned vectors: assigns remote ids, keeps
//! totals consistent, applies table updates. `fail_next` injects exactly one
//! failure into the next call, whatever it is.

use async_trait::async_trait;
use parking_lot::Mutex;
use pos_client::error::{ClientError, ClientResult};
use pos_client::projections::calculate_payment_details;
use pos_client::PosApi;
use shared::models::{
    DiningTable, MenuCategory, MenuItem, Order, OrderClosed, OrderCreate, OrderItem,
    OrderItemInput, OrderStatus, PaymentInput, PaymentRecord, TableStatus, TableUpdate,
};
use shared::util::now_millis;
use shared::EntityId;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct MockApi {
    pub tables: Mutex<Vec<DiningTable>>,
    pub orders: Mutex<Vec<Order>>,
    pub menu: Mutex<Vec<MenuItem>>,
    pub payments: Mutex<Vec<PaymentRecord>>,
    next_id: AtomicI64,
    fail_next: Mutex<Option<ClientError>>,
    calls: Mutex<Vec<&'static str>>,
    /// Scripted list_tables responses: (delay, payload). Consumed in order;
    /// once drained, list_tables serves the live vector again.
    table_fetch_script: Mutex<VecDeque<(Duration, Vec<DiningTable>)>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1000),
            ..Default::default()
        }
    }

    pub fn seed_table(&self, id: i64, status: TableStatus) {
        self.tables.lock().push(DiningTable {
            id: EntityId::Remote(id),
            number: id as i32,
            capacity: 4,
            status,
            customer_name: None,
            reservation_note: None,
        });
    }

    pub fn seed_order(&self, id: i64, table_id: Option<i64>, status: OrderStatus) {
        let mut order = Order {
            id: EntityId::Remote(id),
            table_id: table_id.map(EntityId::Remote),
            customer_name: None,
            status,
            total: 0.0,
            note: None,
            items: vec![OrderItem {
                id: EntityId::Remote(id * 10),
                order_id: EntityId::Remote(id),
                menu_item_id: EntityId::Remote(1),
                name: "Nasi Goreng".to_string(),
                quantity: 2,
                unit_price: 25_000.0,
                subtotal: 0.0,
                note: None,
            }],
            created_at: now_millis(),
            updated_at: now_millis(),
        };
        order.recalculate_total();
        self.orders.lock().push(order);
    }

    pub fn seed_menu_item(&self, id: i64, name: &str, price: f64) {
        self.menu.lock().push(MenuItem {
            id: EntityId::Remote(id),
            name: name.to_string(),
            description: None,
            price,
            category: MenuCategory::Food,
            is_available: true,
            stock: 10,
            image_ref: None,
        });
    }

    /// Make the next call fail with this error.
    pub fn fail_next(&self, error: ClientError) {
        *self.fail_next.lock() = Some(error);
    }

    /// Script the next list_tables responses (delay before answering, then
    /// the payload).
    pub fn script_table_fetch(&self, delay: Duration, payload: Vec<DiningTable>) {
        self.table_fetch_script.lock().push_back((delay, payload));
    }

    pub fn calls_of(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|c| **c == name).count()
    }

    fn record(&self, name: &'static str) -> ClientResult<()> {
        self.calls.lock().push(name);
        match self.fail_next.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn assign_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn order_mut<R>(&self, id: i64, f: impl FnOnce(&mut Order) -> R) -> ClientResult<R> {
        let mut orders = self.orders.lock();
        let order = orders
            .iter_mut()
            .find(|o| o.id == EntityId::Remote(id))
            .ok_or_else(|| ClientError::NotFound(format!("Order {}", id)))?;
        Ok(f(order))
    }
}

#[async_trait]
impl PosApi for MockApi {
    async fn list_tables(&self) -> ClientResult<Vec<DiningTable>> {
        self.record("list_tables")?;
        let scripted = self.table_fetch_script.lock().pop_front();
        if let Some((delay, payload)) = scripted {
            tokio::time::sleep(delay).await;
            return Ok(payload);
        }
        Ok(self.tables.lock().clone())
    }

    async fn update_table(&self, id: i64, update: TableUpdate) -> ClientResult<DiningTable> {
        self.record("update_table")?;
        let mut tables = self.tables.lock();
        let table = tables
            .iter_mut()
            .find(|t| t.id == EntityId::Remote(id))
            .ok_or_else(|| ClientError::NotFound(format!("Table {}", id)))?;
        if let Some(status) = update.status {
            table.set_status(status);
        }
        if let Some(name) = update.customer_name {
            table.customer_name = Some(name);
        }
        if let Some(note) = update.reservation_note {
            table.reservation_note = Some(note);
        }
        Ok(table.clone())
    }

    async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        self.record("list_orders")?;
        Ok(self.orders.lock().clone())
    }

    async fn create_order(&self, payload: OrderCreate) -> ClientResult<Order> {
        self.record("create_order")?;
        let order_id = EntityId::Remote(self.assign_id());
        let items = payload
            .items
            .iter()
            .map(|input| OrderItem {
                id: EntityId::Remote(self.assign_id()),
                order_id,
                menu_item_id: input.menu_item_id,
                name: input.name.clone(),
                quantity: input.quantity,
                unit_price: input.unit_price,
                subtotal: 0.0,
                note: input.note.clone(),
            })
            .collect();
        let mut order = Order {
            id: order_id,
            table_id: payload.table_id,
            customer_name: payload.customer_name,
            status: OrderStatus::Waiting,
            total: 0.0,
            note: payload.note,
            items,
            created_at: now_millis(),
            updated_at: now_millis(),
        };
        order.recalculate_total();
        if let Some(table_id) = order.table_id {
            let mut tables = self.tables.lock();
            if let Some(table) = tables.iter_mut().find(|t| t.id == table_id) {
                table.set_status(TableStatus::Occupied);
            }
        }
        self.orders.lock().push(order.clone());
        Ok(order)
    }

    async fn delete_order(&self, id: i64) -> ClientResult<()> {
        self.record("delete_order")?;
        let mut orders = self.orders.lock();
        let before = orders.len();
        orders.retain(|o| o.id != EntityId::Remote(id));
        if orders.len() == before {
            return Err(ClientError::NotFound(format!("Order {}", id)));
        }
        Ok(())
    }

    async fn add_item(&self, order_id: i64, item: OrderItemInput) -> ClientResult<Order> {
        self.record("add_item")?;
        let item_id = EntityId::Remote(self.assign_id());
        self.order_mut(order_id, |order| {
            order.items.push(OrderItem {
                id: item_id,
                order_id: order.id,
                menu_item_id: item.menu_item_id,
                name: item.name,
                quantity: item.quantity,
                unit_price: item.unit_price,
                subtotal: 0.0,
                note: item.note,
            });
            order.recalculate_total();
            order.updated_at = now_millis();
            order.clone()
        })
    }

    async fn update_item(
        &self,
        order_id: i64,
        item_id: i64,
        quantity: i32,
        note: Option<String>,
    ) -> ClientResult<Order> {
        self.record("update_item")?;
        self.order_mut(order_id, |order| {
            for item in &mut order.items {
                if item.id == EntityId::Remote(item_id) {
                    item.quantity = quantity;
                    item.note = note.clone();
                }
            }
            order.recalculate_total();
            order.updated_at = now_millis();
            order.clone()
        })
    }

    async fn remove_item(&self, order_id: i64, item_id: i64) -> ClientResult<Order> {
        self.record("remove_item")?;
        self.order_mut(order_id, |order| {
            order.items.retain(|i| i.id != EntityId::Remote(item_id));
            order.recalculate_total();
            order.updated_at = now_millis();
            order.clone()
        })
    }

    async fn complete_order(&self, id: i64) -> ClientResult<Order> {
        self.record("complete_order")?;
        self.order_mut(id, |order| {
            order.status = OrderStatus::Done;
            order.updated_at = now_millis();
            order.clone()
        })
    }

    async fn cancel_order(&self, id: i64, _reason: Option<String>) -> ClientResult<Order> {
        self.record("cancel_order")?;
        let order = self.order_mut(id, |order| {
            order.status = OrderStatus::Cancelled;
            order.updated_at = now_millis();
            order.clone()
        })?;
        if let Some(table_id) = order.table_id {
            let mut tables = self.tables.lock();
            if let Some(table) = tables.iter_mut().find(|t| t.id == table_id) {
                table.release();
            }
        }
        Ok(order)
    }

    async fn close_order(&self, id: i64, payment: PaymentInput) -> ClientResult<OrderClosed> {
        self.record("close_order")?;
        let order = self.order_mut(id, |order| {
            order.status = OrderStatus::Paid;
            order.updated_at = now_millis();
            order.clone()
        })?;
        if let Some(table_id) = order.table_id {
            let mut tables = self.tables.lock();
            if let Some(table) = tables.iter_mut().find(|t| t.id == table_id) {
                table.release();
            }
        }
        let details = calculate_payment_details(order.total);
        let record = PaymentRecord {
            id: EntityId::Remote(self.assign_id()),
            order_id: order.id,
            method: payment.method,
            tendered: payment.tendered,
            subtotal: details.subtotal,
            tax: details.tax,
            service: details.service,
            total: details.total,
            change: payment.tendered - details.total,
            created_at: now_millis(),
        };
        self.payments.lock().push(record.clone());
        Ok(OrderClosed {
            order,
            payment: record,
        })
    }

    async fn list_menu(&self) -> ClientResult<Vec<MenuItem>> {
        self.record("list_menu")?;
        Ok(self.menu.lock().clone())
    }

    async fn list_payments(&self) -> ClientResult<Vec<PaymentRecord>> {
        self.record("list_payments")?;
        Ok(self.payments.lock().clone())
    }

    async fn download_receipt(&self, order_id: i64) -> ClientResult<Vec<u8>> {
        self.record("download_receipt")?;
        Ok(format!("receipt-{}", order_id).into_bytes())
    }
}
