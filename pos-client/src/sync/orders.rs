//! Order mutations: creation, deletion, line items, status transitions
//!
//! Order creation and deletion are the two cross-store relations: the table
//! store moves in the same write-lock acquisition as the order store, and a
//! failure rolls both back as one unit.

use super::{Rejected, StoreKind, SyncEngine};
use crate::error::{ClientError, ClientResult};
use shared::EntityId;
use shared::models::{Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, TableUpdate};
use shared::response::FieldErrors;
use shared::util::now_millis;

/// Build the optimistic order from the form intent alone, never from a
/// server response. Ids are local placeholders.
fn optimistic_order(payload: &OrderCreate, now: i64) -> Order {
    let order_id = EntityId::local();
    let items = payload
        .items
        .iter()
        .map(|input| OrderItem {
            id: EntityId::local(),
            order_id,
            menu_item_id: input.menu_item_id,
            name: input.name.clone(),
            quantity: input.quantity,
            unit_price: input.unit_price,
            subtotal: input.quantity as f64 * input.unit_price,
            note: input.note.clone(),
        })
        .collect();

    let mut order = Order {
        id: order_id,
        table_id: payload.table_id,
        customer_name: payload.customer_name.clone(),
        status: OrderStatus::Waiting,
        total: 0.0,
        note: payload.note.clone(),
        items,
        created_at: now,
        updated_at: now,
    };
    order.recalculate_total();
    order
}

fn quantity_rejection() -> ClientError {
    let mut errors = FieldErrors::new();
    errors.insert(
        "quantity".to_string(),
        vec!["must be a positive integer".to_string()],
    );
    ClientError::Validation(errors)
}

impl SyncEngine {
    /// Open an order against a table (or takeaway when `table_id` is None).
    ///
    /// The table flips to Occupied and the order appears in the order store
    /// in the same state transition. On failure both revert together.
    pub async fn create_order(&self, payload: OrderCreate) -> Result<Order, Rejected<OrderCreate>> {
        for item in &payload.items {
            if item.quantity <= 0 {
                return Err(Rejected::new(quantity_rejection(), payload));
            }
        }

        let (tables_before, orders_before, local) = {
            let mut state = self.handle().write();

            if let Some(table_id) = payload.table_id {
                match state.tables.get(table_id) {
                    Some(table) if table.status.accepts_order() => {}
                    Some(table) => {
                        return Err(Rejected::new(
                            ClientError::Conflict(format!(
                                "Table {} is not available",
                                table.number
                            )),
                            payload,
                        ));
                    }
                    None => {
                        return Err(Rejected::new(
                            ClientError::NotFound(format!("Table {}", table_id)),
                            payload,
                        ));
                    }
                }
            }

            let tables_before = state.tables.clone();
            let orders_before = state.orders.clone();

            let local = optimistic_order(&payload, now_millis());
            state.orders.upsert_one(local.clone());
            if let Some(table_id) = payload.table_id {
                if let Some(mut table) = state.tables.get(table_id).cloned() {
                    table.set_status(shared::models::TableStatus::Occupied);
                    state.tables.upsert_one(table);
                }
            }
            (tables_before, orders_before, local)
        };
        tracing::debug!(order_id = %local.id, table_id = ?payload.table_id, "Optimistic order applied");

        match self.api().create_order(payload.clone()).await {
            Ok(server_order) => {
                {
                    let mut state = self.handle().write();
                    // Placeholder out, authoritative entity in; no merge
                    state.orders.remove_one(local.id);
                    state.orders.upsert_one(server_order.clone());
                }
                tracing::info!(order_id = %server_order.id, "Order created");
                self.notifier().success("Order created");
                Ok(server_order)
            }
            Err(error) => {
                {
                    let mut state = self.handle().write();
                    state.tables = tables_before;
                    state.orders = orders_before;
                }
                tracing::warn!(error = %error, "Order creation failed, state rolled back");
                self.handle_failure(&error, &[StoreKind::Tables, StoreKind::Orders])
                    .await;
                Err(Rejected::new(error, payload))
            }
        }
    }

    /// Delete an order that has not reached the kitchen's terminal states.
    /// The owning table reverts to Available with its reservation cleared.
    ///
    /// The delete and the table release are issued concurrently; the delete
    /// call decides rollback. A failed release alone is reconverged by a
    /// forced table refresh.
    pub async fn delete_order(&self, order_id: EntityId) -> ClientResult<()> {
        let remote_id = Self::remote_id(order_id)?;

        let (tables_before, orders_before, cashier_before, table_remote) = {
            let mut state = self.handle().write();
            let order = state
                .orders
                .get(order_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("Order {}", order_id)))?;
            if !order.status.can_cancel() {
                return Err(ClientError::InvalidOperation(format!(
                    "Order {} can no longer be deleted",
                    order_id
                )));
            }

            let tables_before = state.tables.clone();
            let orders_before = state.orders.clone();
            let cashier_before = state.cashier.clone();

            state.orders.remove_one(order_id);
            state.cashier.remove_one(order_id);
            let mut table_remote = None;
            if let Some(table_id) = order.table_id {
                if let Some(mut table) = state.tables.get(table_id).cloned() {
                    table.release();
                    state.tables.upsert_one(table);
                }
                table_remote = table_id.as_remote();
            }
            (tables_before, orders_before, cashier_before, table_remote)
        };
        tracing::debug!(order_id = %order_id, "Optimistic order removal applied");

        let delete_fut = self.api().delete_order(remote_id);
        let result = match table_remote {
            Some(table_id) => {
                let release_fut = self.api().update_table(table_id, TableUpdate::release());
                let (deleted, released) = tokio::join!(delete_fut, release_fut);
                if let Err(error) = released {
                    tracing::warn!(table_id, error = %error, "Table release failed alongside delete");
                }
                deleted
            }
            None => delete_fut.await,
        };

        match result {
            Ok(()) => {
                tracing::info!(order_id = %order_id, "Order deleted");
                self.notifier().success("Order deleted");
                Ok(())
            }
            Err(error) => {
                {
                    let mut state = self.handle().write();
                    state.tables = tables_before;
                    state.orders = orders_before;
                    state.cashier = cashier_before;
                }
                tracing::warn!(error = %error, "Order deletion failed, state rolled back");
                self.handle_failure(&error, &[StoreKind::Tables, StoreKind::Orders])
                    .await;
                Err(error)
            }
        }
    }

    /// Add a line item. The unit price snapshot is taken from the form
    /// intent and never changes afterwards.
    pub async fn add_item(
        &self,
        order_id: EntityId,
        input: OrderItemInput,
    ) -> Result<Order, Rejected<OrderItemInput>> {
        let remote_id = match Self::remote_id(order_id) {
            Ok(id) => id,
            Err(error) => return Err(Rejected::new(error, input)),
        };
        if input.quantity <= 0 {
            return Err(Rejected::new(quantity_rejection(), input));
        }

        let orders_before = {
            let mut state = self.handle().write();
            let order = match state.orders.get(order_id).cloned() {
                Some(order) => order,
                None => {
                    return Err(Rejected::new(
                        ClientError::NotFound(format!("Order {}", order_id)),
                        input,
                    ));
                }
            };
            if !order.status.can_modify_items() {
                return Err(Rejected::new(
                    ClientError::InvalidOperation(format!(
                        "Order {} no longer accepts item changes",
                        order_id
                    )),
                    input,
                ));
            }

            let orders_before = state.orders.clone();
            let mut optimistic = order;
            optimistic.items.push(OrderItem {
                id: EntityId::local(),
                order_id,
                menu_item_id: input.menu_item_id,
                name: input.name.clone(),
                quantity: input.quantity,
                unit_price: input.unit_price,
                subtotal: 0.0,
                note: input.note.clone(),
            });
            optimistic.recalculate_total();
            optimistic.updated_at = now_millis();
            state.orders.upsert_one(optimistic);
            orders_before
        };

        match self.api().add_item(remote_id, input.clone()).await {
            Ok(server_order) => {
                self.handle().write().orders.upsert_one(server_order.clone());
                tracing::debug!(order_id = %order_id, "Item added");
                Ok(server_order)
            }
            Err(error) => {
                self.handle().write().orders = orders_before;
                tracing::warn!(order_id = %order_id, error = %error, "Add item failed, order rolled back");
                self.handle_failure(&error, &[StoreKind::Orders]).await;
                Err(Rejected::new(error, input))
            }
        }
    }

    /// Change quantity or note of a line item. The unit price snapshot is
    /// immutable; only the quantity drives the new subtotal.
    pub async fn update_item(
        &self,
        order_id: EntityId,
        item_id: EntityId,
        quantity: i32,
        note: Option<String>,
    ) -> ClientResult<Order> {
        let remote_order = Self::remote_id(order_id)?;
        let remote_item = Self::remote_id(item_id)?;
        if quantity <= 0 {
            return Err(quantity_rejection());
        }

        let orders_before = {
            let mut state = self.handle().write();
            let order = state
                .orders
                .get(order_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("Order {}", order_id)))?;
            if !order.status.can_modify_items() {
                return Err(ClientError::InvalidOperation(format!(
                    "Order {} no longer accepts item changes",
                    order_id
                )));
            }
            if !order.items.iter().any(|i| i.id == item_id) {
                return Err(ClientError::NotFound(format!("Item {}", item_id)));
            }

            let orders_before = state.orders.clone();
            let mut optimistic = order;
            for item in &mut optimistic.items {
                if item.id == item_id {
                    item.quantity = quantity;
                    item.note = note.clone();
                }
            }
            optimistic.recalculate_total();
            optimistic.updated_at = now_millis();
            state.orders.upsert_one(optimistic);
            orders_before
        };

        match self
            .api()
            .update_item(remote_order, remote_item, quantity, note)
            .await
        {
            Ok(server_order) => {
                self.handle().write().orders.upsert_one(server_order.clone());
                Ok(server_order)
            }
            Err(error) => {
                self.handle().write().orders = orders_before;
                tracing::warn!(order_id = %order_id, error = %error, "Update item failed, order rolled back");
                self.handle_failure(&error, &[StoreKind::Orders]).await;
                Err(error)
            }
        }
    }

    /// Remove a line item.
    pub async fn remove_item(&self, order_id: EntityId, item_id: EntityId) -> ClientResult<Order> {
        let remote_order = Self::remote_id(order_id)?;
        let remote_item = Self::remote_id(item_id)?;

        let orders_before = {
            let mut state = self.handle().write();
            let order = state
                .orders
                .get(order_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("Order {}", order_id)))?;
            if !order.status.can_modify_items() {
                return Err(ClientError::InvalidOperation(format!(
                    "Order {} no longer accepts item changes",
                    order_id
                )));
            }

            let orders_before = state.orders.clone();
            let mut optimistic = order;
            optimistic.items.retain(|i| i.id != item_id);
            optimistic.recalculate_total();
            optimistic.updated_at = now_millis();
            state.orders.upsert_one(optimistic);
            orders_before
        };

        match self.api().remove_item(remote_order, remote_item).await {
            Ok(server_order) => {
                self.handle().write().orders.upsert_one(server_order.clone());
                Ok(server_order)
            }
            Err(error) => {
                self.handle().write().orders = orders_before;
                tracing::warn!(order_id = %order_id, error = %error, "Remove item failed, order rolled back");
                self.handle_failure(&error, &[StoreKind::Orders]).await;
                Err(error)
            }
        }
    }

    /// Kitchen done: `Waiting`/`Processing` → `Done`. Requires at least one
    /// line item. The order enters the cashier queue in the same transition.
    pub async fn complete_order(&self, order_id: EntityId) -> ClientResult<Order> {
        let remote_id = Self::remote_id(order_id)?;

        let (orders_before, cashier_before) = {
            let mut state = self.handle().write();
            let order = state
                .orders
                .get(order_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("Order {}", order_id)))?;
            if !order.can_complete() {
                return Err(ClientError::InvalidOperation(format!(
                    "Order {} cannot be completed (status {:?}, {} items)",
                    order_id,
                    order.status,
                    order.items.len()
                )));
            }

            let orders_before = state.orders.clone();
            let cashier_before = state.cashier.clone();

            let mut optimistic = order;
            optimistic.status = OrderStatus::Done;
            optimistic.updated_at = now_millis();
            state.orders.upsert_one(optimistic.clone());
            state.cashier.upsert_one(optimistic);
            (orders_before, cashier_before)
        };
        tracing::debug!(order_id = %order_id, "Optimistic completion applied");

        match self.api().complete_order(remote_id).await {
            Ok(server_order) => {
                {
                    let mut state = self.handle().write();
                    state.orders.upsert_one(server_order.clone());
                    state.cashier.upsert_one(server_order.clone());
                }
                tracing::info!(order_id = %order_id, "Order completed");
                self.notifier().success("Order sent to cashier");
                Ok(server_order)
            }
            Err(error) => {
                {
                    let mut state = self.handle().write();
                    state.orders = orders_before;
                    state.cashier = cashier_before;
                }
                tracing::warn!(order_id = %order_id, error = %error, "Complete failed, state rolled back");
                self.handle_failure(&error, &[StoreKind::Orders, StoreKind::Cashier])
                    .await;
                Err(error)
            }
        }
    }

    /// Cancel an order still in `Waiting`/`Processing`, with an optional
    /// free-text reason. The owning table reverts to Available.
    pub async fn cancel_order(
        &self,
        order_id: EntityId,
        reason: Option<String>,
    ) -> ClientResult<Order> {
        let remote_id = Self::remote_id(order_id)?;

        let (tables_before, orders_before) = {
            let mut state = self.handle().write();
            let order = state
                .orders
                .get(order_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("Order {}", order_id)))?;
            if !order.status.can_cancel() {
                return Err(ClientError::InvalidOperation(format!(
                    "Order {} can no longer be cancelled",
                    order_id
                )));
            }

            let tables_before = state.tables.clone();
            let orders_before = state.orders.clone();

            let mut optimistic = order.clone();
            optimistic.status = OrderStatus::Cancelled;
            optimistic.updated_at = now_millis();
            state.orders.upsert_one(optimistic);
            if let Some(table_id) = order.table_id {
                if let Some(mut table) = state.tables.get(table_id).cloned() {
                    table.release();
                    state.tables.upsert_one(table);
                }
            }
            (tables_before, orders_before)
        };
        tracing::debug!(order_id = %order_id, "Optimistic cancellation applied");

        match self.api().cancel_order(remote_id, reason).await {
            Ok(server_order) => {
                self.handle().write().orders.upsert_one(server_order.clone());
                tracing::info!(order_id = %order_id, "Order cancelled");
                self.notifier().success("Order cancelled");
                Ok(server_order)
            }
            Err(error) => {
                {
                    let mut state = self.handle().write();
                    state.tables = tables_before;
                    state.orders = orders_before;
                }
                tracing::warn!(order_id = %order_id, error = %error, "Cancel failed, state rolled back");
                self.handle_failure(&error, &[StoreKind::Tables, StoreKind::Orders])
                    .await;
                Err(error)
            }
        }
    }
}
