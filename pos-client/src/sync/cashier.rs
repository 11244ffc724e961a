//! Cashier actions: closing orders, payment history, receipts

use super::{Rejected, StoreKind, SyncEngine};
use crate::error::{ClientError, ClientResult};
use crate::projections::calculate_payment_details;
use shared::EntityId;
use shared::models::{OrderClosed, OrderStatus, PaymentInput, PaymentRecord};
use shared::response::FieldErrors;
use shared::util::now_millis;

impl SyncEngine {
    /// Settle an order from the cashier queue.
    ///
    /// The tendered amount must cover subtotal plus tax and service. On
    /// success the order leaves the queue, its status flips to Paid and the
    /// owning table returns to the floor, all under one write lock.
    pub async fn close_order(
        &self,
        order_id: EntityId,
        payment: PaymentInput,
    ) -> Result<OrderClosed, Rejected<PaymentInput>> {
        let remote_id = match Self::remote_id(order_id) {
            Ok(id) => id,
            Err(error) => return Err(Rejected::new(error, payment)),
        };

        let (tables_before, orders_before, cashier_before) = {
            let mut state = self.handle().write();
            let order = match state.cashier.get(order_id).cloned() {
                Some(order) => order,
                None => {
                    return Err(Rejected::new(
                        ClientError::NotFound(format!("Order {} is not in the queue", order_id)),
                        payment,
                    ));
                }
            };
            if !order.status.awaits_payment() {
                return Err(Rejected::new(
                    ClientError::InvalidOperation(format!(
                        "Order {} does not await payment",
                        order_id
                    )),
                    payment,
                ));
            }

            let details = calculate_payment_details(order.total);
            if payment.tendered < details.total {
                let mut errors = FieldErrors::new();
                errors.insert(
                    "tendered".to_string(),
                    vec![format!(
                        "amount {:.2} does not cover the total {:.2}",
                        payment.tendered, details.total
                    )],
                );
                return Err(Rejected::new(ClientError::Validation(errors), payment));
            }

            let tables_before = state.tables.clone();
            let orders_before = state.orders.clone();
            let cashier_before = state.cashier.clone();

            let mut optimistic = order.clone();
            optimistic.status = OrderStatus::Paid;
            optimistic.updated_at = now_millis();
            state.cashier.remove_one(order_id);
            state.orders.upsert_one(optimistic);
            if let Some(table_id) = order.table_id {
                if let Some(mut table) = state.tables.get(table_id).cloned() {
                    table.release();
                    state.tables.upsert_one(table);
                }
            }
            (tables_before, orders_before, cashier_before)
        };
        tracing::debug!(order_id = %order_id, "Optimistic payment applied");

        match self.api().close_order(remote_id, payment.clone()).await {
            Ok(closed) => {
                self.handle().write().orders.upsert_one(closed.order.clone());
                tracing::info!(
                    order_id = %order_id,
                    total = closed.payment.total,
                    change = closed.payment.change,
                    "Order closed"
                );
                self.notifier().success("Payment accepted");
                Ok(closed)
            }
            Err(error) => {
                {
                    let mut state = self.handle().write();
                    state.tables = tables_before;
                    state.orders = orders_before;
                    state.cashier = cashier_before;
                }
                tracing::warn!(order_id = %order_id, error = %error, "Close failed, state rolled back");
                self.handle_failure(&error, &[StoreKind::Orders, StoreKind::Cashier])
                    .await;
                Err(Rejected::new(error, payment))
            }
        }
    }

    /// Payment records for the admin dashboard; always fetched live.
    pub async fn payment_history(&self) -> ClientResult<Vec<PaymentRecord>> {
        self.api().list_payments().await
    }

    /// Receipt document for a settled order; opaque bytes from the backend.
    pub async fn download_receipt(&self, order_id: EntityId) -> ClientResult<Vec<u8>> {
        let remote_id = Self::remote_id(order_id)?;
        self.api().download_receipt(remote_id).await
    }
}
