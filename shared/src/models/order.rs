//! Order and line item models
//!
//! The order lifecycle is `Waiting → Processing → Done → Paid`, with
//! `Cancelled` reachable from `Waiting` or `Processing` only. `Paid` and
//! `Cancelled` are terminal. The guard methods here are the single source of
//! truth for what each status permits; the sync engine checks them before
//! applying any optimistic mutation.

use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Waiting,
    Processing,
    Done,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }

    /// Item add/update/remove is only allowed before the kitchen is done.
    pub fn can_modify_items(self) -> bool {
        matches!(self, OrderStatus::Waiting | OrderStatus::Processing)
    }

    pub fn can_cancel(self) -> bool {
        matches!(self, OrderStatus::Waiting | OrderStatus::Processing)
    }

    /// Only a Done order sits in the cashier queue waiting for payment.
    pub fn awaits_payment(self) -> bool {
        matches!(self, OrderStatus::Done)
    }
}

/// Order line item
///
/// `unit_price` is a snapshot taken when the item was added and never changes
/// afterwards, even if the menu price does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: EntityId,
    pub order_id: EntityId,
    pub menu_item_id: EntityId,
    /// Name snapshot for display
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
    /// quantity × unit_price
    pub subtotal: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: EntityId,
    /// Owning table; `None` for takeaway
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    /// Derived: sum of line item subtotals
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub items: Vec<OrderItem>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Recompute every line subtotal and the order total.
    pub fn recalculate_total(&mut self) {
        for item in &mut self.items {
            item.subtotal = item.quantity as f64 * item.unit_price;
        }
        self.total = self.items.iter().map(|i| i.subtotal).sum();
    }

    /// The Done transition requires a modifiable status and at least one item.
    pub fn can_complete(&self) -> bool {
        self.status.can_modify_items() && !self.items.is_empty()
    }
}

/// Line item input for add-to-order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub menu_item_id: EntityId,
    pub name: String,
    pub quantity: i32,
    /// Menu price at add time; becomes the immutable snapshot
    pub unit_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with_items() -> Order {
        Order {
            id: EntityId::Remote(1),
            table_id: Some(EntityId::Remote(1)),
            customer_name: None,
            status: OrderStatus::Waiting,
            total: 0.0,
            note: None,
            items: vec![OrderItem {
                id: EntityId::Remote(10),
                order_id: EntityId::Remote(1),
                menu_item_id: EntityId::Remote(100),
                name: "Nasi Goreng".to_string(),
                quantity: 2,
                unit_price: 25_000.0,
                subtotal: 0.0,
                note: None,
            }],
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_recalculate_total() {
        let mut order = order_with_items();
        order.recalculate_total();
        assert_eq!(order.items[0].subtotal, 50_000.0);
        assert_eq!(order.total, 50_000.0);
    }

    #[test]
    fn test_terminal_statuses_reject_everything() {
        for status in [OrderStatus::Paid, OrderStatus::Cancelled] {
            assert!(status.is_terminal());
            assert!(!status.can_modify_items());
            assert!(!status.can_cancel());
            assert!(!status.awaits_payment());
        }
    }

    #[test]
    fn test_complete_requires_at_least_one_item() {
        let mut order = order_with_items();
        assert!(order.can_complete());
        order.items.clear();
        assert!(!order.can_complete());
    }

    #[test]
    fn test_done_order_cannot_cancel() {
        let mut order = order_with_items();
        order.status = OrderStatus::Done;
        assert!(!order.status.can_cancel());
        assert!(order.status.awaits_payment());
    }
}
