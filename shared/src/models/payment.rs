//! Payment models

use super::Order;
use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    EWallet,
}

/// Payment record created when the cashier closes an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRecord {
    pub id: EntityId,
    pub order_id: EntityId,
    pub method: PaymentMethod,
    /// Amount handed over by the customer
    pub tendered: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub service: f64,
    pub total: f64,
    pub change: f64,
    pub created_at: i64,
}

/// Payment input from the cashier's close form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub method: PaymentMethod,
    pub tendered: f64,
}

/// Response payload of the close-order endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderClosed {
    pub order: Order,
    pub payment: PaymentRecord,
}
