//! Dining table model

use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// Table occupancy status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    Disabled,
}

impl TableStatus {
    /// Whether a new order may be opened against a table in this status.
    pub fn accepts_order(self) -> bool {
        matches!(self, TableStatus::Available | TableStatus::Reserved)
    }

    /// Whether reservation fields may be populated in this status.
    pub fn holds_reservation(self) -> bool {
        matches!(self, TableStatus::Reserved | TableStatus::Disabled)
    }
}

/// Dining table entity
///
/// Invariant: `customer_name` and `reservation_note` are `None` whenever the
/// status is `Available` or `Occupied`. All status changes go through
/// [`DiningTable::set_status`], which enforces this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: EntityId,
    /// Display number shown on the floor plan
    pub number: i32,
    pub capacity: i32,
    pub status: TableStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_note: Option<String>,
}

impl DiningTable {
    /// Change status, clearing reservation fields when the new status cannot
    /// hold them.
    pub fn set_status(&mut self, status: TableStatus) {
        self.status = status;
        if !status.holds_reservation() {
            self.customer_name = None;
            self.reservation_note = None;
        }
    }

    /// Book this table for a named customer.
    pub fn reserve(&mut self, customer_name: String, note: Option<String>) {
        self.status = TableStatus::Reserved;
        self.customer_name = Some(customer_name);
        self.reservation_note = note;
    }

    /// Return the table to the floor: status back to Available, reservation
    /// cleared.
    pub fn release(&mut self) {
        self.set_status(TableStatus::Available);
    }
}

/// Update payload for a table
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TableStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_note: Option<String>,
}

impl TableUpdate {
    /// Mark occupied (reservation fields cleared server-side).
    pub fn occupy() -> Self {
        Self {
            status: Some(TableStatus::Occupied),
            ..Default::default()
        }
    }

    /// Back to available, reservation cleared.
    pub fn release() -> Self {
        Self {
            status: Some(TableStatus::Available),
            ..Default::default()
        }
    }
}

/// Booking payload carried by the waiter's reservation form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationPayload {
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
