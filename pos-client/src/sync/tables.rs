//! Table mutations: booking and release

use super::{Rejected, StoreKind, SyncEngine};
use crate::error::{ClientError, ClientResult};
use shared::EntityId;
use shared::models::{DiningTable, ReservationPayload, TableStatus, TableUpdate};

impl SyncEngine {
    /// Book an available table for a named customer.
    pub async fn book_table(
        &self,
        table_id: EntityId,
        payload: ReservationPayload,
    ) -> Result<DiningTable, Rejected<ReservationPayload>> {
        let remote_id = match Self::remote_id(table_id) {
            Ok(id) => id,
            Err(error) => return Err(Rejected::new(error, payload)),
        };
        if payload.customer_name.trim().is_empty() {
            let mut errors = shared::response::FieldErrors::new();
            errors.insert(
                "customer_name".to_string(),
                vec!["must not be empty".to_string()],
            );
            return Err(Rejected::new(ClientError::Validation(errors), payload));
        }

        let tables_before = {
            let mut state = self.handle().write();
            let table = match state.tables.get(table_id).cloned() {
                Some(table) => table,
                None => {
                    return Err(Rejected::new(
                        ClientError::NotFound(format!("Table {}", table_id)),
                        payload,
                    ));
                }
            };
            if table.status != TableStatus::Available {
                return Err(Rejected::new(
                    ClientError::Conflict(format!("Table {} is not available", table.number)),
                    payload,
                ));
            }

            let tables_before = state.tables.clone();
            let mut optimistic = table;
            optimistic.reserve(payload.customer_name.clone(), payload.note.clone());
            state.tables.upsert_one(optimistic);
            tables_before
        };

        let update = TableUpdate {
            status: Some(TableStatus::Reserved),
            customer_name: Some(payload.customer_name.clone()),
            reservation_note: payload.note.clone(),
        };
        match self.api().update_table(remote_id, update).await {
            Ok(server_table) => {
                self.handle().write().tables.upsert_one(server_table.clone());
                tracing::info!(table = server_table.number, "Table booked");
                self.notifier().success("Table booked");
                Ok(server_table)
            }
            Err(error) => {
                self.handle().write().tables = tables_before;
                tracing::warn!(table_id = %table_id, error = %error, "Booking failed, table rolled back");
                self.handle_failure(&error, &[StoreKind::Tables]).await;
                Err(Rejected::new(error, payload))
            }
        }
    }

    /// Cancel a reservation: the table returns to the floor.
    pub async fn release_table(&self, table_id: EntityId) -> ClientResult<DiningTable> {
        let remote_id = Self::remote_id(table_id)?;

        let tables_before = {
            let mut state = self.handle().write();
            let table = state
                .tables
                .get(table_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("Table {}", table_id)))?;
            if table.status != TableStatus::Reserved {
                return Err(ClientError::InvalidOperation(format!(
                    "Table {} holds no reservation",
                    table.number
                )));
            }

            let tables_before = state.tables.clone();
            let mut optimistic = table;
            optimistic.release();
            state.tables.upsert_one(optimistic);
            tables_before
        };

        match self.api().update_table(remote_id, TableUpdate::release()).await {
            Ok(server_table) => {
                self.handle().write().tables.upsert_one(server_table.clone());
                tracing::info!(table = server_table.number, "Reservation released");
                Ok(server_table)
            }
            Err(error) => {
                self.handle().write().tables = tables_before;
                tracing::warn!(table_id = %table_id, error = %error, "Release failed, table rolled back");
                self.handle_failure(&error, &[StoreKind::Tables]).await;
                Err(error)
            }
        }
    }
}
