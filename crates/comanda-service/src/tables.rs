//! # Table Service
//!
//! Floor plan maintenance: create, rename, re-status and delete dining
//! tables. Order-driven status changes (occupy on open, free on
//! checkout/cancel) live in the order service; this one handles explicit
//! staff actions.

use chrono::Utc;
use tracing::info;

use comanda_core::validation::{validate_capacity, validate_name};
use comanda_core::{CoreError, DiningTable, TableStatus};
use comanda_db::repository::table::generate_table_id;
use comanda_db::Database;

use crate::error::ServiceResult;

/// Service for dining table operations.
#[derive(Debug, Clone)]
pub struct TableService {
    db: Database,
}

impl TableService {
    /// Creates a new TableService.
    pub fn new(db: Database) -> Self {
        TableService { db }
    }

    /// Lists all tables for the floor plan.
    pub async fn list(&self) -> ServiceResult<Vec<DiningTable>> {
        Ok(self.db.tables().list().await?)
    }

    /// Gets a single table.
    pub async fn get(&self, id: &str) -> ServiceResult<DiningTable> {
        let table = self
            .db
            .tables()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::TableNotFound(id.to_string()))?;

        Ok(table)
    }

    /// Creates a new table, free by default.
    pub async fn create(&self, name: &str, capacity: i64) -> ServiceResult<DiningTable> {
        let name = validate_name("table name", name)?;
        validate_capacity(capacity)?;

        let now = Utc::now();
        let table = DiningTable {
            id: generate_table_id(),
            name,
            capacity,
            status: TableStatus::Free,
            created_at: now,
            updated_at: now,
        };

        let table = self.db.tables().insert(&table).await?;

        info!(table_id = %table.id, name = %table.name, "Table created");
        Ok(table)
    }

    /// Renames a table and/or changes its capacity.
    pub async fn update(&self, id: &str, name: &str, capacity: i64) -> ServiceResult<DiningTable> {
        let name = validate_name("table name", name)?;
        validate_capacity(capacity)?;

        self.db.tables().update(id, &name, capacity).await?;
        self.get(id).await
    }

    /// Sets a table's floor status by explicit staff action.
    ///
    /// Any of free/occupied/pending is accepted; this does not touch
    /// orders. Freeing a table whose order is still live will be undone
    /// visually the next time the order is read, but the one-active-order
    /// rule stays intact either way.
    pub async fn set_status(&self, id: &str, status: TableStatus) -> ServiceResult<DiningTable> {
        self.db.tables().set_status(id, status).await?;

        info!(table_id = %id, status = ?status, "Table status set");
        self.get(id).await
    }

    /// Deletes a table.
    ///
    /// Rejected while the table has a live order.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let active = self.db.tables().count_active_orders(id).await?;
        if active > 0 {
            return Err(CoreError::TableInUse { count: active }.into());
        }

        self.db.tables().delete(id).await?;

        info!(table_id = %id, "Table deleted");
        Ok(())
    }
}

// =============================================================================
// Integration Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_db, TestFixture};
    use crate::error::ErrorCode;
    use crate::orders::OrderService;

    #[tokio::test]
    async fn test_create_and_list_tables() {
        let db = test_db().await;
        let svc = TableService::new(db);

        svc.create("Mesa 2", 4).await.unwrap();
        svc.create("Mesa 1", 2).await.unwrap();

        let tables = svc.list().await.unwrap();
        assert_eq!(tables.len(), 2);
        // Ordered by name
        assert_eq!(tables[0].name, "Mesa 1");
        assert_eq!(tables[1].name, "Mesa 2");
        assert_eq!(tables[0].status, TableStatus::Free);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let db = test_db().await;
        let svc = TableService::new(db);

        let err = svc.create("   ", 4).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = svc.create("Mesa 1", 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_set_status_directly() {
        let db = test_db().await;
        let svc = TableService::new(db.clone());

        let table = svc.create("Mesa 1", 4).await.unwrap();

        let table = svc
            .set_status(&table.id, TableStatus::Pending)
            .await
            .unwrap();
        assert_eq!(table.status, TableStatus::Pending);
    }

    #[tokio::test]
    async fn test_delete_rejected_while_order_live() {
        let fx = TestFixture::new().await;
        let tables = TableService::new(fx.db.clone());
        let orders = OrderService::new(fx.db.clone());

        orders
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();

        let err = tables.delete(&fx.table.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(err.message.contains("1 active orders"));
    }
}
