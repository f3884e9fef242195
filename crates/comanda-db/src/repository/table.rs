//! # Dining Table Repository
//!
//! Database operations for the floor plan.
//!
//! Table status is written two ways: explicitly by staff (reserve, mark
//! pending cleanup) and implicitly by the order lifecycle (open occupies,
//! checkout/cancel frees). Both paths go through `set_status`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use comanda_core::{DiningTable, TableStatus};

/// Repository for dining table operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = TableRepository::new(pool);
/// let tables = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    /// Creates a new TableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TableRepository { pool }
    }

    /// Lists all tables for the floor plan, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<DiningTable>> {
        let tables = sqlx::query_as::<_, DiningTable>(
            r#"
            SELECT id, name, capacity, status, created_at, updated_at
            FROM dining_tables
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// Gets a table by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(DiningTable))` - Table found
    /// * `Ok(None)` - Table not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DiningTable>> {
        let table = sqlx::query_as::<_, DiningTable>(
            r#"
            SELECT id, name, capacity, status, created_at, updated_at
            FROM dining_tables
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(table)
    }

    /// Inserts a new table.
    pub async fn insert(&self, table: &DiningTable) -> DbResult<DiningTable> {
        debug!(name = %table.name, "Inserting dining table");

        sqlx::query(
            r#"
            INSERT INTO dining_tables (id, name, capacity, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&table.id)
        .bind(&table.name)
        .bind(table.capacity)
        .bind(table.status)
        .bind(table.created_at)
        .bind(table.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(table.clone())
    }

    /// Updates a table's name and capacity.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Table doesn't exist
    pub async fn update(&self, id: &str, name: &str, capacity: i64) -> DbResult<()> {
        debug!(id = %id, "Updating dining table");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE dining_tables
            SET name = ?2, capacity = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(capacity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DiningTable", id));
        }

        Ok(())
    }

    /// Sets a table's floor status.
    pub async fn set_status(&self, id: &str, status: TableStatus) -> DbResult<()> {
        debug!(id = %id, status = ?status, "Setting table status");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE dining_tables
            SET status = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DiningTable", id));
        }

        Ok(())
    }

    /// Counts non-terminal orders referencing this table.
    ///
    /// Used before deletion: a table with live orders cannot be removed.
    pub async fn count_active_orders(&self, table_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM orders
            WHERE table_id = ?1 AND status IN ('open', 'pending_payment')
            "#,
        )
        .bind(table_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Hard-deletes a table.
    ///
    /// Fails with ForeignKeyViolation if any order (including historical
    /// ones) references it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting dining table");

        let result = sqlx::query("DELETE FROM dining_tables WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DiningTable", id));
        }

        Ok(())
    }
}

/// Helper to generate a new table ID.
pub fn generate_table_id() -> String {
    Uuid::new_v4().to_string()
}
