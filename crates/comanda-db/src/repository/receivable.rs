//! # Accounts Receivable Repository
//!
//! Database operations for deferred payment obligations (orders checked
//! out on credit). Each receivable is 1:1 with its order, enforced by a
//! UNIQUE constraint on order_id.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use comanda_core::AccountReceivable;

const RECEIVABLE_COLUMNS: &str = r#"
    id, order_id, amount_cents, is_paid, paid_at, due_date, notes, created_at
"#;

/// Repository for accounts receivable operations.
#[derive(Debug, Clone)]
pub struct ReceivableRepository {
    pool: SqlitePool,
}

impl ReceivableRepository {
    /// Creates a new ReceivableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceivableRepository { pool }
    }

    /// Inserts a new receivable.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the order already has one
    pub async fn insert(&self, receivable: &AccountReceivable) -> DbResult<AccountReceivable> {
        debug!(
            order_id = %receivable.order_id,
            amount_cents = receivable.amount_cents,
            "Creating account receivable"
        );

        sqlx::query(
            r#"
            INSERT INTO accounts_receivable (
                id, order_id, amount_cents, is_paid, paid_at, due_date, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&receivable.id)
        .bind(&receivable.order_id)
        .bind(receivable.amount_cents)
        .bind(receivable.is_paid)
        .bind(receivable.paid_at)
        .bind(receivable.due_date)
        .bind(&receivable.notes)
        .bind(receivable.created_at)
        .execute(&self.pool)
        .await?;

        Ok(receivable.clone())
    }

    /// Gets a receivable by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<AccountReceivable>> {
        let sql = format!(
            "SELECT {RECEIVABLE_COLUMNS} FROM accounts_receivable WHERE id = ?1"
        );

        let receivable = sqlx::query_as::<_, AccountReceivable>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(receivable)
    }

    /// Finds the receivable tied to an order, if any.
    pub async fn find_by_order(&self, order_id: &str) -> DbResult<Option<AccountReceivable>> {
        let sql = format!(
            "SELECT {RECEIVABLE_COLUMNS} FROM accounts_receivable WHERE order_id = ?1"
        );

        let receivable = sqlx::query_as::<_, AccountReceivable>(&sql)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(receivable)
    }

    /// Lists unpaid receivables, soonest due first (NULL due dates last).
    pub async fn list_unpaid(&self) -> DbResult<Vec<AccountReceivable>> {
        let sql = format!(
            "SELECT {RECEIVABLE_COLUMNS} FROM accounts_receivable \
             WHERE is_paid = 0 \
             ORDER BY due_date IS NULL, due_date, created_at"
        );

        let receivables = sqlx::query_as::<_, AccountReceivable>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(receivables)
    }

    /// Settles a receivable.
    ///
    /// Guarded by `is_paid = 0`; settling twice returns the affected row
    /// count 0 so the service can report already-paid.
    pub async fn mark_paid(&self, id: &str) -> DbResult<u64> {
        debug!(id = %id, "Settling account receivable");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE accounts_receivable
            SET is_paid = 1, paid_at = ?2
            WHERE id = ?1 AND is_paid = 0
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Helper to generate a new receivable ID.
pub fn generate_receivable_id() -> String {
    Uuid::new_v4().to_string()
}
