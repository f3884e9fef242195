//! # Cash Register Repository
//!
//! Database operations for cash register shifts.
//!
//! The "at most one open shift" rule lives in the schema as a partial
//! unique index on `cash_registers(status) WHERE status = 'open'`. Insert
//! conflicts surface as `DbError::UniqueViolation`; the service layer maps
//! that to its shift-already-open error.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use comanda_core::CashRegister;

const REGISTER_COLUMNS: &str = r#"
    id, user_id, status, initial_amount_cents, final_amount_cents,
    total_sales_cents, notes, opened_at, closed_at
"#;

/// Repository for cash register shift operations.
#[derive(Debug, Clone)]
pub struct RegisterRepository {
    pool: SqlitePool,
}

impl RegisterRepository {
    /// Creates a new RegisterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RegisterRepository { pool }
    }

    /// Inserts a new open shift.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - a shift is already open
    pub async fn insert(&self, register: &CashRegister) -> DbResult<CashRegister> {
        debug!(user_id = %register.user_id, "Opening cash register shift");

        sqlx::query(
            r#"
            INSERT INTO cash_registers (
                id, user_id, status, initial_amount_cents, final_amount_cents,
                total_sales_cents, notes, opened_at, closed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&register.id)
        .bind(&register.user_id)
        .bind(register.status)
        .bind(register.initial_amount_cents)
        .bind(register.final_amount_cents)
        .bind(register.total_sales_cents)
        .bind(&register.notes)
        .bind(register.opened_at)
        .bind(register.closed_at)
        .execute(&self.pool)
        .await?;

        Ok(register.clone())
    }

    /// Gets a shift by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CashRegister>> {
        let sql = format!("SELECT {REGISTER_COLUMNS} FROM cash_registers WHERE id = ?1");

        let register = sqlx::query_as::<_, CashRegister>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(register)
    }

    /// Finds the currently open shift, if any.
    ///
    /// At most one exists by schema invariant.
    pub async fn find_open(&self) -> DbResult<Option<CashRegister>> {
        let sql = format!(
            "SELECT {REGISTER_COLUMNS} FROM cash_registers WHERE status = 'open'"
        );

        let register = sqlx::query_as::<_, CashRegister>(&sql)
            .fetch_optional(&self.pool)
            .await?;

        Ok(register)
    }

    /// Closes a shift, recording the counted drawer, the derived sales
    /// total, and the close time.
    ///
    /// Guarded by `status = 'open'` so a shift can only be closed once.
    pub async fn close(
        &self,
        id: &str,
        final_amount_cents: i64,
        total_sales_cents: i64,
        notes: Option<&str>,
        closed_at: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(id = %id, total_sales_cents, "Closing cash register shift");

        let result = sqlx::query(
            r#"
            UPDATE cash_registers
            SET status = 'closed',
                final_amount_cents = ?2,
                total_sales_cents = ?3,
                notes = COALESCE(?4, notes),
                closed_at = ?5
            WHERE id = ?1 AND status = 'open'
            "#,
        )
        .bind(id)
        .bind(final_amount_cents)
        .bind(total_sales_cents)
        .bind(notes)
        .bind(closed_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CashRegister", id));
        }

        Ok(())
    }
}

/// Helper to generate a new register shift ID.
pub fn generate_register_id() -> String {
    Uuid::new_v4().to_string()
}
