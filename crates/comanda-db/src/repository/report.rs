//! # Report Repository
//!
//! Read-only aggregation queries for the daily sales report. No writes
//! happen here; the ranking and averaging math lives in comanda-core.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use comanda_core::ticket::SalesLine;
use comanda_core::Order;

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Lists paid orders created inside `[start, end]`, oldest first.
    pub async fn paid_orders_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Order>> {
        debug!(%start, %end, "Querying paid orders for report window");

        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, table_id, user_id, status, total_cents,
                   payment_method, notes, created_at, updated_at, closed_at
            FROM orders
            WHERE status = 'paid' AND created_at >= ?1 AND created_at <= ?2
            ORDER BY created_at
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists the sold lines of paid orders inside `[start, end]`, joined to
    /// product names. Feeds the top-products ranking.
    pub async fn sales_lines_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<SalesLine>> {
        let lines = sqlx::query_as::<_, SalesLine>(
            r#"
            SELECT p.name AS product_name,
                   oi.quantity AS quantity,
                   oi.unit_price_cents AS unit_price_cents
            FROM order_items oi
            INNER JOIN orders o ON o.id = oi.order_id
            INNER JOIN products p ON p.id = oi.product_id
            WHERE o.status = 'paid' AND o.created_at >= ?1 AND o.created_at <= ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}
