//! # Order Repository
//!
//! Database operations for orders and their line items.
//!
//! ## Total Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Keeping total_cents Honest                          │
//! │                                                                         │
//! │  Every item mutation runs in ONE transaction:                           │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT / UPDATE / DELETE order_items ...                             │
//! │    UPDATE orders SET total_cents =                                      │
//! │      (SELECT COALESCE(SUM(quantity * unit_price_cents), 0)              │
//! │       FROM order_items WHERE order_id = ?)                              │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  A reader can never observe items and total disagreeing.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Guards
//! Transition methods use `WHERE status = ...` and treat zero affected rows
//! as "wrong state or missing". The service layer re-reads the order to
//! tell those apart for the caller.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use comanda_core::{Order, OrderItem, PaymentMethod};

const ORDER_COLUMNS: &str = r#"
    id, table_id, user_id, status, total_cents,
    payment_method, notes, created_at, updated_at, closed_at
"#;

const ITEM_COLUMNS: &str = r#"
    id, order_id, product_id, quantity, unit_price_cents, notes, created_at
"#;

/// Repository for order database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = OrderRepository::new(pool);
/// let order = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Inserts a new order.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the table already has a live
    ///   order (partial unique index on orders.table_id)
    pub async fn insert(&self, order: &Order) -> DbResult<Order> {
        debug!(table_id = %order.table_id, "Inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, table_id, user_id, status, total_cents,
                payment_method, notes, created_at, updated_at, closed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&order.id)
        .bind(&order.table_id)
        .bind(&order.user_id)
        .bind(order.status)
        .bind(order.total_cents)
        .bind(order.payment_method)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .bind(order.closed_at)
        .execute(&self.pool)
        .await?;

        Ok(order.clone())
    }

    /// Gets an order by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Finds the live (open or pending_payment) order on a table, if any.
    ///
    /// At most one exists by schema invariant.
    pub async fn find_active_by_table(&self, table_id: &str) -> DbResult<Option<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE table_id = ?1 AND status IN ('open', 'pending_payment')"
        );

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(table_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Lists all live orders, oldest first.
    pub async fn list_active(&self) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE status IN ('open', 'pending_payment') ORDER BY created_at"
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Lists orders awaiting checkout at the register, oldest first.
    pub async fn list_pending_payment(&self) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE status = 'pending_payment' ORDER BY created_at"
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Lists paid orders created at or after `since`.
    ///
    /// Used by shift close/summary: the shift window starts at opened_at.
    pub async fn list_paid_since(&self, since: DateTime<Utc>) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE status = 'paid' AND created_at >= ?1 ORDER BY created_at"
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    // =========================================================================
    // Status transitions
    // =========================================================================

    /// Transitions an open order to pending_payment.
    ///
    /// Returns the number of affected rows (0 = missing or not open).
    pub async fn mark_pending_payment(&self, id: &str) -> DbResult<u64> {
        debug!(id = %id, "Sending order to cash register");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'pending_payment', updated_at = ?2
            WHERE id = ?1 AND status = 'open'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Transitions a pending_payment order to paid, recording the payment
    /// method and close time.
    ///
    /// Returns the number of affected rows (0 = missing or wrong status).
    pub async fn mark_paid(&self, id: &str, method: PaymentMethod) -> DbResult<u64> {
        debug!(id = %id, method = ?method, "Marking order paid");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'paid', payment_method = ?2, updated_at = ?3, closed_at = ?3
            WHERE id = ?1 AND status = 'pending_payment'
            "#,
        )
        .bind(id)
        .bind(method)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Cancels a live order.
    ///
    /// Returns the number of affected rows (0 = missing or already terminal).
    pub async fn mark_cancelled(&self, id: &str) -> DbResult<u64> {
        debug!(id = %id, "Cancelling order");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'cancelled', updated_at = ?2, closed_at = ?2
            WHERE id = ?1 AND status IN ('open', 'pending_payment')
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Lists the line items of an order, in add order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM order_items \
             WHERE order_id = ?1 ORDER BY created_at"
        );

        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Gets a single line item by ID, scoped to its order.
    pub async fn get_item(&self, order_id: &str, item_id: &str) -> DbResult<Option<OrderItem>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE id = ?1 AND order_id = ?2"
        );

        let item = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(item_id)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Adds a product to an order, or increments the existing line.
    ///
    /// ## Behavior
    /// - First add of a product inserts a line with the frozen unit price
    /// - Re-adding the same product increments quantity on the existing
    ///   line (UNIQUE(order_id, product_id) upsert); the original frozen
    ///   price is kept even if the menu price changed since
    /// - `total_cents` is recomputed in the same transaction
    pub async fn add_or_increment_item(&self, item: &OrderItem) -> DbResult<()> {
        debug!(
            order_id = %item.order_id,
            product_id = %item.product_id,
            quantity = item.quantity,
            "Adding item to order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO order_items (
                id, order_id, product_id, quantity, unit_price_cents, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (order_id, product_id)
            DO UPDATE SET quantity = quantity + excluded.quantity
            "#,
        )
        .bind(&item.id)
        .bind(&item.order_id)
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(&item.notes)
        .bind(item.created_at)
        .execute(&mut *tx)
        .await?;

        Self::recompute_total(&mut tx, &item.order_id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Removes a line item and recomputes the order total, in one
    /// transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - item doesn't exist on this order
    pub async fn remove_item(&self, order_id: &str, item_id: &str) -> DbResult<()> {
        debug!(order_id = %order_id, item_id = %item_id, "Removing item from order");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM order_items WHERE id = ?1 AND order_id = ?2")
            .bind(item_id)
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("OrderItem", item_id));
        }

        Self::recompute_total(&mut tx, order_id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Recomputes an order's derived total from its items.
    ///
    /// Always called inside the same transaction as the item mutation.
    async fn recompute_total(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        order_id: &str,
    ) -> DbResult<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE orders
            SET total_cents = (
                    SELECT COALESCE(SUM(quantity * unit_price_cents), 0)
                    FROM order_items
                    WHERE order_id = ?1
                ),
                updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .bind(now)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

/// Helper to generate a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new order item ID.
pub fn generate_item_id() -> String {
    Uuid::new_v4().to_string()
}
