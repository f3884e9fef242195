//! # Register Service
//!
//! Cash register shift workflow: open the drawer, watch the day, close
//! and reconcile.
//!
//! ## Shift Window
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shift Aggregation                                │
//! │                                                                         │
//! │  opened_at                                            close_shift       │
//! │      │                                                     │            │
//! │  ────┼──────────────── time ───────────────────────────────┼────►       │
//! │      │                                                     │            │
//! │      │   paid orders with created_at >= opened_at          │            │
//! │      │   └────────────► total_sales_cents                  │            │
//! │      │                                                     │            │
//! │  Orders paid before the shift opened never count.          │            │
//! │  Pending orders in summary() are GLOBAL: a ticket waiting  │            │
//! │  at the register is waiting regardless of who opened it.   │            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use comanda_core::ticket::sum_order_totals;
use comanda_core::validation::{validate_amount_cents, validate_notes};
use comanda_core::{CashRegister, CoreError, Order, RegisterStatus};
use comanda_db::repository::register::generate_register_id;
use comanda_db::Database;

use crate::error::ServiceResult;

/// Live snapshot of the open shift for the register screen.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShiftSummary {
    /// The open shift.
    pub register: CashRegister,

    /// Sum of paid-order totals since the shift opened.
    pub total_sales_cents: i64,

    /// Number of paid orders since the shift opened.
    pub paid_orders_count: usize,

    /// Paid orders since the shift opened.
    pub paid_orders: Vec<Order>,

    /// ALL orders currently awaiting checkout, shift or not.
    pub pending_orders: Vec<Order>,
}

/// Service for cash register shift operations.
#[derive(Debug, Clone)]
pub struct RegisterService {
    db: Database,
}

impl RegisterService {
    /// Creates a new RegisterService.
    pub fn new(db: Database) -> Self {
        RegisterService { db }
    }

    /// Opens a new shift with the counted drawer amount.
    ///
    /// Fails with a conflict if a shift is already open; the partial
    /// unique index on cash_registers(status) rejects the insert, so two
    /// racing opens cannot both succeed.
    pub async fn open_shift(
        &self,
        user_id: &str,
        initial_amount_cents: i64,
        notes: Option<&str>,
    ) -> ServiceResult<CashRegister> {
        debug!(user_id = %user_id, initial_amount_cents, "open_shift");

        validate_amount_cents("initial amount", initial_amount_cents)?;
        let notes = validate_notes(notes)?;

        let register = CashRegister {
            id: generate_register_id(),
            user_id: user_id.to_string(),
            status: RegisterStatus::Open,
            initial_amount_cents,
            final_amount_cents: None,
            total_sales_cents: None,
            notes,
            opened_at: Utc::now(),
            closed_at: None,
        };

        let register = match self.db.registers().insert(&register).await {
            Ok(register) => register,
            Err(e) if e.is_unique_violation_on("cash_registers.status") => {
                return Err(CoreError::ShiftAlreadyOpen.into());
            }
            Err(e) => return Err(e.into()),
        };

        info!(register_id = %register.id, "Cash register shift opened");
        Ok(register)
    }

    /// Returns the currently open shift, if any.
    pub async fn current_shift(&self) -> ServiceResult<Option<CashRegister>> {
        Ok(self.db.registers().find_open().await?)
    }

    /// Closes the open shift.
    ///
    /// `total_sales_cents` is derived here: the sum of paid-order totals
    /// created at or after opened_at. Orders outside the window never
    /// count.
    pub async fn close_shift(
        &self,
        final_amount_cents: i64,
        notes: Option<&str>,
    ) -> ServiceResult<CashRegister> {
        debug!(final_amount_cents, "close_shift");

        validate_amount_cents("final amount", final_amount_cents)?;
        let notes = validate_notes(notes)?;

        let register = self
            .db
            .registers()
            .find_open()
            .await?
            .ok_or(CoreError::NoOpenShift)?;

        let paid = self.db.orders().list_paid_since(register.opened_at).await?;
        let total_sales = sum_order_totals(&paid);

        let closed_at = Utc::now();
        self.db
            .registers()
            .close(
                &register.id,
                final_amount_cents,
                total_sales.cents(),
                notes.as_deref(),
                closed_at,
            )
            .await?;

        let register = self
            .db
            .registers()
            .get_by_id(&register.id)
            .await?
            .ok_or(CoreError::NoOpenShift)?;

        info!(
            register_id = %register.id,
            total_sales_cents = total_sales.cents(),
            paid_orders = paid.len(),
            "Cash register shift closed"
        );
        Ok(register)
    }

    /// Live summary of the open shift.
    ///
    /// Paid aggregation is shift-scoped; the pending list is global (a
    /// ticket waiting at the register is waiting regardless of when the
    /// drawer opened).
    pub async fn summary(&self) -> ServiceResult<ShiftSummary> {
        let register = self
            .db
            .registers()
            .find_open()
            .await?
            .ok_or(CoreError::NoOpenShift)?;

        let paid_orders = self.db.orders().list_paid_since(register.opened_at).await?;
        let pending_orders = self.db.orders().list_pending_payment().await?;

        let total_sales_cents = sum_order_totals(&paid_orders).cents();

        Ok(ShiftSummary {
            register,
            total_sales_cents,
            paid_orders_count: paid_orders.len(),
            paid_orders,
            pending_orders,
        })
    }
}

// =============================================================================
// Integration Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::orders::OrderService;
    use crate::testing::TestFixture;
    use chrono::Duration;
    use comanda_core::{OrderStatus, PaymentMethod};

    #[tokio::test]
    async fn test_only_one_open_shift() {
        let fx = TestFixture::new().await;
        let svc = RegisterService::new(fx.db.clone());

        svc.open_shift(&fx.user.id, 50000, None).await.unwrap();

        let err = svc.open_shift(&fx.user.id, 0, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "A cash register shift is already open");
    }

    #[tokio::test]
    async fn test_close_without_open_rejected() {
        let fx = TestFixture::new().await;
        let svc = RegisterService::new(fx.db.clone());

        let err = svc.close_shift(0, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_close_shift_aggregates_window_only() {
        let fx = TestFixture::new().await;
        let registers = RegisterService::new(fx.db.clone());
        let orders = OrderService::new(fx.db.clone());

        // A paid order from before the shift: must not count
        let stale = fx
            .insert_order_raw(OrderStatus::Paid, 77700, Utc::now() - Duration::hours(5))
            .await;
        assert_eq!(stale.total_cents, 77700);

        let shift = registers.open_shift(&fx.user.id, 50000, None).await.unwrap();
        assert_eq!(shift.status, RegisterStatus::Open);

        // Two orders paid during the shift (10000 * 2 and 10000 * 1)
        for qty in [2i64, 1] {
            let table = fx.insert_table(&format!("Mesa extra {qty}")).await;
            let order = orders
                .open_order(&table.id, &fx.user.id, None)
                .await
                .unwrap();
            orders
                .add_item(&order.id, &fx.product.id, qty, None)
                .await
                .unwrap();
            orders.send_to_cash(&order.id).await.unwrap();
            orders.checkout(&order.id, PaymentMethod::Cash).await.unwrap();
        }

        let closed = registers.close_shift(82000, Some("sin novedad")).await.unwrap();

        assert_eq!(closed.status, RegisterStatus::Closed);
        assert_eq!(closed.total_sales_cents, Some(30000));
        assert_eq!(closed.final_amount_cents, Some(82000));
        assert!(closed.closed_at.is_some());

        // Closing again: no open shift
        let err = registers.close_shift(0, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_summary_pending_is_global() {
        let fx = TestFixture::new().await;
        let registers = RegisterService::new(fx.db.clone());
        let orders = OrderService::new(fx.db.clone());

        // A ticket sent to cash BEFORE the shift opens
        let early = orders
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
        orders
            .add_item(&early.id, &fx.product.id, 1, None)
            .await
            .unwrap();
        orders.send_to_cash(&early.id).await.unwrap();

        registers.open_shift(&fx.user.id, 0, None).await.unwrap();

        // One paid during the shift
        let table = fx.insert_table("Mesa 2").await;
        let order = orders
            .open_order(&table.id, &fx.user.id, None)
            .await
            .unwrap();
        orders
            .add_item(&order.id, &fx.product.id, 2, None)
            .await
            .unwrap();
        orders.send_to_cash(&order.id).await.unwrap();
        orders.checkout(&order.id, PaymentMethod::Card).await.unwrap();

        let summary = registers.summary().await.unwrap();

        assert_eq!(summary.total_sales_cents, 20000);
        assert_eq!(summary.paid_orders_count, 1);
        // The pre-shift pending order still shows: pending is global
        assert_eq!(summary.pending_orders.len(), 1);
        assert_eq!(summary.pending_orders[0].id, early.id);
    }

    #[tokio::test]
    async fn test_open_shift_rejects_negative_amount() {
        let fx = TestFixture::new().await;
        let svc = RegisterService::new(fx.db.clone());

        let err = svc.open_shift(&fx.user.id, -1, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
