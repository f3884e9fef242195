//! # Order Service
//!
//! The order lifecycle: open a ticket at a table, build it item by item,
//! send it to the register, settle it (or cancel it).
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Lifecycle                                  │
//! │                                                                         │
//! │  open_order          add_item / remove_item        send_to_cash        │
//! │      │                       │                          │              │
//! │      ▼                       ▼                          ▼              │
//! │  ┌───────┐  items mutate while open only  ┌──────────────────┐         │
//! │  │ open  │─────────────────────────────── │ pending_payment  │         │
//! │  └───┬───┘                                └───────┬──────────┘         │
//! │      │                                            │                    │
//! │      │ cancel                          checkout / │ cancel             │
//! │      │                          checkout_on_credit│                    │
//! │      ▼                                            ▼                    │
//! │  cancelled (table freed)              paid / cancelled (table freed)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Table status follows the lifecycle: opening occupies, reaching a
//! terminal status frees.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use comanda_core::validation::{validate_notes, validate_quantity, validate_ticket_size};
use comanda_core::{
    AccountReceivable, CoreError, Order, OrderItem, OrderStatus, PaymentMethod, TableStatus,
};
use comanda_db::repository::order::{generate_item_id, generate_order_id};
use comanda_db::repository::receivable::generate_receivable_id;
use comanda_db::Database;

use crate::error::ServiceResult;

/// An order together with its current line items.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Service for order lifecycle operations.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
}

impl OrderService {
    /// Creates a new OrderService.
    pub fn new(db: Database) -> Self {
        OrderService { db }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets an order with its items.
    pub async fn get(&self, order_id: &str) -> ServiceResult<OrderDetail> {
        let order = self.require_order(order_id).await?;
        let items = self.db.orders().get_items(order_id).await?;

        Ok(OrderDetail { order, items })
    }

    /// Lists all live (open or pending_payment) orders.
    pub async fn list_active(&self) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().list_active().await?)
    }

    /// Finds the live order on a table, if any.
    pub async fn find_by_table(&self, table_id: &str) -> ServiceResult<Option<Order>> {
        Ok(self.db.orders().find_active_by_table(table_id).await?)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Opens a new order on a table and marks the table occupied.
    ///
    /// Fails with a conflict if the table already has a live order: the
    /// partial unique index on orders(table_id) rejects the insert, so two
    /// racing opens cannot both succeed.
    pub async fn open_order(
        &self,
        table_id: &str,
        user_id: &str,
        notes: Option<&str>,
    ) -> ServiceResult<Order> {
        debug!(table_id = %table_id, "open_order");

        let notes = validate_notes(notes)?;

        // Table must exist before we try the insert, so a missing table
        // reads as NotFound rather than a foreign key failure.
        self.db
            .tables()
            .get_by_id(table_id)
            .await?
            .ok_or_else(|| CoreError::TableNotFound(table_id.to_string()))?;

        let now = Utc::now();
        let order = Order {
            id: generate_order_id(),
            table_id: table_id.to_string(),
            user_id: user_id.to_string(),
            status: OrderStatus::Open,
            total_cents: 0,
            payment_method: None,
            notes,
            created_at: now,
            updated_at: now,
            closed_at: None,
        };

        let order = match self.db.orders().insert(&order).await {
            Ok(order) => order,
            Err(e) if e.is_unique_violation_on("orders.table_id") => {
                return Err(CoreError::TableOccupied {
                    table_id: table_id.to_string(),
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        };

        self.db
            .tables()
            .set_status(table_id, TableStatus::Occupied)
            .await?;

        info!(order_id = %order.id, table_id = %table_id, "Order opened");
        Ok(order)
    }

    /// Adds a product to an order (or increments its existing line).
    ///
    /// The unit price is frozen from the product's current price on first
    /// add; later increments keep the frozen price. Total is recomputed in
    /// the same transaction as the item write.
    pub async fn add_item(
        &self,
        order_id: &str,
        product_id: &str,
        quantity: i64,
        notes: Option<&str>,
    ) -> ServiceResult<OrderDetail> {
        debug!(order_id = %order_id, product_id = %product_id, quantity, "add_item");

        validate_quantity(quantity)?;
        let notes = validate_notes(notes)?;

        let order = self.require_order(order_id).await?;
        self.require_editable(&order)?;

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        // Re-adds increment the existing line, so the quantity cap applies
        // to the resulting quantity, not the increment.
        let items = self.db.orders().get_items(order_id).await?;
        match items.iter().find(|i| i.product_id == product_id) {
            Some(line) => validate_quantity(line.quantity + quantity)?,
            None => validate_ticket_size(items.len())?,
        }

        let item = OrderItem {
            id: generate_item_id(),
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents: product.price_cents,
            notes,
            created_at: Utc::now(),
        };

        self.db.orders().add_or_increment_item(&item).await?;

        info!(
            order_id = %order_id,
            product = %product.name,
            quantity,
            "Item added to order"
        );
        self.get(order_id).await
    }

    /// Removes a line item from an order.
    pub async fn remove_item(&self, order_id: &str, item_id: &str) -> ServiceResult<OrderDetail> {
        debug!(order_id = %order_id, item_id = %item_id, "remove_item");

        let order = self.require_order(order_id).await?;
        self.require_editable(&order)?;

        self.db
            .orders()
            .get_item(order_id, item_id)
            .await?
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;

        self.db.orders().remove_item(order_id, item_id).await?;

        info!(order_id = %order_id, item_id = %item_id, "Item removed from order");
        self.get(order_id).await
    }

    /// Sends an open order to the cash register (open → pending_payment).
    ///
    /// The ticket is frozen from here; table status is untouched.
    pub async fn send_to_cash(&self, order_id: &str) -> ServiceResult<Order> {
        debug!(order_id = %order_id, "send_to_cash");

        let affected = self.db.orders().mark_pending_payment(order_id).await?;
        if affected == 0 {
            return Err(self
                .transition_failure(order_id, OrderStatus::PendingPayment)
                .await);
        }

        info!(order_id = %order_id, "Order sent to cash register");
        self.require_order(order_id).await
    }

    /// Settles an order at the register (pending_payment → paid) and
    /// frees its table.
    pub async fn checkout(&self, order_id: &str, method: PaymentMethod) -> ServiceResult<Order> {
        debug!(order_id = %order_id, method = ?method, "checkout");

        let affected = self.db.orders().mark_paid(order_id, method).await?;
        if affected == 0 {
            return Err(self.transition_failure(order_id, OrderStatus::Paid).await);
        }

        let order = self.require_order(order_id).await?;
        self.db
            .tables()
            .set_status(&order.table_id, TableStatus::Free)
            .await?;

        info!(
            order_id = %order_id,
            total_cents = order.total_cents,
            method = ?method,
            "Order paid"
        );
        Ok(order)
    }

    /// Settles an order on house credit: the order is paid with method
    /// `credit` and an unpaid receivable is recorded for its total.
    pub async fn checkout_on_credit(
        &self,
        order_id: &str,
        due_date: Option<DateTime<Utc>>,
        notes: Option<&str>,
    ) -> ServiceResult<(Order, AccountReceivable)> {
        debug!(order_id = %order_id, "checkout_on_credit");

        let notes = validate_notes(notes)?;

        let order = self.checkout(order_id, PaymentMethod::Credit).await?;

        let receivable = AccountReceivable {
            id: generate_receivable_id(),
            order_id: order.id.clone(),
            amount_cents: order.total_cents,
            is_paid: false,
            paid_at: None,
            due_date,
            notes,
            created_at: Utc::now(),
        };

        let receivable = self.db.receivables().insert(&receivable).await?;

        info!(
            order_id = %order_id,
            receivable_id = %receivable.id,
            amount_cents = receivable.amount_cents,
            "Order settled on credit"
        );
        Ok((order, receivable))
    }

    /// Cancels a live order and frees its table.
    pub async fn cancel(&self, order_id: &str) -> ServiceResult<Order> {
        debug!(order_id = %order_id, "cancel");

        let affected = self.db.orders().mark_cancelled(order_id).await?;
        if affected == 0 {
            return Err(self
                .transition_failure(order_id, OrderStatus::Cancelled)
                .await);
        }

        let order = self.require_order(order_id).await?;
        self.db
            .tables()
            .set_status(&order.table_id, TableStatus::Free)
            .await?;

        info!(order_id = %order_id, "Order cancelled");
        Ok(order)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn require_order(&self, order_id: &str) -> ServiceResult<Order> {
        let order = self
            .db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;

        Ok(order)
    }

    fn require_editable(&self, order: &Order) -> ServiceResult<()> {
        if order.status != OrderStatus::Open {
            return Err(CoreError::OrderNotEditable {
                order_id: order.id.clone(),
                status: order.status,
            }
            .into());
        }
        Ok(())
    }

    /// A guarded transition touched zero rows: re-read to tell a missing
    /// order apart from a wrong-status one.
    async fn transition_failure(
        &self,
        order_id: &str,
        requested: OrderStatus,
    ) -> crate::error::ServiceError {
        match self.db.orders().get_by_id(order_id).await {
            Ok(Some(order)) => CoreError::InvalidTransition {
                order_id: order_id.to_string(),
                current: order.status,
                requested,
            }
            .into(),
            Ok(None) => CoreError::OrderNotFound(order_id.to_string()).into(),
            Err(e) => e.into(),
        }
    }
}

// =============================================================================
// Integration Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::TestFixture;
    use comanda_core::ticket::compute_total;

    #[tokio::test]
    async fn test_open_order_occupies_table() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.total_cents, 0);

        let table = fx.db.tables().get_by_id(&fx.table.id).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
    }

    #[tokio::test]
    async fn test_second_order_on_table_rejected() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        svc.open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();

        let err = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert!(err.message.contains("active order"));
    }

    #[tokio::test]
    async fn test_add_item_recomputes_total() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        // Product price is 10000 cents in the fixture
        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();

        let detail = svc
            .add_item(&order.id, &fx.product.id, 2, None)
            .await
            .unwrap();

        assert_eq!(detail.order.total_cents, 20000);
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].quantity, 2);
        assert_eq!(detail.items[0].unit_price_cents, 10000);

        // The persisted total agrees with the pure ticket math
        assert_eq!(
            detail.order.total_cents,
            compute_total(&detail.items).cents()
        );
    }

    #[tokio::test]
    async fn test_re_adding_product_increments_line() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();

        svc.add_item(&order.id, &fx.product.id, 2, None)
            .await
            .unwrap();
        let detail = svc
            .add_item(&order.id, &fx.product.id, 1, None)
            .await
            .unwrap();

        // One line, quantity 3, not two lines
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].quantity, 3);
        assert_eq!(detail.order.total_cents, 30000);
    }

    #[tokio::test]
    async fn test_frozen_price_survives_menu_change() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
        svc.add_item(&order.id, &fx.product.id, 1, None)
            .await
            .unwrap();

        // Re-price the menu item
        let mut product = fx.product.clone();
        product.price_cents = 99999;
        fx.db.products().update(&product).await.unwrap();

        // Incrementing keeps the frozen price
        let detail = svc
            .add_item(&order.id, &fx.product.id, 1, None)
            .await
            .unwrap();
        assert_eq!(detail.items[0].unit_price_cents, 10000);
        assert_eq!(detail.order.total_cents, 20000);
    }

    #[tokio::test]
    async fn test_remove_item_resets_total() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
        let detail = svc
            .add_item(&order.id, &fx.product.id, 2, None)
            .await
            .unwrap();

        let detail = svc
            .remove_item(&order.id, &detail.items[0].id)
            .await
            .unwrap();
        assert_eq!(detail.order.total_cents, 0);
        assert!(detail.items.is_empty());
        assert_eq!(
            detail.order.total_cents,
            compute_total(&detail.items).cents()
        );
    }

    #[tokio::test]
    async fn test_items_frozen_after_send_to_cash() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
        svc.add_item(&order.id, &fx.product.id, 1, None)
            .await
            .unwrap();
        svc.send_to_cash(&order.id).await.unwrap();

        let err = svc
            .add_item(&order.id, &fx.product.id, 1, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(err.message.contains("pending_payment"));
    }

    #[tokio::test]
    async fn test_checkout_requires_pending_payment() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();

        // Straight from open: rejected
        let err = svc
            .checkout(&order.id, PaymentMethod::Cash)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        svc.send_to_cash(&order.id).await.unwrap();
        let paid = svc.checkout(&order.id, PaymentMethod::Cash).await.unwrap();

        assert_eq!(paid.status, OrderStatus::Paid);
        assert_eq!(paid.payment_method, Some(PaymentMethod::Cash));
        assert!(paid.closed_at.is_some());

        // Table freed
        let table = fx.db.tables().get_by_id(&fx.table.id).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Free);

        // Paying twice: rejected
        let err = svc
            .checkout(&order.id, PaymentMethod::Cash)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_cancel_from_pending_payment_frees_table() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
        svc.send_to_cash(&order.id).await.unwrap();

        let cancelled = svc.cancel(&order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let table = fx.db.tables().get_by_id(&fx.table.id).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Free);

        // Table is usable again
        svc.open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancel_paid_order_rejected() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
        svc.send_to_cash(&order.id).await.unwrap();
        svc.checkout(&order.id, PaymentMethod::Card).await.unwrap();

        let err = svc.cancel(&order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_checkout_on_credit_records_receivable() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
        svc.add_item(&order.id, &fx.product.id, 3, None)
            .await
            .unwrap();
        svc.send_to_cash(&order.id).await.unwrap();

        let (paid, receivable) = svc
            .checkout_on_credit(&order.id, None, Some("Cliente frecuente"))
            .await
            .unwrap();

        assert_eq!(paid.payment_method, Some(PaymentMethod::Credit));
        assert_eq!(receivable.amount_cents, 30000);
        assert!(!receivable.is_paid);
        assert_eq!(receivable.notes.as_deref(), Some("Cliente frecuente"));
    }

    #[tokio::test]
    async fn test_add_item_unknown_product_rejected() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();

        let err = svc
            .add_item(&order.id, "missing-product", 1, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_quantity_cap_covers_the_whole_line() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();

        svc.add_item(&order.id, &fx.product.id, 999, None)
            .await
            .unwrap();

        // Incrementing past 999 is rejected even though each call alone
        // would pass
        let err = svc
            .add_item(&order.id, &fx.product.id, 999, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = svc
            .add_item(&order.id, &fx.product.id, 1, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // The line is untouched by the rejected adds
        let detail = svc.get(&order.id).await.unwrap();
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].quantity, 999);
        assert_eq!(detail.order.total_cents, 999 * 10000);
    }

    #[tokio::test]
    async fn test_quantity_bounds() {
        let fx = TestFixture::new().await;
        let svc = OrderService::new(fx.db.clone());

        let order = svc
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();

        let err = svc
            .add_item(&order.id, &fx.product.id, 0, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = svc
            .add_item(&order.id, &fx.product.id, 1000, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
