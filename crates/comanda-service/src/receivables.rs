//! # Receivable Service
//!
//! Settlement of house-credit obligations created by
//! `OrderService::checkout_on_credit`.

use tracing::{debug, info};

use comanda_core::{AccountReceivable, CoreError};
use comanda_db::Database;

use crate::error::ServiceResult;

/// Service for accounts receivable operations.
#[derive(Debug, Clone)]
pub struct ReceivableService {
    db: Database,
}

impl ReceivableService {
    /// Creates a new ReceivableService.
    pub fn new(db: Database) -> Self {
        ReceivableService { db }
    }

    /// Lists unpaid receivables, soonest due first.
    pub async fn list_open(&self) -> ServiceResult<Vec<AccountReceivable>> {
        Ok(self.db.receivables().list_unpaid().await?)
    }

    /// Gets a receivable by ID.
    pub async fn get(&self, id: &str) -> ServiceResult<AccountReceivable> {
        let receivable = self
            .db
            .receivables()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ReceivableNotFound(id.to_string()))?;

        Ok(receivable)
    }

    /// Gets the receivable tied to an order.
    ///
    /// Receivables are 1:1 with credit checkouts, so this is how the cash
    /// screen resolves "what does this table still owe".
    pub async fn for_order(&self, order_id: &str) -> ServiceResult<AccountReceivable> {
        let receivable = self
            .db
            .receivables()
            .find_by_order(order_id)
            .await?
            .ok_or_else(|| CoreError::ReceivableNotFound(order_id.to_string()))?;

        Ok(receivable)
    }

    /// Settles a receivable.
    ///
    /// Settling twice is rejected; the `is_paid = 0` guard in the update
    /// makes the second attempt touch zero rows.
    pub async fn settle(&self, id: &str) -> ServiceResult<AccountReceivable> {
        debug!(receivable_id = %id, "settle receivable");

        // Distinguish missing from already-paid up front
        let receivable = self.get(id).await?;
        if receivable.is_paid {
            return Err(CoreError::ReceivableAlreadyPaid(id.to_string()).into());
        }

        let affected = self.db.receivables().mark_paid(id).await?;
        if affected == 0 {
            // Settled by a concurrent caller between read and write
            return Err(CoreError::ReceivableAlreadyPaid(id.to_string()).into());
        }

        info!(receivable_id = %id, "Receivable settled");
        self.get(id).await
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

    #[tokio::test]
    async fn test_settle_receivable() {
        let fx = TestFixture::new().await;
        let orders = OrderService::new(fx.db.clone());
        let receivables = ReceivableService::new(fx.db.clone());

        let order = orders
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
        orders
            .add_item(&order.id, &fx.product.id, 1, None)
            .await
            .unwrap();
        orders.send_to_cash(&order.id).await.unwrap();
        let (_, receivable) = orders
            .checkout_on_credit(&order.id, None, None)
            .await
            .unwrap();

        assert_eq!(receivables.list_open().await.unwrap().len(), 1);

        let settled = receivables.settle(&receivable.id).await.unwrap();
        assert!(settled.is_paid);
        assert!(settled.paid_at.is_some());

        assert!(receivables.list_open().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_for_order_lookup() {
        let fx = TestFixture::new().await;
        let orders = OrderService::new(fx.db.clone());
        let receivables = ReceivableService::new(fx.db.clone());

        let order = orders
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
        orders
            .add_item(&order.id, &fx.product.id, 2, None)
            .await
            .unwrap();
        orders.send_to_cash(&order.id).await.unwrap();
        let (paid, receivable) = orders
            .checkout_on_credit(&order.id, None, None)
            .await
            .unwrap();

        let found = receivables.for_order(&paid.id).await.unwrap();
        assert_eq!(found.id, receivable.id);
        assert_eq!(found.amount_cents, paid.total_cents);

        // An order without a credit checkout has nothing to look up
        let err = receivables.for_order("no-such-order").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_settle_twice_rejected() {
        let fx = TestFixture::new().await;
        let orders = OrderService::new(fx.db.clone());
        let receivables = ReceivableService::new(fx.db.clone());

        let order = orders
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
        orders
            .add_item(&order.id, &fx.product.id, 1, None)
            .await
            .unwrap();
        orders.send_to_cash(&order.id).await.unwrap();
        let (_, receivable) = orders
            .checkout_on_credit(&order.id, None, None)
            .await
            .unwrap();

        receivables.settle(&receivable.id).await.unwrap();

        let err = receivables.settle(&receivable.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_settle_missing_rejected() {
        let fx = TestFixture::new().await;
        let receivables = ReceivableService::new(fx.db.clone());

        let err = receivables.settle("missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
