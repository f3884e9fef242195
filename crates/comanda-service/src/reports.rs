//! # Report Service
//!
//! Daily sales reporting over paid orders. The database layer fetches the
//! rows; the ranking and averaging math is comanda-core's.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use comanda_core::ticket::{average_ticket, sum_order_totals, top_products, ProductSales};
use comanda_core::{Order, TOP_PRODUCTS_LIMIT};
use comanda_db::Database;

use crate::error::{ServiceError, ServiceResult};

/// Daily sales report.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyReport {
    /// The reported calendar day (UTC).
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Paid orders created that day, oldest first.
    pub orders: Vec<Order>,

    /// Sum of their totals.
    pub total_sales_cents: i64,

    pub orders_count: usize,

    /// total / count, zero when no orders.
    pub average_ticket_cents: i64,

    /// Products ranked by revenue over those orders' lines (top 10).
    pub top_products: Vec<ProductSales>,
}

/// Service for sales reporting.
#[derive(Debug, Clone)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    /// Creates a new ReportService.
    pub fn new(db: Database) -> Self {
        ReportService { db }
    }

    /// Builds the sales report for one UTC calendar day.
    ///
    /// Window: [00:00:00, 23:59:59.999] of `date`.
    pub async fn daily(&self, date: NaiveDate) -> ServiceResult<DailyReport> {
        debug!(%date, "daily report");

        let (start, end) = day_window(date)?;

        let orders = self.db.reports().paid_orders_between(start, end).await?;
        let lines = self.db.reports().sales_lines_between(start, end).await?;

        let total = sum_order_totals(&orders);
        let count = orders.len();

        Ok(DailyReport {
            date,
            total_sales_cents: total.cents(),
            orders_count: count,
            average_ticket_cents: average_ticket(total, count).cents(),
            top_products: top_products(&lines, TOP_PRODUCTS_LIMIT),
            orders,
        })
    }
}

/// UTC bounds of one calendar day, closed on both ends.
fn day_window(date: NaiveDate) -> ServiceResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ServiceError::internal("invalid date"))?
        .and_utc();
    let end = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .ok_or_else(|| ServiceError::internal("invalid date"))?
        .and_utc();

    Ok((start, end))
}

// =============================================================================
// Integration Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::OrderService;
    use crate::testing::TestFixture;
    use chrono::Duration;
    use comanda_core::{OrderStatus, PaymentMethod};

    #[tokio::test]
    async fn test_daily_report_scopes_to_the_day() {
        let fx = TestFixture::new().await;
        let orders = OrderService::new(fx.db.clone());
        let reports = ReportService::new(fx.db.clone());

        // Paid yesterday: excluded
        fx.insert_order_raw(OrderStatus::Paid, 55500, Utc::now() - Duration::days(1))
            .await;

        // Paid today via the normal flow: 2 × 10000
        let order = orders
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
        orders
            .add_item(&order.id, &fx.product.id, 2, None)
            .await
            .unwrap();
        orders.send_to_cash(&order.id).await.unwrap();
        orders.checkout(&order.id, PaymentMethod::Cash).await.unwrap();

        let today = Utc::now().date_naive();
        let report = reports.daily(today).await.unwrap();

        assert_eq!(report.orders_count, 1);
        assert_eq!(report.total_sales_cents, 20000);
        assert_eq!(report.average_ticket_cents, 20000);
        assert_eq!(report.top_products.len(), 1);
        assert_eq!(report.top_products[0].quantity, 2);
        assert_eq!(report.top_products[0].revenue_cents, 20000);

        // Yesterday's report sees only the raw order (no items on it)
        let yesterday = (Utc::now() - Duration::days(1)).date_naive();
        let report = reports.daily(yesterday).await.unwrap();
        assert_eq!(report.orders_count, 1);
        assert_eq!(report.total_sales_cents, 55500);
        assert!(report.top_products.is_empty());
    }

    #[tokio::test]
    async fn test_daily_report_empty_day() {
        let fx = TestFixture::new().await;
        let reports = ReportService::new(fx.db.clone());

        let report = reports.daily(Utc::now().date_naive()).await.unwrap();

        assert_eq!(report.orders_count, 0);
        assert_eq!(report.total_sales_cents, 0);
        assert_eq!(report.average_ticket_cents, 0);
        assert!(report.top_products.is_empty());
    }

    #[tokio::test]
    async fn test_average_ticket_across_orders() {
        let fx = TestFixture::new().await;
        let orders = OrderService::new(fx.db.clone());
        let reports = ReportService::new(fx.db.clone());

        for qty in [1i64, 3] {
            let table = fx.insert_table(&format!("Mesa r{qty}")).await;
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

        let report = reports.daily(Utc::now().date_naive()).await.unwrap();

        // (10000 + 30000) / 2
        assert_eq!(report.orders_count, 2);
        assert_eq!(report.average_ticket_cents, 20000);
    }

    #[tokio::test]
    async fn test_cancelled_orders_never_count() {
        let fx = TestFixture::new().await;
        let orders = OrderService::new(fx.db.clone());
        let reports = ReportService::new(fx.db.clone());

        let order = orders
            .open_order(&fx.table.id, &fx.user.id, None)
            .await
            .unwrap();
        orders
            .add_item(&order.id, &fx.product.id, 2, None)
            .await
            .unwrap();
        orders.cancel(&order.id).await.unwrap();

        let report = reports.daily(Utc::now().date_naive()).await.unwrap();
        assert_eq!(report.orders_count, 0);
        assert_eq!(report.total_sales_cents, 0);
    }
}
