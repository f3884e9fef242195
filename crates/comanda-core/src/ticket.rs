//! # Ticket Math
//!
//! Pure sales arithmetic over orders and their line items. Everything here
//! is deterministic and I/O free; the db layer persists the results.
//!
//! ## Where This Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_item / remove_item                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  compute_total(items) ──► persisted as orders.total_cents              │
//! │                                                                         │
//! │  close_shift / summary                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sum_order_totals(paid orders) ──► cash_registers.total_sales_cents    │
//! │                                                                         │
//! │  daily report                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  average_ticket / top_products                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Order, OrderItem};

/// Computes an order total from its current items.
///
/// The invariant the whole system hangs on:
/// `order.total_cents == Σ(item.quantity × item.unit_price_cents)`
/// after every item add/remove.
pub fn compute_total(items: &[OrderItem]) -> Money {
    items.iter().map(|i| i.line_total()).sum()
}

/// Sums the totals of a set of orders (shift sales, daily sales).
pub fn sum_order_totals<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Money {
    orders.into_iter().map(|o| o.total()).sum()
}

/// Average ticket in cents. Zero when there were no orders.
///
/// Integer division: the lost remainder is sub-cent noise on a report
/// screen, not an accounting value.
pub fn average_ticket(total: Money, order_count: usize) -> Money {
    if order_count == 0 {
        return Money::zero();
    }
    Money::from_cents(total.cents() / order_count as i64)
}

// =============================================================================
// Product Ranking
// =============================================================================

/// One sold line fed into the product ranking: the product name plus the
/// frozen unit price and quantity from the order item.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesLine {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

/// Aggregated sales for one product in a report.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSales {
    pub name: String,
    pub quantity: i64,
    pub revenue_cents: i64,
}

/// Ranks products by revenue (descending) across a set of sold lines,
/// keeping the top `limit`.
///
/// Ties break by name so the ordering is stable across runs.
pub fn top_products(lines: &[SalesLine], limit: usize) -> Vec<ProductSales> {
    let mut by_name: HashMap<&str, ProductSales> = HashMap::new();

    for line in lines {
        let entry = by_name
            .entry(line.product_name.as_str())
            .or_insert_with(|| ProductSales {
                name: line.product_name.clone(),
                quantity: 0,
                revenue_cents: 0,
            });
        entry.quantity += line.quantity;
        entry.revenue_cents += line.unit_price_cents * line.quantity;
    }

    let mut ranked: Vec<ProductSales> = by_name.into_values().collect();
    ranked.sort_by(|a, b| {
        b.revenue_cents
            .cmp(&a.revenue_cents)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(limit);
    ranked
}

// =============================================================================
// Unit Tests
// =============================================================================
