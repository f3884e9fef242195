//! # Domain Types
//!
//! Core domain types used throughout Comanda POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiningTable    │   │     Order       │   │  CashRegister   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  table_id (FK)  │   │  user_id (FK)   │       │
//! │  │  capacity       │   │  status         │   │  status         │       │
//! │  │  status         │   │  total_cents    │   │  opened_at      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   OrderItem     │   │ AccountReceivable│      │
//! │  │  price_cents    │   │  unit_price_cents│  │  amount_cents   │       │
//! │  │  stock (info)   │   │  (frozen at add) │  │  is_paid        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All monetary fields are integer cents. The canonical column name is
//! `unit_price_cents` everywhere - there is exactly one spelling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Table Status
// =============================================================================

/// The status of a dining table on the floor plan.
///
/// Set either by explicit staff action ("reserve that table") or implicitly
/// by order lifecycle events (opening an order occupies the table, checkout
/// and cancellation free it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// No guests, ready to seat.
    Free,
    /// Guests seated, order in progress.
    Occupied,
    /// Reserved or waiting on cleanup, per staff choice.
    Pending,
}

impl Default for TableStatus {
    fn default() -> Self {
        TableStatus::Free
    }
}

// =============================================================================
// Dining Table
// =============================================================================

/// A physical table in the restaurant.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DiningTable {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the floor plan ("Mesa 1", "Terraza 3").
    pub name: String,

    /// Number of seats.
    pub capacity: i64,

    /// Current floor status.
    pub status: TableStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Category
// =============================================================================

/// A product category ("Bebidas", "Entradas").
///
/// Soft-deleted via `is_active` - historical order items keep referencing
/// products in deactivated categories.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,

    /// Whether the category is active (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product on the menu.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Category this product belongs to.
    pub category_id: String,

    /// Display name shown to waitstaff and on the ticket.
    pub name: String,

    /// Optional description for menu details.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Current stock level. Informational only: stock is never decremented
    /// by a sale, it exists for manual inventory review.
    pub stock: i64,

    /// Threshold below which the product shows up in the low-stock list.
    pub min_stock: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether the product is at or below its low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

// =============================================================================
// User
// =============================================================================

/// A staff member referenced by orders (creator) and registers (operator).
///
/// Authentication lives outside this crate; this is the identity record
/// foreign keys point at.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Staff role. Coarse-grained on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Waiter,
    Cashier,
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order (a "comanda").
///
/// ## State Machine
/// ```text
///   open ──► pending_payment ──► paid       (terminal)
///    │              │
///    └──────────────┴──────────► cancelled  (terminal)
/// ```
///
/// Items may only be added or removed while the order is `Open`. Once sent
/// to the register (`PendingPayment`) the ticket is frozen until checkout
/// or cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Ticket is being built at the table.
    Open,
    /// Sent to the cash register, awaiting checkout.
    PendingPayment,
    /// Settled. Terminal.
    Paid,
    /// Abandoned before payment. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Whether the order can still change (not paid or cancelled).
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }

    /// Checks whether a transition to `next` is legal.
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Open, OrderStatus::PendingPayment)
                | (OrderStatus::Open, OrderStatus::Cancelled)
                | (OrderStatus::PendingPayment, OrderStatus::Paid)
                | (OrderStatus::PendingPayment, OrderStatus::Cancelled)
        )
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Open
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Open => "open",
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// QR / wallet payment.
    DigitalWallet,
    /// House account - settled later via an AccountReceivable.
    Credit,
}

// =============================================================================
// Order
// =============================================================================

/// A running tab for one table, composed of line items, until paid or
/// cancelled.
///
/// `total_cents` is derived, not authoritative: it always equals the sum of
/// `quantity × unit_price_cents` over the current items and is recomputed
/// in the same transaction as every item mutation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,

    /// Table this order belongs to.
    pub table_id: String,

    /// Staff member who opened the order.
    pub user_id: String,

    pub status: OrderStatus,

    /// Derived total in cents.
    pub total_cents: i64,

    /// Set at checkout; None while the order is live.
    pub payment_method: Option<PaymentMethod>,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// When the order reached a terminal status.
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Returns the total as a Money type.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item on an order.
///
/// Uses the snapshot pattern: `unit_price_cents` is copied from the product
/// at add time and immutable thereafter. Re-pricing the menu never rewrites
/// an open ticket.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,

    /// Quantity ordered, always >= 1.
    pub quantity: i64,

    /// Unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Kitchen notes ("sin cebolla").
    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Register Status
// =============================================================================

/// The status of a cash register shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RegisterStatus {
    Open,
    Closed,
}

// =============================================================================
// Cash Register
// =============================================================================

/// A cash register shift: a single open/closed record bounding a time
/// window. Sales aggregation at close time runs over paid orders created
/// inside that window.
///
/// At most one register may be open system-wide; the schema enforces this
/// with a partial unique index rather than a check-then-insert sequence.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CashRegister {
    pub id: String,

    /// Operator who opened the shift.
    pub user_id: String,

    pub status: RegisterStatus,

    /// Cash in the drawer at open.
    pub initial_amount_cents: i64,

    /// Cash counted at close; None while open.
    pub final_amount_cents: Option<i64>,

    /// Derived at close time: sum of paid-order totals in the window.
    pub total_sales_cents: Option<i64>,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Account Receivable
// =============================================================================

/// A deferred payment obligation tied to an order (1:1).
///
/// Created when an order is checked out on credit; settled later from the
/// register screen.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct AccountReceivable {
    pub id: String,
    pub order_id: String,
    pub amount_cents: i64,
    pub is_paid: bool,

    #[ts(as = "Option<String>")]
    pub paid_at: Option<DateTime<Utc>>,

    #[ts(as = "Option<String>")]
    pub due_date: Option<DateTime<Utc>>,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_transitions() {
        use OrderStatus::*;

        assert!(Open.can_transition_to(PendingPayment));
        assert!(Open.can_transition_to(Cancelled));
        assert!(PendingPayment.can_transition_to(Paid));
        assert!(PendingPayment.can_transition_to(Cancelled));

        assert!(!Open.can_transition_to(Paid));
        assert!(!Paid.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Open));
        assert!(!PendingPayment.can_transition_to(Open));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!OrderStatus::Open.is_terminal());
        assert!(!OrderStatus::PendingPayment.is_terminal());
        assert!(OrderStatus::Paid.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_order_status_display() {
        assert_eq!(OrderStatus::PendingPayment.to_string(), "pending_payment");
        assert_eq!(OrderStatus::Open.to_string(), "open");
    }

    #[test]
    fn test_item_line_total() {
        let item = OrderItem {
            id: "i1".to_string(),
            order_id: "o1".to_string(),
            product_id: "p1".to_string(),
            quantity: 2,
            unit_price_cents: 10000,
            notes: None,
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total().cents(), 20000);
    }

    #[test]
    fn test_low_stock() {
        let product = Product {
            id: "p1".to_string(),
            category_id: "c1".to_string(),
            name: "Limonada".to_string(),
            description: None,
            price_cents: 3500,
            stock: 4,
            min_stock: 5,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(product.is_low_stock());
    }
}
