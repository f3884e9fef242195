//! # Error Types
//!
//! Domain-specific error types for comanda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  comanda-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  comanda-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  comanda-service errors (separate crate)                               │
//! │  └── ServiceError     - What callers see (code + message)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ServiceError            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (table name, order ID, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Table cannot be found.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Order cannot be found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Product cannot be found or is inactive.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Category cannot be found or is inactive.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Order item cannot be found on the given order.
    #[error("Order item not found: {0}")]
    ItemNotFound(String),

    /// Table already has a non-terminal order.
    ///
    /// ## When This Occurs
    /// Opening a second order on a table whose current order is still
    /// open or pending payment.
    #[error("Table {table_id} already has an active order")]
    TableOccupied { table_id: String },

    /// Requested status transition is not allowed by the state machine.
    ///
    /// ## When This Occurs
    /// - Checkout on an order that was never sent to the register
    /// - Cancelling an already paid order
    /// - Sending a cancelled order to the register
    #[error("Order {order_id} is {current}, cannot transition to {requested}")]
    InvalidTransition {
        order_id: String,
        current: OrderStatus,
        requested: OrderStatus,
    },

    /// Items may only change while the order is open.
    #[error("Order {order_id} is {status}, its items can no longer change")]
    OrderNotEditable {
        order_id: String,
        status: OrderStatus,
    },

    /// A cash register shift is already open.
    ///
    /// The database backs this with a partial unique index, so even two
    /// racing open requests cannot both succeed.
    #[error("A cash register shift is already open")]
    ShiftAlreadyOpen,

    /// No open shift for the requested operation.
    #[error("No cash register shift is open")]
    NoOpenShift,

    /// Category still has active products and cannot be deactivated.
    #[error("Category has {count} active products")]
    CategoryInUse { count: i64 },

    /// Table still has active orders and cannot be deleted.
    #[error("Table has {count} active orders")]
    TableInUse { count: i64 },

    /// Receivable cannot be found.
    #[error("Account receivable not found: {0}")]
    ReceivableNotFound(String),

    /// Receivable was already settled.
    #[error("Account receivable {0} is already paid")]
    ReceivableAlreadyPaid(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CategoryInUse { count: 3 };
        assert_eq!(err.to_string(), "Category has 3 active products");

        let err = CoreError::InvalidTransition {
            order_id: "o-1".to_string(),
            current: OrderStatus::Open,
            requested: OrderStatus::Paid,
        };
        assert_eq!(
            err.to_string(),
            "Order o-1 is open, cannot transition to paid"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "price must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
