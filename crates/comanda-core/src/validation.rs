//! # Validation Module
//!
//! Input validation utilities for Comanda POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  └── Basic format checks, immediate user feedback                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service (Rust)                                               │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL, UNIQUE, CHECK and foreign key constraints               │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_TICKET_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity display name (table, category, product).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 150 characters
///
/// ## Returns
/// The trimmed name, ready to persist.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 150 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 150,
        });
    }

    Ok(name.to_string())
}

/// Validates optional free-text notes.
///
/// Empty or whitespace-only notes collapse to None.
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    match notes {
        None => Ok(None),
        Some(n) => {
            let n = n.trim();
            if n.is_empty() {
                return Ok(None);
            }
            if n.len() > 500 {
                return Err(ValidationError::TooLong {
                    field: "notes".to_string(),
                    max: 500,
                });
            }
            Ok(Some(n.to_string()))
        }
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a product price in cents.
///
/// ## Rules
/// - Must be strictly positive; a free menu item is a data entry error
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a drawer amount in cents (initial or final shift count).
///
/// Zero is allowed: an empty drawer is a valid count.
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a table seating capacity.
pub fn validate_capacity(capacity: i64) -> ValidationResult<()> {
    if capacity <= 0 || capacity > 100 {
        return Err(ValidationError::OutOfRange {
            field: "capacity".to_string(),
            min: 1,
            max: 100,
        });
    }

    Ok(())
}

/// Validates ticket size (number of unique lines on one order).
pub fn validate_ticket_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_TICKET_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "order items".to_string(),
            min: 0,
            max: MAX_TICKET_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "  Mesa 1  ").unwrap(), "Mesa 1");
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_notes() {
        assert_eq!(validate_notes(None).unwrap(), None);
        assert_eq!(validate_notes(Some("  ")).unwrap(), None);
        assert_eq!(
            validate_notes(Some(" sin cebolla ")).unwrap(),
            Some("sin cebolla".to_string())
        );
        assert!(validate_notes(Some(&"A".repeat(600))).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(10000).is_ok());
        assert!(validate_price_cents(0).is_err());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_amount_cents() {
        assert!(validate_amount_cents("initial amount", 0).is_ok());
        assert!(validate_amount_cents("initial amount", 50000).is_ok());
        assert!(validate_amount_cents("final amount", -1).is_err());
    }

    #[test]
    fn test_validate_capacity() {
        assert!(validate_capacity(4).is_ok());
        assert!(validate_capacity(0).is_err());
        assert!(validate_capacity(101).is_err());
    }
}
