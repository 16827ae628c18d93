//! # Validation Module
//!
//! Input validation utilities for Mercato.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Domain (mercato-core)                                        │
//! │  └── Structural limits (cart size, max quantity)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (PostgreSQL)                                        │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mercato_core::validation::{validate_quantity, validate_username};
//!
//! // Validate before mutating a cart
//! validate_quantity(5).unwrap();
//!
//! // Validate before registering an account
//! validate_username("alice").unwrap();
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Cart Input Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0). A quantity reduced to zero is rejected, never
///   stored: the "every stored item has quantity >= 1" invariant holds for
///   add and update alike.
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

/// Validates a product id.
///
/// ## Rules
/// - Must be positive; product ids are assigned by the catalog upstream and
///   are never zero or negative
pub fn validate_product_id(product_id: i64) -> ValidationResult<()> {
    if product_id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "productId".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Account Input Validators
// =============================================================================

/// Validates a login username.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 3 and 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores, dots
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() < 3 {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: 3,
        });
    }

    if username.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, hyphens, underscores, and dots"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a raw password before hashing.
///
/// ## Rules
/// - Must be between 8 and 128 characters
///
/// Content rules (character classes etc.) are deliberately not enforced;
/// length is the one property that reliably correlates with strength.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.len() < 8 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        });
    }

    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

/// Validates a public customer identifier.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 64 characters
/// - Should contain only alphanumeric characters and hyphens
pub fn validate_customer_id(customer_id: &str) -> ValidationResult<()> {
    let customer_id = customer_id.trim();

    if customer_id.is_empty() {
        return Err(ValidationError::Required {
            field: "customerId".to_string(),
        });
    }

    if customer_id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "customerId".to_string(),
            max: 64,
        });
    }

    if !customer_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "customerId".to_string(),
            reason: "must contain only letters, numbers, and hyphens".to_string(),
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
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id(1).is_ok());
        assert!(validate_product_id(42).is_ok());

        assert!(validate_product_id(0).is_err());
        assert!(validate_product_id(-7).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob.smith_99").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("correct horse").is_ok());

        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_customer_id() {
        assert!(validate_customer_id("cust-0001").is_ok());
        assert!(validate_customer_id("9f8e7d6c").is_ok());

        assert!(validate_customer_id("").is_err());
        assert!(validate_customer_id("has space").is_err());
        assert!(validate_customer_id(&"c".repeat(100)).is_err());
    }
}
