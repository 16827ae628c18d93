//! # Error Types
//!
//! Domain-specific error types for mercato-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mercato-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mercato-auth errors (separate crate)                                  │
//! │  └── AuthError        - Token and credential failures                  │
//! │                                                                         │
//! │  mercato-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP app errors (per service)                                         │
//! │  └── ApiError         - What clients see (status + body)               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, field, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing outcome

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They are normal, expected outcomes at the API boundary and map to
/// distinguishable status codes there.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cart item cannot be found in the customer's cart.
    ///
    /// ## When This Occurs
    /// - Updating or removing an item id that is not in the cart
    /// - Two clients racing: one removes the item, the other updates it
    ///
    /// This outcome persists nothing and publishes nothing.
    #[error("Cart item not found: {item_id}")]
    ItemNotFound { item_id: String },

    /// Registration collides with an existing account.
    ///
    /// ## When This Occurs
    /// - Username already taken
    /// - Public customer id already taken
    ///
    /// Detected by lookup before any persistence write, never by a write
    /// failure.
    #[error("{field} '{value}' is already registered")]
    DuplicateIdentity { field: String, value: String },

    /// Cart has exceeded maximum allowed items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an ItemNotFound error for the given item id.
    pub fn item_not_found(item_id: impl Into<String>) -> Self {
        CoreError::ItemNotFound {
            item_id: item_id.into(),
        }
    }

    /// Creates a DuplicateIdentity error for the given field.
    pub fn duplicate_identity(field: impl Into<String>, value: impl Into<String>) -> Self {
        CoreError::DuplicateIdentity {
            field: field.into(),
            value: value.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., disallowed characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
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
        let err = CoreError::item_not_found("item-42");
        assert_eq!(err.to_string(), "Cart item not found: item-42");

        let err = CoreError::duplicate_identity("username", "alice");
        assert_eq!(err.to_string(), "username 'alice' is already registered");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "username".to_string(),
        };
        assert_eq!(err.to_string(), "username is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "username".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
