//! # Error Types
//!
//! Domain-specific error types for aura-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  aura-core errors (this file)                                       │
//! │  ├── CoreError        - Pricing / business rule failures            │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  aura-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                 │
//! │  └── SettlementError  - Orchestration failures (wraps CoreError)    │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → SettlementError → caller       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (index, amounts, ids)
//! 3. Errors are enum variants, never String
//! 4. Rejections happen before any write; the calculator never clamps
//!    silently except where the pricing rules say to (point redemption)

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing and business rule errors.
///
/// Everything here is a validation-class failure: no state was written,
/// the caller can correct the input and retry.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The cart has no line items; there is nothing to settle.
    #[error("Cart is empty")]
    EmptyCart,

    /// A line item fails the basic shape rules (price >= 0, quantity >= 1).
    #[error("Invalid line item at position {index}: {reason}")]
    InvalidLineItem { index: usize, reason: String },

    /// Discount exceeds the subtotal.
    ///
    /// Point redemption is clamped upstream, so reaching this state means
    /// a membership plan or caller produced an over-discount. That is a
    /// pricing bug, not a condition to clamp away.
    #[error("Discount {discount_cents} exceeds subtotal {subtotal_cents}")]
    DiscountExceedsSubtotal {
        discount_cents: i64,
        subtotal_cents: i64,
    },

    /// A monetary amount left the representable range.
    ///
    /// Treated as a programmer/logic error: fail fast, never wrap.
    #[error("Amount overflow while computing {context}")]
    AmountOverflow { context: &'static str },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when request fields don't meet requirements; used for early
/// validation before pricing runs.
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

    /// Value must be non-negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
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
        let err = CoreError::DiscountExceedsSubtotal {
            discount_cents: 250_000,
            subtotal_cents: 200_000,
        };
        assert_eq!(
            err.to_string(),
            "Discount 250000 exceeds subtotal 200000"
        );

        let err = CoreError::InvalidLineItem {
            index: 2,
            reason: "quantity must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid line item at position 2: quantity must be at least 1"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "storeId".to_string(),
        };
        assert_eq!(err.to_string(), "storeId is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBeNonNegative {
            field: "pointsToRedeem".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
