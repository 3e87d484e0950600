//! # Error Types
//!
//! Domain-specific error types for vendia-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vendia-core errors (this file)                                        │
//! │  ├── CoreError        - Settlement and caixa domain errors             │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  vendia-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  vendia-export errors (separate crate)                                 │
//! │  └── ExportError      - CSV/PDF rendering failures                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → UI message         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (session id, owner_ref, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::CashScope;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages; callers
/// branch on the variant, never on the message text.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A monetary input was negative or otherwise unusable.
    ///
    /// ## When This Occurs
    /// - Opening a caixa with a negative opening balance
    /// - Closing with a negative counted balance
    /// - Computing commission over a negative total
    #[error("Invalid amount for {field}: {cents} centavos")]
    InvalidAmount { field: String, cents: i64 },

    /// An open cash session already exists for this owner and scope.
    ///
    /// ## When This Occurs
    /// - The same user opens the caixa twice (second tab, second device)
    /// - A concurrent open raced into the store's unique index
    #[error("Cash session already open for {owner_ref} ({scope:?})")]
    SessionAlreadyOpen {
        owner_ref: String,
        scope: CashScope,
    },

    /// The close transition was attempted on a closed session.
    ///
    /// ## When This Occurs
    /// - Double-submit of the close form
    /// - A second close racing a first one; the guarded update writes nothing
    #[error("Cash session {id} is already closed")]
    SessionAlreadyClosed { id: String },

    /// Cash session cannot be found.
    #[error("Cash session not found: {id}")]
    SessionNotFound { id: String },

    /// Seller cannot be found (or is inactive).
    #[error("Seller not found: {0}")]
    SellerNotFound(String),

    /// A fetched sale row is malformed (negative quantity or unit price).
    ///
    /// Totals must be trustworthy for reconciliation, so one bad row fails
    /// the whole aggregation instead of being skipped.
    #[error("Malformed sale {sale_id}: {reason}")]
    DataIntegrity { sale_id: String, reason: String },

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
        let err = CoreError::SessionAlreadyOpen {
            owner_ref: "seller-7".to_string(),
            scope: CashScope::Seller,
        };
        assert_eq!(
            err.to_string(),
            "Cash session already open for seller-7 (Seller)"
        );

        let err = CoreError::DataIntegrity {
            sale_id: "s-42".to_string(),
            reason: "negative quantity".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed sale s-42: negative quantity");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "description".to_string(),
        };
        assert_eq!(err.to_string(), "description is required");

        let err = ValidationError::OutOfRange {
            field: "commission_rate".to_string(),
            min: 0,
            max: 10_000,
        };
        assert_eq!(
            err.to_string(),
            "commission_rate must be between 0 and 10000"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
