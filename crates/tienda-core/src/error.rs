//! # Error Types
//!
//! Domain-specific error types for tienda-core.
//!
//! ## Error Philosophy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Where Errors Live                                │
//! │                                                                         │
//! │  Form input (email, card, phone, zip)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ValidationError (this file) ← the ONLY rejection point                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StateStore mutations ← never reject: clamp or ignore, with status     │
//! │                                                                         │
//! │  The store has no fatal errors by design; every failure mode degrades  │
//! │  to a safe default. Validation happens BEFORE the store is called.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when form input doesn't meet requirements. They are raised
/// by the form layer before any store mutation; the store itself never
/// rejects a well-typed payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    /// Invalid format (bad email shape, failed Luhn check, wrong digit count).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
