//! # Error Types
//!
//! Domain-specific error types for larek-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  larek-core errors (this file)                                         │
//! │  ├── CoreError        - Refused checkout actions, unknown products     │
//! │  └── ValidationError  - Form field failures                            │
//! │                                                                         │
//! │  larek-core bus (bus.rs)                                               │
//! │  └── DispatchFailure  - A subscriber failed; reported, never fatal     │
//! │                                                                         │
//! │  larek-client errors (separate crate)                                  │
//! │  └── ClientError      - HTTP / config failures                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → checkout:refused → Adapter        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, stage, field)
//! 3. Errors are enum variants, never String
//! 4. Nothing here is fatal: every error is recoverable by user action

use thiserror::Error;

use crate::checkout::CheckoutStage;

// =============================================================================
// Core Error
// =============================================================================

/// Core coordination errors.
///
/// A `CoreError` coming out of the checkout machine means the requested
/// action was refused and the state is unchanged.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the current catalog.
    ///
    /// ## When This Occurs
    /// - An adapter toggles/selects a card from a stale render
    /// - The catalog was reloaded and the product is gone
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Checkout is not in a stage that accepts the requested action.
    ///
    /// ## User Workflow
    /// ```text
    /// Stage: Idle
    ///      │
    ///      ▼
    /// delivery:advance
    ///      │
    ///      ▼
    /// InvalidTransition { stage: Idle, action: "advance to contacts" }
    ///      │
    ///      ▼
    /// Refused, stage unchanged
    /// ```
    #[error("Checkout is {stage}, cannot {action}")]
    InvalidTransition {
        stage: CheckoutStage,
        action: &'static str,
    },

    /// Cart has nothing that can be paid for.
    #[error("Cart has no purchasable items")]
    EmptyCart,

    /// A submission is already in flight; a second one is rejected, not queued.
    #[error("Order submission already in progress")]
    SubmissionInFlight,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The checkout gate only guarantees *non-empty, method-selected* data.
/// Format checks (email shape, phone digits) are left to adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed {
        field: &'static str,
        allowed: Vec<&'static str>,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
