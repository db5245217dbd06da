//! # Validation Module
//!
//! The advance/submit gate used by the checkout state machine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation adapter                                          │
//! │  ├── Optional format checks (email shape, phone digits)                │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (checkout gate)                                  │
//! │  ├── Delivery: payment selected AND address non-empty                  │
//! │  └── Contact:  email non-empty AND phone non-empty                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storefront API                                               │
//! │  └── Semantic checks, reported back as order:failure                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checks are necessary-but-not-sufficient: the gate guarantees that only
//! non-empty, method-selected data reaches submission. Lengths are compared
//! as-is, without trimming.
//!
//! ## Usage
//! ```rust
//! use larek_core::types::{DeliveryInfo, PaymentMethod};
//! use larek_core::validation::validate_delivery;
//!
//! let delivery = DeliveryInfo::new(Some(PaymentMethod::Cash), "");
//! assert!(validate_delivery(&delivery).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ContactInfo, DeliveryInfo};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Form Validators
// =============================================================================

/// Validates the delivery step.
///
/// ## Rules
/// - A payment method must be selected (card or cash)
/// - Address must not be empty
///
/// The payment check runs first, so a fully empty form reports the payment.
pub fn validate_delivery(delivery: &DeliveryInfo) -> ValidationResult<()> {
    if delivery.payment.is_none() {
        return Err(ValidationError::NotAllowed {
            field: "payment",
            allowed: vec!["card", "cash"],
        });
    }

    require("address", &delivery.address)
}

/// Validates the contact step.
///
/// ## Rules
/// - Email must not be empty
/// - Phone must not be empty
pub fn validate_contact(contact: &ContactInfo) -> ValidationResult<()> {
    require("email", &contact.email)?;
    require("phone", &contact.phone)
}

/// Validates that a cart amount can be checked out.
///
/// A cart holding only priceless products has a zero amount and cannot open
/// checkout.
pub fn validate_cart_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "cart amount",
        });
    }

    Ok(())
}

/// Boolean form of [`validate_delivery`], as published on `delivery:validity`.
#[inline]
pub fn is_delivery_valid(delivery: &DeliveryInfo) -> bool {
    validate_delivery(delivery).is_ok()
}

/// Boolean form of [`validate_contact`], as published on `contact:validity`.
#[inline]
pub fn is_contact_valid(contact: &ContactInfo) -> bool {
    validate_contact(contact).is_ok()
}

fn require(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
