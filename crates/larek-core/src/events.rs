//! # Storefront Events
//!
//! Every message that travels on the storefront bus.
//!
//! ## Topic Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Adapter ──► Core            Core ──► Adapter         Core ◄─► Driver   │
//! │  ─────────────────           ─────────────────        ───────────────   │
//! │  card:select(id)             catalog:changed          order:submit      │
//! │  card:toggle(id)             catalog:failed(reason)   submission:       │
//! │  order:open                  preview:changed            succeeded       │
//! │  delivery:input(info)        cart:changed             submission:       │
//! │  delivery:advance            checkout:stage(stage)      failed          │
//! │  contact:input(info)         checkout:refused(reason)                   │
//! │  contact:submit              delivery:validity(bool)                    │
//! │  checkout:close              contact:validity(bool)                     │
//! │  checkout:retry              order:success(total)                       │
//! │                              order:failure(reason)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Change notifications (`catalog:changed`, `preview:changed`,
//! `cart:changed`) carry no payload: observers re-read the owning store.

use std::fmt;

use crate::bus::{self, BusEvent};
use crate::checkout::{AttemptId, CheckoutStage};
use crate::money::Money;
use crate::types::{ContactInfo, DeliveryInfo, OrderResult, OrderSnapshot};

/// The storefront bus.
pub type StoreBus = bus::EventBus<Event>;

// =============================================================================
// Event
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // ---- adapter → core ----------------------------------------------------
    CardSelect(String),
    CardToggle(String),
    OrderOpen,
    DeliveryInput(DeliveryInfo),
    DeliveryAdvance,
    ContactInput(ContactInfo),
    ContactSubmit,
    CheckoutClose,
    CheckoutRetry,

    // ---- core → adapter ----------------------------------------------------
    CatalogChanged,
    CatalogFailed(String),
    PreviewChanged,
    CartChanged,
    CheckoutStage(CheckoutStage),
    CheckoutRefused(String),
    DeliveryValidity(bool),
    ContactValidity(bool),
    OrderSuccess(Money),
    OrderFailure(String),

    // ---- core ↔ submission driver -----------------------------------------
    OrderSubmit {
        attempt: AttemptId,
        snapshot: OrderSnapshot,
    },
    SubmissionSucceeded {
        attempt: AttemptId,
        result: OrderResult,
    },
    SubmissionFailed {
        attempt: AttemptId,
        reason: String,
    },
}

impl BusEvent for Event {
    type Topic = Topic;

    fn topic(&self) -> Topic {
        match self {
            Event::CardSelect(_) => Topic::CardSelect,
            Event::CardToggle(_) => Topic::CardToggle,
            Event::OrderOpen => Topic::OrderOpen,
            Event::DeliveryInput(_) => Topic::DeliveryInput,
            Event::DeliveryAdvance => Topic::DeliveryAdvance,
            Event::ContactInput(_) => Topic::ContactInput,
            Event::ContactSubmit => Topic::ContactSubmit,
            Event::CheckoutClose => Topic::CheckoutClose,
            Event::CheckoutRetry => Topic::CheckoutRetry,
            Event::CatalogChanged => Topic::CatalogChanged,
            Event::CatalogFailed(_) => Topic::CatalogFailed,
            Event::PreviewChanged => Topic::PreviewChanged,
            Event::CartChanged => Topic::CartChanged,
            Event::CheckoutStage(_) => Topic::CheckoutStage,
            Event::CheckoutRefused(_) => Topic::CheckoutRefused,
            Event::DeliveryValidity(_) => Topic::DeliveryValidity,
            Event::ContactValidity(_) => Topic::ContactValidity,
            Event::OrderSuccess(_) => Topic::OrderSuccess,
            Event::OrderFailure(_) => Topic::OrderFailure,
            Event::OrderSubmit { .. } => Topic::OrderSubmit,
            Event::SubmissionSucceeded { .. } => Topic::SubmissionSucceeded,
            Event::SubmissionFailed { .. } => Topic::SubmissionFailed,
        }
    }
}

// =============================================================================
// Topic
// =============================================================================

/// A named channel on the storefront bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    CardSelect,
    CardToggle,
    OrderOpen,
    DeliveryInput,
    DeliveryAdvance,
    ContactInput,
    ContactSubmit,
    CheckoutClose,
    CheckoutRetry,
    CatalogChanged,
    CatalogFailed,
    PreviewChanged,
    CartChanged,
    CheckoutStage,
    CheckoutRefused,
    DeliveryValidity,
    ContactValidity,
    OrderSuccess,
    OrderFailure,
    OrderSubmit,
    SubmissionSucceeded,
    SubmissionFailed,
}

impl Topic {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Topic::CardSelect => "card:select",
            Topic::CardToggle => "card:toggle",
            Topic::OrderOpen => "order:open",
            Topic::DeliveryInput => "delivery:input",
            Topic::DeliveryAdvance => "delivery:advance",
            Topic::ContactInput => "contact:input",
            Topic::ContactSubmit => "contact:submit",
            Topic::CheckoutClose => "checkout:close",
            Topic::CheckoutRetry => "checkout:retry",
            Topic::CatalogChanged => "catalog:changed",
            Topic::CatalogFailed => "catalog:failed",
            Topic::PreviewChanged => "preview:changed",
            Topic::CartChanged => "cart:changed",
            Topic::CheckoutStage => "checkout:stage",
            Topic::CheckoutRefused => "checkout:refused",
            Topic::DeliveryValidity => "delivery:validity",
            Topic::ContactValidity => "contact:validity",
            Topic::OrderSuccess => "order:success",
            Topic::OrderFailure => "order:failure",
            Topic::OrderSubmit => "order:submit",
            Topic::SubmissionSucceeded => "submission:succeeded",
            Topic::SubmissionFailed => "submission:failed",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_names() {
        assert_eq!(Event::CardToggle("a".into()).topic().to_string(), "card:toggle");
        assert_eq!(Event::DeliveryValidity(true).topic().to_string(), "delivery:validity");
        assert_eq!(Event::OrderFailure("x".into()).topic(), Topic::OrderFailure);
        assert_eq!(Topic::SubmissionSucceeded.as_str(), "submission:succeeded");
    }
}
