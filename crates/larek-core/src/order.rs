//! # Order Store
//!
//! Accumulates the delivery and contact forms for the checkout in progress.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartStore  ──(amount, item_ids copies)──┐                              │
//! │                                          ▼                              │
//! │  OrderStore { delivery, contact } ──► snapshot() ──► OrderSnapshot      │
//! │                                                       (immutable)       │
//! │                                                                         │
//! │  The snapshot holds copies, never a live view of the cart: toggling    │
//! │  cards while a submission is in flight cannot change what was sent.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store does not validate. The checkout machine runs the validation gate
//! before it writes here or asks for a snapshot.

use std::cell::RefCell;

use chrono::Utc;
use tracing::debug;

use crate::money::Money;
use crate::types::{ContactInfo, DeliveryInfo, OrderSnapshot};

#[derive(Debug, Default)]
pub struct OrderStore {
    delivery: RefCell<DeliveryInfo>,
    contact: RefCell<ContactInfo>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the whole delivery record.
    pub fn set_delivery(&self, info: DeliveryInfo) {
        *self.delivery.borrow_mut() = info;
    }

    /// Overwrites the whole contact record.
    pub fn set_contact(&self, info: ContactInfo) {
        *self.contact.borrow_mut() = info;
    }

    pub fn delivery(&self) -> DeliveryInfo {
        self.delivery.borrow().clone()
    }

    pub fn contact(&self) -> ContactInfo {
        self.contact.borrow().clone()
    }

    /// Clears both records back to defaults.
    pub fn reset(&self) {
        self.delivery.replace(DeliveryInfo::default());
        self.contact.replace(ContactInfo::default());
        debug!("order fields reset");
    }

    /// Assembles the submission record from the current fields and the given
    /// cart copies.
    pub fn snapshot(&self, cart_amount: Money, cart_item_ids: Vec<String>) -> OrderSnapshot {
        OrderSnapshot {
            delivery: self.delivery(),
            contact: self.contact(),
            total: cart_amount,
            items: cart_item_ids,
            taken_at: Utc::now(),
        }
    }
}
