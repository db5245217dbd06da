//! # Cart Store
//!
//! Holds the products the shopper selected.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Adapter Event            Store Method            Cart Change           │
//! │  ─────────────            ────────────            ───────────           │
//! │                                                                         │
//! │  card:toggle(id) ───────► remove(id) ───────────► drop cart's copy     │
//! │    (not in cart) ───────► toggle(product) ──────► push                 │
//! │                                                                         │
//! │  (checkout success) ────► clear() ──────────────► items.clear()        │
//! │                                                                         │
//! │  Render ────────────────► items() / amount() ───► (read only)          │
//! │                                                                         │
//! │  NOTE: every write publishes cart:changed AFTER the borrow is          │
//! │        released, so observers may read the store immediately.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - A product appears at most once (unique by id)
//! - Display order is insertion order
//! - Priceless products count toward `count()` but never toward `amount()`
//!   or `item_ids()`

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::events::{Event, StoreBus};
use crate::money::Money;
use crate::types::Product;

/// The shopping cart.
pub struct CartStore {
    bus: Rc<StoreBus>,
    items: RefCell<Vec<Product>>,
}

impl CartStore {
    /// Creates a new empty cart publishing on `bus`.
    pub fn new(bus: Rc<StoreBus>) -> Self {
        CartStore {
            bus,
            items: RefCell::new(Vec::new()),
        }
    }

    /// Adds `product` if absent, removes it if present.
    ///
    /// Returns true if the product is in the cart afterwards.
    pub fn toggle(&self, product: &Product) -> bool {
        let added = {
            let mut items = self.items.borrow_mut();
            match items.iter().position(|p| p.id == product.id) {
                Some(index) => {
                    items.remove(index);
                    false
                }
                None => {
                    items.push(product.clone());
                    true
                }
            }
        };

        debug!(product_id = %product.id, added, "cart toggled");
        self.bus.publish(Event::CartChanged);
        added
    }

    /// Removes the entry with `product_id`, returning the cart's copy.
    ///
    /// Works for products the current catalog no longer lists. Publishes
    /// `cart:changed` only if something was removed.
    pub fn remove(&self, product_id: &str) -> Option<Product> {
        let removed = {
            let mut items = self.items.borrow_mut();
            let index = items.iter().position(|p| p.id == product_id)?;
            items.remove(index)
        };

        debug!(product_id, "removed from cart");
        self.bus.publish(Event::CartChanged);
        Some(removed)
    }

    /// Empties the cart.
    pub fn clear(&self) {
        self.items.borrow_mut().clear();

        debug!("cart cleared");
        self.bus.publish(Event::CartChanged);
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.items.borrow().iter().any(|p| p.id == product_id)
    }

    /// Sum of prices of priced entries.
    pub fn amount(&self) -> Money {
        self.items.borrow().iter().filter_map(|p| p.price).sum()
    }

    /// Number of entries, priceless ones included.
    pub fn count(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Ids of priced entries in insertion order, as submitted with an order.
    pub fn item_ids(&self) -> Vec<String> {
        self.items
            .borrow()
            .iter()
            .filter(|p| !p.is_priceless())
            .map(|p| p.id.clone())
            .collect()
    }

    /// Copy of all entries in display order.
    pub fn items(&self) -> Vec<Product> {
        self.items.borrow().clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
