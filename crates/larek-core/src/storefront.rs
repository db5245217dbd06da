//! # Storefront
//!
//! Owns the bus and every store, and wires them together.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Storefront::new()      bus, catalog, cart, order, checkout         │
//! │                            card:select / card:toggle wiring            │
//! │                            checkout attached                           │
//! │  2. adapters subscribe     render on *:changed, checkout:*, order:*    │
//! │  3. run                    adapters publish input events               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Card events carry only a product id. A toggle of an id already in the
//! cart removes the cart's own copy, so products dropped by a catalog reload
//! can still be taken out. Otherwise the id is resolved against the catalog;
//! an id the catalog does not know fails the handler, which the bus reports
//! on its failure channel.

use std::rc::Rc;

use tracing::debug;

use crate::cart::CartStore;
use crate::catalog::CatalogStore;
use crate::checkout::Checkout;
use crate::events::{Event, StoreBus, Topic};
use crate::order::OrderStore;

pub struct Storefront {
    pub bus: Rc<StoreBus>,
    pub catalog: Rc<CatalogStore>,
    pub cart: Rc<CartStore>,
    pub order: Rc<OrderStore>,
    pub checkout: Rc<Checkout>,
}

impl Storefront {
    pub fn new() -> Self {
        let bus = Rc::new(StoreBus::new());
        let catalog = Rc::new(CatalogStore::new(Rc::clone(&bus)));
        let cart = Rc::new(CartStore::new(Rc::clone(&bus)));
        let order = Rc::new(OrderStore::new());
        let checkout = Rc::new(Checkout::new(
            Rc::clone(&bus),
            Rc::clone(&cart),
            Rc::clone(&order),
        ));

        let storefront = Storefront {
            bus,
            catalog,
            cart,
            order,
            checkout,
        };
        storefront.wire_cards();
        storefront.checkout.attach();

        debug!("storefront assembled");
        storefront
    }

    fn wire_cards(&self) {
        let catalog = Rc::downgrade(&self.catalog);
        self.bus.subscribe(Topic::CardSelect, move |event| {
            if let (Some(catalog), Event::CardSelect(id)) = (catalog.upgrade(), event) {
                catalog.set_preview(id)?;
            }
            Ok(())
        });

        let catalog = Rc::downgrade(&self.catalog);
        let cart = Rc::downgrade(&self.cart);
        self.bus.subscribe(Topic::CardToggle, move |event| {
            if let (Some(catalog), Some(cart), Event::CardToggle(id)) =
                (catalog.upgrade(), cart.upgrade(), event)
            {
                if cart.remove(id).is_none() {
                    cart.toggle(&catalog.require(id)?);
                }
            }
            Ok(())
        });
    }
}

impl Default for Storefront {
    fn default() -> Self {
        Self::new()
    }
}
