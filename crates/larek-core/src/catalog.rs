//! # Catalog Store
//!
//! Holds the fetched product list and the product currently open in the
//! preview.
//!
//! The list is replaced wholesale on every fetch. Products are never patched
//! in place, so a `Product` handed out earlier stays a faithful copy of what
//! was fetched at that time.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::events::{Event, StoreBus};
use crate::types::Product;

pub struct CatalogStore {
    bus: Rc<StoreBus>,
    products: RefCell<Vec<Product>>,
    preview: RefCell<Option<String>>,
}

impl CatalogStore {
    pub fn new(bus: Rc<StoreBus>) -> Self {
        CatalogStore {
            bus,
            products: RefCell::new(Vec::new()),
            preview: RefCell::new(None),
        }
    }

    /// Replaces the product list and publishes `catalog:changed`.
    ///
    /// A preview pointing at a product that is no longer listed is cleared
    /// (and `preview:changed` published after the catalog notification).
    pub fn set_products(&self, products: Vec<Product>) {
        let count = products.len();
        let preview_dropped = {
            let mut preview = self.preview.borrow_mut();
            let stale = preview
                .as_deref()
                .is_some_and(|id| !products.iter().any(|p| p.id == id));
            if stale {
                *preview = None;
            }
            stale
        };
        *self.products.borrow_mut() = products;

        info!(count, "catalog replaced");
        self.bus.publish(Event::CatalogChanged);
        if preview_dropped {
            self.bus.publish(Event::PreviewChanged);
        }
    }

    /// Looks up a product by id.
    pub fn get(&self, id: &str) -> Option<Product> {
        self.products.borrow().iter().find(|p| p.id == id).cloned()
    }

    /// Like [`get`](Self::get), but an unknown id is an error.
    pub fn require(&self, id: &str) -> CoreResult<Product> {
        self.get(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.products.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.borrow().is_empty()
    }

    /// Opens `id` in the preview and publishes `preview:changed`.
    pub fn set_preview(&self, id: &str) -> CoreResult<()> {
        self.require(id)?;
        *self.preview.borrow_mut() = Some(id.to_string());

        debug!(product_id = id, "preview set");
        self.bus.publish(Event::PreviewChanged);
        Ok(())
    }

    /// The product currently in the preview, if any.
    pub fn preview(&self) -> Option<Product> {
        let id = self.preview.borrow().clone()?;
        self.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;
    use crate::fixtures::product;

    fn recording_catalog() -> (CatalogStore, Rc<RefCell<Vec<Topic>>>) {
        use crate::bus::BusEvent;

        let bus = Rc::new(StoreBus::new());
        let seen: Rc<RefCell<Vec<Topic>>> = Rc::default();
        let log = Rc::clone(&seen);
        bus.subscribe_all(move |event| {
            log.borrow_mut().push(event.topic());
            Ok(())
        });
        (CatalogStore::new(bus), seen)
    }

    #[test]
    fn test_set_products_and_lookup() {
        let (catalog, seen) = recording_catalog();
        catalog.set_products(vec![product("a", Some(1)), product("b", None)]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("b").map(|p| p.is_priceless()), Some(true));
        assert!(catalog.get("zzz").is_none());
        assert!(matches!(catalog.require("zzz"), Err(CoreError::ProductNotFound(id)) if id == "zzz"));
        assert_eq!(*seen.borrow(), vec![Topic::CatalogChanged]);
    }

    #[test]
    fn test_preview() {
        let (catalog, seen) = recording_catalog();
        catalog.set_products(vec![product("a", Some(1))]);

        catalog.set_preview("a").unwrap();
        assert_eq!(catalog.preview().map(|p| p.id), Some("a".to_string()));
        assert!(catalog.set_preview("missing").is_err());
        assert_eq!(catalog.preview().map(|p| p.id), Some("a".to_string()));

        assert_eq!(*seen.borrow(), vec![Topic::CatalogChanged, Topic::PreviewChanged]);
    }

    #[test]
    fn test_replacement_drops_stale_preview() {
        let (catalog, seen) = recording_catalog();
        catalog.set_products(vec![product("a", Some(1)), product("b", Some(2))]);
        catalog.set_preview("a").unwrap();

        // Preview survives while its product is still listed.
        catalog.set_products(vec![product("a", Some(5))]);
        assert_eq!(catalog.preview().and_then(|p| p.price).map(|m| m.units()), Some(5));

        catalog.set_products(vec![product("b", Some(2))]);
        assert!(catalog.preview().is_none());

        assert_eq!(
            *seen.borrow(),
            vec![
                Topic::CatalogChanged,
                Topic::PreviewChanged,
                Topic::CatalogChanged,
                Topic::CatalogChanged,
                Topic::PreviewChanged,
            ]
        );
    }
}
