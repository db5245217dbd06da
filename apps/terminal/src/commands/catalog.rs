//! Catalog commands: `show` and `toggle`.
//!
//! Both resolve a [`Target`] against the catalog as it is currently listed
//! and produce the card event the storefront already knows how to handle.

use larek_core::catalog::CatalogStore;
use larek_core::Event;

use super::Target;
use crate::error::{AppError, AppResult};

/// Resolves a 1-based index or an id to a product id.
///
/// Ids are passed through unchecked; the storefront reports unknown ids
/// itself. Indexes must point into the current listing.
pub fn resolve(catalog: &CatalogStore, target: &Target) -> AppResult<String> {
    match target {
        Target::Id(id) => Ok(id.clone()),
        Target::Index(n) => n
            .checked_sub(1)
            .and_then(|i| catalog.products().into_iter().nth(i))
            .map(|p| p.id)
            .ok_or_else(|| AppError::NoSuchProduct(format!("#{n}"))),
    }
}

pub fn show(catalog: &CatalogStore, target: &Target) -> AppResult<Event> {
    resolve(catalog, target).map(Event::CardSelect)
}

pub fn toggle(catalog: &CatalogStore, target: &Target) -> AppResult<Event> {
    resolve(catalog, target).map(Event::CardToggle)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use larek_core::{Category, Money, Product, StoreBus};

    use super::*;

    fn catalog() -> CatalogStore {
        let catalog = CatalogStore::new(Rc::new(StoreBus::new()));
        let product = |id: &str| Product {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            category: Category::Other,
            image: format!("/{id}.svg"),
            price: Some(Money::from_units(10)),
        };
        catalog.set_products(vec![product("first"), product("second")]);
        catalog
    }

    #[test]
    fn test_resolve_by_index() {
        let catalog = catalog();
        assert_eq!(resolve(&catalog, &Target::Index(2)).unwrap(), "second");
        assert!(matches!(
            resolve(&catalog, &Target::Index(0)),
            Err(AppError::NoSuchProduct(_))
        ));
        assert!(matches!(
            resolve(&catalog, &Target::Index(3)),
            Err(AppError::NoSuchProduct(n)) if n == "#3"
        ));
    }

    #[test]
    fn test_ids_become_card_events() {
        let catalog = catalog();
        assert_eq!(
            toggle(&catalog, &Target::Id("ghost".into())).unwrap(),
            Event::CardToggle("ghost".into())
        );
        assert_eq!(
            show(&catalog, &Target::Index(1)).unwrap(),
            Event::CardSelect("first".into())
        );
    }
}
