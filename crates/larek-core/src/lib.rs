//! # larek-core: Storefront Coordination Layer
//!
//! This crate is the **heart** of the Larek storefront client. It holds the
//! event bus, the stores and the checkout state machine, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Larek Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation Adapter (apps/terminal)            │   │
//! │  │    Catalog view ──► Preview ──► Cart view ──► Checkout forms   │   │
//! │  └──────────────▲──────────────────────────────┬───────────────────┘   │
//! │      *:changed  │                              │ card:*, order:open,   │
//! │      checkout:* │                              │ delivery:*, contact:* │
//! │  ┌──────────────┴──────────────────────────────▼───────────────────┐   │
//! │  │               ★ larek-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────────────── EventBus ────────────────────────┐ │   │
//! │  │   └────▲──────────────▲──────────────▲──────────────▲───────┘ │   │
//! │  │   ┌────┴─────┐  ┌─────┴────┐  ┌──────┴────┐  ┌──────┴─────┐  │   │
//! │  │   │ Catalog  │  │   Cart   │  │  Checkout │  │   Order    │  │   │
//! │  │   │  Store   │  │  Store   │  │  Machine  │──│   Store    │  │   │
//! │  │   └──────────┘  └──────────┘  └───────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • SINGLE THREADED                        │   │
//! │  └──────────────────────────────┬──────────────▲───────────────────┘   │
//! │                    order:submit │              │ submission:*          │
//! │  ┌──────────────────────────────▼──────────────┴───────────────────┐   │
//! │  │                 larek-client (HTTP + session)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`bus`] - Generic synchronous publish/subscribe
//! - [`events`] - The storefront event and topic vocabulary
//! - [`catalog`], [`cart`], [`order`] - The stores
//! - [`checkout`] - Checkout state machine
//! - [`storefront`] - Composition root wiring all of the above
//! - [`types`], [`money`], [`validation`], [`error`] - Domain vocabulary
//!
//! ## Design Principles
//!
//! 1. **Bus only**: Components never call adapters; adapters never write stores
//! 2. **Call then emit**: Every mutation is an explicit method that publishes
//!    after its state change is complete
//! 3. **Integer Money**: Prices are whole units (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use larek_core::events::Event;
//! use larek_core::storefront::Storefront;
//! use larek_core::types::{Category, Product};
//! use larek_core::Money;
//!
//! let store = Storefront::new();
//! store.catalog.set_products(vec![Product {
//!     id: "a".into(),
//!     title: "+1 час в сутках".into(),
//!     description: String::new(),
//!     category: Category::SoftSkill,
//!     image: "/5_Dots.svg".into(),
//!     price: Some(Money::from_units(750)),
//! }]);
//!
//! store.bus.publish(Event::CardToggle("a".into()));
//! assert_eq!(store.cart.amount().units(), 750);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bus;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod events;
pub mod money;
pub mod order;
pub mod storefront;
pub mod types;
pub mod validation;

#[cfg(test)]
mod fixtures;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bus::{BusEvent, DispatchFailure, EventBus, HandlerResult, SubscriptionId};
pub use checkout::{AttemptId, CheckoutStage};
pub use error::{CoreError, CoreResult, ValidationError};
pub use events::{Event, StoreBus, Topic};
pub use money::Money;
pub use storefront::Storefront;
pub use types::*;
