//! # State Module
//!
//! State owned by the terminal adapter rather than by the storefront.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐     ┌──────────────────────────────┐ │
//! │  │  Storefront (larek-core)     │     │  FormState (here)            │ │
//! │  │                              │     │                              │ │
//! │  │  catalog, cart, order,       │     │  what the shopper has typed  │ │
//! │  │  checkout stage              │◄────│  so far, sent as whole       │ │
//! │  │                              │ bus │  delivery / contact records  │ │
//! │  └──────────────────────────────┘     └──────────────────────────────┘ │
//! │                                                                         │
//! │  A form field typed alone (`email a@b.c`) still has to be sent with    │
//! │  its sibling field, because the order store takes full records.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod forms;

pub use forms::FormState;
