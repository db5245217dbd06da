//! # larek-client: Network Collaborators for the Larek Storefront
//!
//! This crate connects the I/O-free core to the storefront API: it fetches the
//! catalog, performs order submissions and loads the client configuration.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  Session<A: StoreApi>                            │  │
//! │  │                                                                  │  │
//! │  │  Owns the Storefront (bus + stores + checkout)                   │  │
//! │  │  Runs on a current-thread runtime inside a LocalSet              │  │
//! │  └──────────────┬────────────────────────────────┬──────────────────┘  │
//! │                 │ load_catalog()                 │ order:submit        │
//! │                 ▼                                ▼                      │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │                    HttpStoreApi (reqwest)                      │    │
//! │  │   GET {base}/product/                POST {base}/order/        │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! │                                                                         │
//! │  ClientConfig: TOML file + LAREK_* env overrides                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`api`] - `StoreApi` seam and its HTTP implementation
//! - [`config`] - Client configuration (URLs, timeout, display, logging)
//! - [`error`] - Client error types
//! - [`session`] - Catalog loading and the submission driver
//!
//! ## Usage
//!
//! ```rust,no_run
//! use larek_client::{ClientConfig, HttpStoreApi, Session};
//! use larek_core::Storefront;
//!
//! # async fn run() -> larek_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let session = Session::new(Storefront::new(), HttpStoreApi::from_config(&config)?);
//! session.attach_submitter();
//!
//! tokio::task::LocalSet::new()
//!     .run_until(async {
//!         session.load_catalog().await?;
//!         Ok(())
//!     })
//!     .await
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod error;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{image_url, HttpStoreApi, ProductPage, StoreApi};
pub use config::{ApiSettings, ClientConfig, DisplaySettings, LogSettings};
pub use error::{ClientError, ClientResult};
pub use session::Session;
