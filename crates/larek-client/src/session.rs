//! # Session
//!
//! Binds a [`Storefront`] to a [`StoreApi`]: loads the catalog and carries
//! out submissions requested by the checkout machine.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Architecture                             │
//! │                                                                         │
//! │  Checkout ──order:submit(attempt, snapshot)──► submitter handler       │
//! │                                                     │                   │
//! │                                          spawn_local(task)             │
//! │                                                     │ (handler returns │
//! │                                                     │  immediately)    │
//! │                                                     ▼                   │
//! │                                       api.submit_order(&snapshot)      │
//! │                                                     │                   │
//! │           ┌─────────────────────────────────────────┴───────┐          │
//! │           ▼ Ok(result)                                      ▼ Err(e)   │
//! │  submission:succeeded(attempt, result)   submission:failed(attempt, e) │
//! │           │                                                 │          │
//! │           └─────────────────► Checkout ◄────────────────────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Runtime Requirement
//! Everything here runs on one thread. Submissions are spawned with
//! `tokio::task::spawn_local`, so the session must be driven from inside a
//! `tokio::task::LocalSet`.
//!
//! A submission counts as in flight until its result has been published, so
//! [`Session::wait_idle`] returns only after the checkout has seen it.

use std::cell::Cell;
use std::rc::Rc;

use larek_core::{Event, Storefront, SubscriptionId, Topic};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::api::StoreApi;
use crate::error::ClientResult;

pub struct Session<A> {
    storefront: Storefront,
    api: Rc<A>,
    in_flight: Rc<Cell<usize>>,
    idle: Rc<Notify>,
}

impl<A: StoreApi + 'static> Session<A> {
    pub fn new(storefront: Storefront, api: A) -> Self {
        Session {
            storefront,
            api: Rc::new(api),
            in_flight: Rc::new(Cell::new(0)),
            idle: Rc::new(Notify::new()),
        }
    }

    pub fn storefront(&self) -> &Storefront {
        &self.storefront
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Number of submissions whose response has not arrived yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Resolves once no submission is in flight.
    pub async fn wait_idle(&self) {
        loop {
            // Registered before the check so a wake-up in between is not lost.
            let notified = self.idle.notified();
            if self.in_flight.get() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Fetches the catalog and replaces the Catalog Store contents.
    ///
    /// On failure the catalog is left as it was, `catalog:failed` is
    /// published and the error is returned. No retry is attempted.
    pub async fn load_catalog(&self) -> ClientResult<usize> {
        match self.api.fetch_products().await {
            Ok(products) => {
                let count = products.len();
                self.storefront.catalog.set_products(products);
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "catalog fetch failed");
                self.storefront.bus.publish(Event::CatalogFailed(err.reason()));
                Err(err)
            }
        }
    }

    /// Subscribes the submission driver to `order:submit`.
    ///
    /// Call once; each call adds another driver.
    pub fn attach_submitter(&self) -> SubscriptionId {
        let api = Rc::clone(&self.api);
        let bus = Rc::downgrade(&self.storefront.bus);
        let in_flight = Rc::clone(&self.in_flight);
        let idle = Rc::clone(&self.idle);

        self.storefront.bus.subscribe(Topic::OrderSubmit, move |event| {
            let Event::OrderSubmit { attempt, snapshot } = event else {
                return Ok(());
            };

            let api = Rc::clone(&api);
            let bus = bus.clone();
            let in_flight = Rc::clone(&in_flight);
            let idle = Rc::clone(&idle);
            let attempt = *attempt;
            let snapshot = snapshot.clone();

            in_flight.set(in_flight.get() + 1);
            debug!(%attempt, "spawning order submission");

            tokio::task::spawn_local(async move {
                let outcome = api.submit_order(&snapshot).await;

                match (bus.upgrade(), outcome) {
                    (None, _) => {
                        debug!(%attempt, "storefront dropped before submission finished");
                    }
                    (Some(bus), Ok(result)) => {
                        info!(%attempt, order_id = %result.id, "submission succeeded");
                        bus.publish(Event::SubmissionSucceeded { attempt, result });
                    }
                    (Some(bus), Err(err)) => {
                        warn!(%attempt, error = %err, "submission failed");
                        bus.publish(Event::SubmissionFailed {
                            attempt,
                            reason: err.reason(),
                        });
                    }
                }

                let remaining = in_flight.get().saturating_sub(1);
                in_flight.set(remaining);
                if remaining == 0 {
                    idle.notify_waiters();
                }
            });
            Ok(())
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
