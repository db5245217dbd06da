//! # Event Bus
//!
//! Synchronous, single-threaded publish/subscribe channel. Every other
//! component talks to the rest of the storefront only through it.
//!
//! ## Dispatch Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         publish(event)                                  │
//! │                                                                         │
//! │  1. topic = event.topic()                                               │
//! │  2. snapshot = [handlers subscribed to topic or to All], in             │
//! │     subscription order (borrow released before any call)               │
//! │  3. for each handler in snapshot:                                       │
//! │        ├── Ok(())        → next                                         │
//! │        ├── Err(e)        → DispatchFailure ──► failure sinks + log     │
//! │        └── panic         → DispatchFailure ──► failure sinks + log     │
//! │  4. return DispatchReport                                               │
//! │                                                                         │
//! │  Handlers may publish again (re-entrant) and may (un)subscribe.         │
//! │  Changes made during a dispatch apply to the NEXT publish only.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why `Rc` and not `Arc`?
//! The core is single-threaded by construction: all mutation happens on the
//! thread that dispatches. `EventBus` is deliberately `!Send`; async work
//! runs on a `LocalSet` and publishes its results back on the same thread.
//!
//! ## Usage
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use larek_core::bus::EventBus;
//! use larek_core::events::{Event, Topic};
//!
//! let bus = EventBus::<Event>::new();
//! let seen = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&seen);
//! bus.subscribe(Topic::CartChanged, move |_| {
//!     counter.set(counter.get() + 1);
//!     Ok(())
//! });
//!
//! bus.publish(Event::CartChanged);
//! assert_eq!(seen.get(), 1);
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use thiserror::Error;
use tracing::{error, trace};

// =============================================================================
// Event Contract
// =============================================================================

/// An event that can travel on an [`EventBus`].
///
/// The topic is derived from the event itself, so a publish can never pair a
/// topic with the wrong payload shape.
pub trait BusEvent: fmt::Debug + 'static {
    type Topic: Copy + Eq + Hash + fmt::Debug + fmt::Display + 'static;

    fn topic(&self) -> Self::Topic;
}

/// Error returned by a failing handler.
pub type HandlerError = Box<dyn std::error::Error + 'static>;

/// What every handler returns.
pub type HandlerResult = Result<(), HandlerError>;

type Handler<E> = Rc<dyn Fn(&E) -> HandlerResult>;
type FailureSink = Rc<dyn Fn(&DispatchFailure)>;

// =============================================================================
// Subscription Handle
// =============================================================================

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter<T> {
    Topic(T),
    All,
}

struct Subscriber<E: BusEvent> {
    id: SubscriptionId,
    filter: Filter<E::Topic>,
    handler: Handler<E>,
}

impl<E: BusEvent> Subscriber<E> {
    fn matches(&self, topic: E::Topic) -> bool {
        match self.filter {
            Filter::Topic(t) => t == topic,
            Filter::All => true,
        }
    }
}

// =============================================================================
// Dispatch Failure
// =============================================================================

/// A handler failed while an event was being dispatched.
///
/// Dispatch continues to the remaining handlers; this record goes to the
/// observability channel (tracing + failure sinks).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("subscriber {subscription} failed on {topic}: {message}")]
pub struct DispatchFailure {
    /// Topic being dispatched, as displayed.
    pub topic: String,
    /// The failing subscription.
    pub subscription: SubscriptionId,
    /// Error or panic message.
    pub message: String,
    /// True if the handler panicked rather than returning an error.
    pub panicked: bool,
}

/// Outcome of a single `publish`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers invoked (including failing ones).
    pub delivered: usize,
    /// Handlers that returned an error or panicked.
    pub failed: usize,
}

// =============================================================================
// Event Bus
// =============================================================================

/// The storefront event bus.
pub struct EventBus<E: BusEvent> {
    subscribers: RefCell<Vec<Subscriber<E>>>,
    failure_sinks: RefCell<Vec<FailureSink>>,
    next_id: Cell<u64>,
    depth: Cell<usize>,
    failures: Cell<u64>,
}

impl<E: BusEvent> EventBus<E> {
    pub fn new() -> Self {
        EventBus {
            subscribers: RefCell::new(Vec::new()),
            failure_sinks: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            depth: Cell::new(0),
            failures: Cell::new(0),
        }
    }

    /// Subscribes `handler` to one topic.
    pub fn subscribe<F>(&self, topic: E::Topic, handler: F) -> SubscriptionId
    where
        F: Fn(&E) -> HandlerResult + 'static,
    {
        self.insert(Filter::Topic(topic), Rc::new(handler))
    }

    /// Subscribes `handler` to every topic. Intended for diagnostics.
    pub fn subscribe_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) -> HandlerResult + 'static,
    {
        self.insert(Filter::All, Rc::new(handler))
    }

    /// Removes a subscription. Returns false if it was already gone.
    ///
    /// Safe to call from inside a handler; an in-progress dispatch still
    /// reaches the removed handler because it iterates its own snapshot.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        before != subscribers.len()
    }

    /// Registers a sink for dispatch failures.
    pub fn on_failure<F>(&self, sink: F)
    where
        F: Fn(&DispatchFailure) + 'static,
    {
        self.failure_sinks.borrow_mut().push(Rc::new(sink));
    }

    /// Publishes `event` to every current subscriber of its topic.
    pub fn publish(&self, event: E) -> DispatchReport {
        let topic = event.topic();

        let snapshot: Vec<(SubscriptionId, Handler<E>)> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.matches(topic))
            .map(|s| (s.id, Rc::clone(&s.handler)))
            .collect();

        let depth = self.depth.get();
        self.depth.set(depth + 1);
        trace!(%topic, subscribers = snapshot.len(), depth, "dispatching");

        let mut report = DispatchReport::default();
        for (id, handler) in snapshot {
            report.delivered += 1;

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(&event)));
            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some((err.to_string(), false)),
                Err(payload) => Some((panic_message(payload.as_ref()), true)),
            };

            if let Some((message, panicked)) = failure {
                report.failed += 1;
                self.report_failure(DispatchFailure {
                    topic: topic.to_string(),
                    subscription: id,
                    message,
                    panicked,
                });
            }
        }

        self.depth.set(depth);
        report
    }

    /// Number of subscribers that would receive an event on `topic`.
    pub fn subscriber_count(&self, topic: E::Topic) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|s| s.matches(topic))
            .count()
    }

    /// Total dispatch failures since construction.
    pub fn failure_count(&self) -> u64 {
        self.failures.get()
    }

    fn insert(&self, filter: Filter<E::Topic>, handler: Handler<E>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.subscribers.borrow_mut().push(Subscriber {
            id,
            filter,
            handler,
        });
        id
    }

    fn report_failure(&self, failure: DispatchFailure) {
        self.failures.set(self.failures.get() + 1);
        error!(
            topic = %failure.topic,
            subscription = %failure.subscription,
            panicked = failure.panicked,
            "event handler failed: {}",
            failure.message
        );

        let sinks: Vec<FailureSink> = self.failure_sinks.borrow().iter().cloned().collect();
        for sink in sinks {
            sink(&failure);
        }
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.borrow().len())
            .field("failures", &self.failures.get())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
