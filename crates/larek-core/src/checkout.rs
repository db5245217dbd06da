//! # Checkout State Machine
//!
//! Drives the three-step checkout (delivery → contact → submission) and
//! guards every forward transition with the validation gate.
//!
//! ## Stages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Idle ──order:open──► DeliveryEntry ──delivery:advance──► ContactEntry │
//! │    ▲   (amount > 0)     │  ▲ delivery:input   (valid)        │  ▲       │
//! │    │                    │  └──────┘                          │  │       │
//! │    │◄──checkout:close───┘                   contact:input ───┘  │       │
//! │    │◄──checkout:close──────────────────────────────────────────┤       │
//! │    │                                        contact:submit     │       │
//! │    │                                           (valid)         ▼       │
//! │    │                                                      Submitting   │
//! │    │                                    submission:succeeded │  │      │
//! │    │                                                         ▼  │      │
//! │    │◄──checkout:close──────────────────────────────── Success   │      │
//! │    │                                                            │      │
//! │    │                                       submission:failed ───┘      │
//! │    │                                                         ▼         │
//! │    └◄──checkout:close──────────────────────────────────── Failed       │
//! │                                       checkout:retry ──► ContactEntry  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Gating Rule
//! Validity is recomputed from the stored field values on every input event
//! AND again on every advance/submit. No cached "valid" flag is trusted, so a
//! field edited back to invalid after the button lit up still blocks the step.
//!
//! ## Submission
//! Entering `Submitting` publishes `order:submit` with a fresh [`AttemptId`]
//! and an immutable [`OrderSnapshot`](crate::types::OrderSnapshot). Whatever
//! performs the network call answers with `submission:succeeded` or
//! `submission:failed` carrying the same id. Answers for any other attempt
//! (or arriving outside `Submitting`) are ignored.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cart::CartStore;
use crate::error::{CoreError, CoreResult};
use crate::events::{Event, StoreBus, Topic};
use crate::order::OrderStore;
use crate::types::{ContactInfo, DeliveryInfo, OrderResult};
use crate::validation::{
    is_contact_valid, is_delivery_valid, validate_cart_amount, validate_contact,
    validate_delivery,
};

// =============================================================================
// Stage
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckoutStage {
    #[default]
    Idle,
    DeliveryEntry,
    ContactEntry,
    Submitting,
    Success,
    Failed,
}

impl CheckoutStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CheckoutStage::Idle => "idle",
            CheckoutStage::DeliveryEntry => "delivery",
            CheckoutStage::ContactEntry => "contacts",
            CheckoutStage::Submitting => "submitting",
            CheckoutStage::Success => "success",
            CheckoutStage::Failed => "failed",
        }
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Attempt Id
// =============================================================================

/// Identifies one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptId(Uuid);

impl AttemptId {
    pub fn generate() -> Self {
        AttemptId(Uuid::new_v4())
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Checkout
// =============================================================================

pub struct Checkout {
    bus: Rc<StoreBus>,
    cart: Rc<CartStore>,
    order: Rc<OrderStore>,
    stage: Cell<CheckoutStage>,
    attempt: Cell<Option<AttemptId>>,
}

impl Checkout {
    pub fn new(bus: Rc<StoreBus>, cart: Rc<CartStore>, order: Rc<OrderStore>) -> Self {
        Checkout {
            bus,
            cart,
            order,
            stage: Cell::new(CheckoutStage::Idle),
            attempt: Cell::new(None),
        }
    }

    pub fn stage(&self) -> CheckoutStage {
        self.stage.get()
    }

    /// The submission currently awaited, if any.
    pub fn pending_attempt(&self) -> Option<AttemptId> {
        self.attempt.get()
    }

    /// Subscribes the machine to its input topics.
    ///
    /// Handlers hold a weak reference; dropping the last `Rc<Checkout>` turns
    /// them into no-ops.
    pub fn attach(self: &Rc<Self>) {
        self.on_action(Topic::OrderOpen, |c, _| c.open());
        self.on_action(Topic::DeliveryAdvance, |c, _| c.advance());
        self.on_action(Topic::ContactSubmit, |c, _| c.submit().map(|_| ()));
        self.on_action(Topic::CheckoutClose, |c, _| c.close());
        self.on_action(Topic::CheckoutRetry, |c, _| c.retry());

        self.on_input(Topic::DeliveryInput, |c, event| match event {
            Event::DeliveryInput(info) => c.input_delivery(info.clone()).map(|_| ()),
            _ => Ok(()),
        });
        self.on_input(Topic::ContactInput, |c, event| match event {
            Event::ContactInput(info) => c.input_contact(info.clone()).map(|_| ()),
            _ => Ok(()),
        });

        let weak = Rc::downgrade(self);
        self.bus.subscribe(Topic::SubmissionSucceeded, move |event| {
            if let (Some(c), Event::SubmissionSucceeded { attempt, result }) =
                (weak.upgrade(), event)
            {
                c.complete(*attempt, result);
            }
            Ok(())
        });

        let weak = Rc::downgrade(self);
        self.bus.subscribe(Topic::SubmissionFailed, move |event| {
            if let (Some(c), Event::SubmissionFailed { attempt, reason }) =
                (weak.upgrade(), event)
            {
                c.fail(*attempt, reason);
            }
            Ok(())
        });
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// `Idle → DeliveryEntry`, if the cart has a positive amount.
    pub fn open(&self) -> CoreResult<()> {
        self.expect_stage(CheckoutStage::Idle, "open checkout")?;
        validate_cart_amount(self.cart.amount()).map_err(|_| CoreError::EmptyCart)?;

        self.transition(CheckoutStage::DeliveryEntry);
        self.publish_delivery_validity();
        Ok(())
    }

    /// Stores the delivery form and publishes its validity.
    pub fn input_delivery(&self, info: DeliveryInfo) -> CoreResult<bool> {
        self.expect_stage(CheckoutStage::DeliveryEntry, "edit delivery")?;
        self.order.set_delivery(info);
        Ok(self.publish_delivery_validity())
    }

    /// `DeliveryEntry → ContactEntry`, if the stored delivery is valid.
    pub fn advance(&self) -> CoreResult<()> {
        self.expect_stage(CheckoutStage::DeliveryEntry, "advance to contacts")?;
        if let Err(err) = validate_delivery(&self.order.delivery()) {
            self.bus.publish(Event::DeliveryValidity(false));
            return Err(err.into());
        }

        self.transition(CheckoutStage::ContactEntry);
        self.publish_contact_validity();
        Ok(())
    }

    /// Stores the contact form and publishes its validity.
    pub fn input_contact(&self, info: ContactInfo) -> CoreResult<bool> {
        self.expect_stage(CheckoutStage::ContactEntry, "edit contacts")?;
        self.order.set_contact(info);
        Ok(self.publish_contact_validity())
    }

    /// `ContactEntry → Submitting`; publishes `order:submit`.
    ///
    /// Re-checks contact, delivery and cart amount. A second submit while one
    /// is in flight is rejected, not queued.
    pub fn submit(&self) -> CoreResult<AttemptId> {
        if self.stage() == CheckoutStage::Submitting {
            return Err(CoreError::SubmissionInFlight);
        }
        self.expect_stage(CheckoutStage::ContactEntry, "submit order")?;

        if let Err(err) = validate_contact(&self.order.contact()) {
            self.bus.publish(Event::ContactValidity(false));
            return Err(err.into());
        }
        if let Err(err) = validate_delivery(&self.order.delivery()) {
            self.bus.publish(Event::DeliveryValidity(false));
            return Err(err.into());
        }
        let amount = self.cart.amount();
        validate_cart_amount(amount).map_err(|_| CoreError::EmptyCart)?;

        let attempt = AttemptId::generate();
        let snapshot = self.order.snapshot(amount, self.cart.item_ids());
        self.attempt.set(Some(attempt));
        self.transition(CheckoutStage::Submitting);

        info!(
            %attempt,
            total = %snapshot.total,
            items = snapshot.items.len(),
            taken_at = %snapshot.taken_at.to_rfc3339(),
            "order submitted"
        );
        self.bus.publish(Event::OrderSubmit { attempt, snapshot });
        Ok(attempt)
    }

    /// `Failed → ContactEntry` with all fields preserved.
    pub fn retry(&self) -> CoreResult<()> {
        self.expect_stage(CheckoutStage::Failed, "retry")?;
        self.transition(CheckoutStage::ContactEntry);
        self.publish_contact_validity();
        Ok(())
    }

    /// Leaves checkout.
    ///
    /// From a form or `Failed` the order fields are discarded (cart kept).
    /// From `Success` it simply returns to `Idle`. Refused while submitting.
    pub fn close(&self) -> CoreResult<()> {
        match self.stage() {
            CheckoutStage::Idle => Ok(()),
            CheckoutStage::Submitting => Err(CoreError::InvalidTransition {
                stage: CheckoutStage::Submitting,
                action: "close checkout",
            }),
            CheckoutStage::Success => {
                self.transition(CheckoutStage::Idle);
                Ok(())
            }
            CheckoutStage::DeliveryEntry | CheckoutStage::ContactEntry | CheckoutStage::Failed => {
                self.attempt.set(None);
                self.order.reset();
                info!("checkout abandoned");
                self.transition(CheckoutStage::Idle);
                Ok(())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Submission results
    // -------------------------------------------------------------------------

    /// `Submitting → Success`: clears the cart and resets the order.
    pub fn complete(&self, attempt: AttemptId, result: &OrderResult) {
        if !self.is_awaited(attempt) {
            return;
        }

        self.attempt.set(None);
        self.cart.clear();
        self.order.reset();
        info!(%attempt, order_id = %result.id, total = %result.total, "order placed");
        self.transition(CheckoutStage::Success);
        self.bus.publish(Event::OrderSuccess(result.total));
    }

    /// `Submitting → Failed`: fields and cart are kept for a retry.
    pub fn fail(&self, attempt: AttemptId, reason: &str) {
        if !self.is_awaited(attempt) {
            return;
        }

        self.attempt.set(None);
        warn!(%attempt, reason, "order submission failed");
        self.transition(CheckoutStage::Failed);
        self.bus.publish(Event::OrderFailure(reason.to_string()));
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn on_action<F>(self: &Rc<Self>, topic: Topic, action: F)
    where
        F: Fn(&Checkout, &Event) -> CoreResult<()> + 'static,
    {
        let weak = Rc::downgrade(self);
        self.bus.subscribe(topic, move |event| {
            if let Some(checkout) = weak.upgrade() {
                if let Err(err) = action(&checkout, event) {
                    info!(%topic, stage = %checkout.stage(), "checkout action refused: {err}");
                    checkout.bus.publish(Event::CheckoutRefused(err.to_string()));
                }
            }
            Ok(())
        });
    }

    fn on_input<F>(self: &Rc<Self>, topic: Topic, input: F)
    where
        F: Fn(&Checkout, &Event) -> CoreResult<()> + 'static,
    {
        let weak = Rc::downgrade(self);
        self.bus.subscribe(topic, move |event| {
            if let Some(checkout) = weak.upgrade() {
                if let Err(err) = input(&checkout, event) {
                    debug!(%topic, "input ignored: {err}");
                }
            }
            Ok(())
        });
    }

    fn expect_stage(&self, expected: CheckoutStage, action: &'static str) -> CoreResult<()> {
        let stage = self.stage();
        if stage != expected {
            return Err(CoreError::InvalidTransition { stage, action });
        }
        Ok(())
    }

    fn is_awaited(&self, attempt: AttemptId) -> bool {
        let stage = self.stage();
        if stage != CheckoutStage::Submitting || self.attempt.get() != Some(attempt) {
            warn!(%attempt, %stage, "ignoring result of a stale submission");
            return false;
        }
        true
    }

    fn transition(&self, to: CheckoutStage) {
        let from = self.stage.replace(to);
        debug!(%from, %to, "checkout transition");
        self.bus.publish(Event::CheckoutStage(to));
    }

    fn publish_delivery_validity(&self) -> bool {
        let valid = is_delivery_valid(&self.order.delivery());
        self.bus.publish(Event::DeliveryValidity(valid));
        valid
    }

    fn publish_contact_validity(&self) -> bool {
        let valid = is_contact_valid(&self.order.contact());
        self.bus.publish(Event::ContactValidity(valid));
        valid
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::bus::BusEvent;
    use crate::fixtures::{contact, delivery, product};
    use crate::money::Money;
    use crate::types::{OrderSnapshot, PaymentMethod};

    struct Harness {
        bus: Rc<StoreBus>,
        cart: Rc<CartStore>,
        order: Rc<OrderStore>,
        checkout: Rc<Checkout>,
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl Harness {
        fn new() -> Self {
            let bus = Rc::new(StoreBus::new());
            let cart = Rc::new(CartStore::new(Rc::clone(&bus)));
            let order = Rc::new(OrderStore::new());
            let checkout = Rc::new(Checkout::new(
                Rc::clone(&bus),
                Rc::clone(&cart),
                Rc::clone(&order),
            ));
            checkout.attach();

            let events: Rc<RefCell<Vec<Event>>> = Rc::default();
            let log = Rc::clone(&events);
            bus.subscribe_all(move |event| {
                log.borrow_mut().push(event.clone());
                Ok(())
            });

            Harness {
                bus,
                cart,
                order,
                checkout,
                events,
            }
        }

        fn send(&self, event: Event) {
            self.events.borrow_mut().clear();
            self.bus.publish(event);
        }

        fn saw(&self, topic: Topic) -> Vec<Event> {
            self.events
                .borrow()
                .iter()
                .filter(|e| e.topic() == topic)
                .cloned()
                .collect()
        }

        fn last_submit(&self) -> Option<(AttemptId, OrderSnapshot)> {
            self.saw(Topic::OrderSubmit).into_iter().find_map(|e| match e {
                Event::OrderSubmit { attempt, snapshot } => Some((attempt, snapshot)),
                _ => None,
            })
        }

        /// Cart {A: 100, B: priceless} driven up to ContactEntry with valid contact.
        fn ready_to_submit(&self) {
            self.cart.toggle(&product("A", Some(100)));
            self.cart.toggle(&product("B", None));
            self.send(Event::OrderOpen);
            self.send(Event::DeliveryInput(delivery()));
            self.send(Event::DeliveryAdvance);
            self.send(Event::ContactInput(contact()));
            assert_eq!(self.checkout.stage(), CheckoutStage::ContactEntry);
        }
    }

    #[test]
    fn test_open_requires_positive_amount() {
        let h = Harness::new();

        h.send(Event::OrderOpen);
        assert_eq!(h.checkout.stage(), CheckoutStage::Idle);
        assert_eq!(h.saw(Topic::CheckoutRefused).len(), 1);

        h.cart.toggle(&product("free", None));
        h.send(Event::OrderOpen);
        assert_eq!(h.checkout.stage(), CheckoutStage::Idle);

        h.cart.toggle(&product("A", Some(100)));
        h.send(Event::OrderOpen);
        assert_eq!(h.checkout.stage(), CheckoutStage::DeliveryEntry);
        assert_eq!(
            h.saw(Topic::CheckoutStage),
            vec![Event::CheckoutStage(CheckoutStage::DeliveryEntry)]
        );
        assert_eq!(h.saw(Topic::DeliveryValidity), vec![Event::DeliveryValidity(false)]);
    }

    #[test]
    fn test_delivery_gate_example() {
        let h = Harness::new();
        h.cart.toggle(&product("A", Some(100)));
        h.cart.toggle(&product("B", None));
        assert_eq!(h.cart.amount(), Money::from_units(100));
        assert_eq!(h.cart.count(), 2);
        assert_eq!(h.cart.item_ids(), vec!["A"]);

        h.send(Event::OrderOpen);
        h.send(Event::DeliveryInput(DeliveryInfo::new(Some(PaymentMethod::Cash), "")));
        assert_eq!(h.saw(Topic::DeliveryValidity), vec![Event::DeliveryValidity(false)]);

        h.send(Event::DeliveryAdvance);
        assert_eq!(h.checkout.stage(), CheckoutStage::DeliveryEntry);
        assert_eq!(h.saw(Topic::DeliveryValidity), vec![Event::DeliveryValidity(false)]);
        assert_eq!(h.saw(Topic::CheckoutRefused).len(), 1);

        h.send(Event::DeliveryInput(delivery()));
        assert_eq!(h.saw(Topic::DeliveryValidity), vec![Event::DeliveryValidity(true)]);

        h.send(Event::DeliveryAdvance);
        assert_eq!(h.checkout.stage(), CheckoutStage::ContactEntry);
        assert_eq!(h.saw(Topic::ContactValidity), vec![Event::ContactValidity(false)]);
    }

    #[test]
    fn test_field_edited_back_to_invalid_blocks_advance() {
        let h = Harness::new();
        h.cart.toggle(&product("A", Some(100)));
        h.send(Event::OrderOpen);
        h.send(Event::DeliveryInput(delivery()));
        h.send(Event::DeliveryInput(DeliveryInfo::new(None, "Elm St")));

        h.send(Event::DeliveryAdvance);
        assert_eq!(h.checkout.stage(), CheckoutStage::DeliveryEntry);
    }

    #[test]
    fn test_submit_publishes_snapshot() {
        let h = Harness::new();
        h.ready_to_submit();

        h.send(Event::ContactSubmit);
        assert_eq!(h.checkout.stage(), CheckoutStage::Submitting);

        let (attempt, snapshot) = h.last_submit().unwrap();
        assert_eq!(h.checkout.pending_attempt(), Some(attempt));
        assert_eq!(snapshot.total, Money::from_units(100));
        assert_eq!(snapshot.items, vec!["A"]);
        assert_eq!(snapshot.delivery, delivery());
        assert_eq!(snapshot.contact, contact());
    }

    #[test]
    fn test_invalid_contact_blocks_submit() {
        let h = Harness::new();
        h.ready_to_submit();
        h.send(Event::ContactInput(ContactInfo::new("a@b.c", "")));

        h.send(Event::ContactSubmit);
        assert_eq!(h.checkout.stage(), CheckoutStage::ContactEntry);
        assert_eq!(h.saw(Topic::ContactValidity), vec![Event::ContactValidity(false)]);
        assert!(h.last_submit().is_none());
    }

    #[test]
    fn test_no_direct_path_from_delivery_to_submitting() {
        let h = Harness::new();
        h.cart.toggle(&product("A", Some(100)));
        h.send(Event::OrderOpen);
        h.send(Event::DeliveryInput(delivery()));
        // Contact input is ignored outside ContactEntry.
        h.send(Event::ContactInput(contact()));
        h.send(Event::ContactSubmit);

        assert_eq!(h.checkout.stage(), CheckoutStage::DeliveryEntry);
        assert_eq!(h.order.contact(), ContactInfo::default());
        assert!(h.last_submit().is_none());
    }

    #[test]
    fn test_cart_emptied_during_contacts_blocks_submit() {
        let h = Harness::new();
        h.ready_to_submit();
        h.cart.toggle(&product("A", Some(100)));

        let err = h.checkout.submit().unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
        assert_eq!(h.checkout.stage(), CheckoutStage::ContactEntry);
    }

    #[test]
    fn test_second_submit_is_rejected() {
        let h = Harness::new();
        h.ready_to_submit();
        let first = h.checkout.submit().unwrap();

        assert!(matches!(h.checkout.submit(), Err(CoreError::SubmissionInFlight)));
        h.send(Event::ContactSubmit);
        assert!(h.last_submit().is_none());
        assert_eq!(h.checkout.pending_attempt(), Some(first));
    }

    #[test]
    fn test_success_clears_cart_and_order() {
        let h = Harness::new();
        h.ready_to_submit();
        let attempt = h.checkout.submit().unwrap();

        h.send(Event::SubmissionSucceeded {
            attempt,
            result: OrderResult {
                id: "order-1".into(),
                total: Money::from_units(100),
            },
        });

        assert_eq!(h.checkout.stage(), CheckoutStage::Success);
        assert_eq!(h.cart.count(), 0);
        assert!(h.cart.amount().is_zero());
        assert_eq!(h.order.delivery(), DeliveryInfo::default());
        assert_eq!(h.order.contact(), ContactInfo::default());
        assert_eq!(h.saw(Topic::OrderSuccess), vec![Event::OrderSuccess(Money::from_units(100))]);

        h.send(Event::CheckoutClose);
        assert_eq!(h.checkout.stage(), CheckoutStage::Idle);
    }

    #[test]
    fn test_failure_preserves_fields_and_allows_retry() {
        let h = Harness::new();
        h.ready_to_submit();
        let before = (h.order.delivery(), h.order.contact());
        let attempt = h.checkout.submit().unwrap();

        h.send(Event::SubmissionFailed {
            attempt,
            reason: "Неверная сумма заказа".into(),
        });

        assert_eq!(h.checkout.stage(), CheckoutStage::Failed);
        assert_eq!((h.order.delivery(), h.order.contact()), before);
        assert_eq!(h.cart.count(), 2);
        assert_eq!(
            h.saw(Topic::OrderFailure),
            vec![Event::OrderFailure("Неверная сумма заказа".into())]
        );

        h.send(Event::CheckoutRetry);
        assert_eq!(h.checkout.stage(), CheckoutStage::ContactEntry);
        assert_eq!(h.saw(Topic::ContactValidity), vec![Event::ContactValidity(true)]);

        let retried = h.checkout.submit().unwrap();
        assert_ne!(retried, attempt);
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let h = Harness::new();
        h.ready_to_submit();
        let attempt = h.checkout.submit().unwrap();

        h.send(Event::SubmissionSucceeded {
            attempt: AttemptId::generate(),
            result: OrderResult {
                id: "other".into(),
                total: Money::from_units(1),
            },
        });
        assert_eq!(h.checkout.stage(), CheckoutStage::Submitting);

        h.send(Event::SubmissionFailed {
            attempt,
            reason: "timeout".into(),
        });
        assert_eq!(h.checkout.stage(), CheckoutStage::Failed);

        // Late success for the already-failed attempt changes nothing.
        h.send(Event::SubmissionSucceeded {
            attempt,
            result: OrderResult {
                id: "late".into(),
                total: Money::from_units(100),
            },
        });
        assert_eq!(h.checkout.stage(), CheckoutStage::Failed);
        assert_eq!(h.cart.count(), 2);
    }

    #[test]
    fn test_close_semantics() {
        let h = Harness::new();
        h.ready_to_submit();

        h.send(Event::CheckoutClose);
        assert_eq!(h.checkout.stage(), CheckoutStage::Idle);
        assert_eq!(h.order.delivery(), DeliveryInfo::default());
        assert_eq!(h.cart.count(), 2);

        h.send(Event::OrderOpen);
        h.send(Event::DeliveryInput(delivery()));
        h.send(Event::DeliveryAdvance);
        h.send(Event::ContactInput(contact()));
        h.checkout.submit().unwrap();

        h.send(Event::CheckoutClose);
        assert_eq!(h.checkout.stage(), CheckoutStage::Submitting);
        assert_eq!(h.saw(Topic::CheckoutRefused).len(), 1);
    }

    #[test]
    fn test_close_after_failure_resets_order_keeps_cart() {
        let h = Harness::new();
        h.ready_to_submit();
        let attempt = h.checkout.submit().unwrap();
        h.send(Event::SubmissionFailed {
            attempt,
            reason: "timeout".into(),
        });
        assert_eq!(h.checkout.stage(), CheckoutStage::Failed);

        h.send(Event::CheckoutClose);

        assert_eq!(h.checkout.stage(), CheckoutStage::Idle);
        assert_eq!(h.checkout.pending_attempt(), None);
        assert_eq!(h.order.delivery(), DeliveryInfo::default());
        assert_eq!(h.order.contact(), ContactInfo::default());
        assert_eq!(h.cart.count(), 2);
        assert_eq!(h.cart.item_ids(), vec!["A"]);
        assert!(h.saw(Topic::CheckoutRefused).is_empty());

        // Late result for the abandoned attempt changes nothing.
        h.send(Event::SubmissionSucceeded {
            attempt,
            result: OrderResult {
                id: "late".into(),
                total: Money::from_units(100),
            },
        });
        assert_eq!(h.checkout.stage(), CheckoutStage::Idle);
        assert_eq!(h.cart.count(), 2);
    }

    #[test]
    fn test_open_refused_while_submitting_or_after_success() {
        let h = Harness::new();
        h.ready_to_submit();
        let attempt = h.checkout.submit().unwrap();

        h.send(Event::OrderOpen);
        assert_eq!(h.checkout.stage(), CheckoutStage::Submitting);
        assert_eq!(h.checkout.pending_attempt(), Some(attempt));
        assert_eq!(h.saw(Topic::CheckoutRefused).len(), 1);
        assert!(h.saw(Topic::CheckoutStage).is_empty());
        assert!(matches!(
            h.checkout.open(),
            Err(CoreError::InvalidTransition {
                stage: CheckoutStage::Submitting,
                ..
            })
        ));

        h.send(Event::SubmissionSucceeded {
            attempt,
            result: OrderResult {
                id: "order-1".into(),
                total: Money::from_units(100),
            },
        });
        assert_eq!(h.checkout.stage(), CheckoutStage::Success);

        // A fresh purchasable cart still cannot reopen until `close`.
        h.cart.toggle(&product("C", Some(5)));
        h.send(Event::OrderOpen);
        assert_eq!(h.checkout.stage(), CheckoutStage::Success);
        assert_eq!(h.saw(Topic::CheckoutRefused).len(), 1);
        assert!(matches!(
            h.checkout.open(),
            Err(CoreError::InvalidTransition {
                stage: CheckoutStage::Success,
                ..
            })
        ));

        h.send(Event::CheckoutClose);
        h.send(Event::OrderOpen);
        assert_eq!(h.checkout.stage(), CheckoutStage::DeliveryEntry);
    }

    #[test]
    fn test_stage_notifications() {
        let h = Harness::new();
        h.ready_to_submit();
        h.send(Event::ContactSubmit);
        assert_eq!(
            h.saw(Topic::CheckoutStage),
            vec![Event::CheckoutStage(CheckoutStage::Submitting)]
        );
    }

    #[test]
    fn test_refusal_message() {
        let h = Harness::new();
        h.send(Event::CheckoutRetry);
        assert_eq!(
            h.saw(Topic::CheckoutRefused),
            vec![Event::CheckoutRefused("Checkout is idle, cannot retry".into())]
        );
    }
}
