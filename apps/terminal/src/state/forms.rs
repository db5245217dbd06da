//! Form drafts for the two checkout steps.

use std::cell::RefCell;
use std::rc::Rc;

use larek_core::{
    CheckoutStage, ContactInfo, DeliveryInfo, Event, PaymentMethod, StoreBus, SubscriptionId,
    Topic,
};
use tracing::debug;

/// Field-by-field drafts of the delivery and contact forms.
///
/// The drafts are cleared whenever checkout returns to `idle` or reaches
/// `success`, mirroring the order store. A failed submission keeps them so
/// `retry` shows the same values.
#[derive(Debug, Default)]
pub struct FormState {
    delivery: RefCell<DeliveryInfo>,
    contact: RefCell<ContactInfo>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes the reset rule to `checkout:stage`.
    pub fn attach(self: &Rc<Self>, bus: &StoreBus) -> SubscriptionId {
        let weak = Rc::downgrade(self);
        bus.subscribe(Topic::CheckoutStage, move |event| {
            if let (Some(forms), Event::CheckoutStage(stage)) = (weak.upgrade(), event) {
                if matches!(stage, CheckoutStage::Idle | CheckoutStage::Success) {
                    forms.reset();
                }
            }
            Ok(())
        })
    }

    pub fn set_payment(&self, payment: PaymentMethod) -> DeliveryInfo {
        let mut draft = self.delivery.borrow_mut();
        draft.payment = Some(payment);
        draft.clone()
    }

    pub fn set_address(&self, address: &str) -> DeliveryInfo {
        let mut draft = self.delivery.borrow_mut();
        draft.address = address.to_string();
        draft.clone()
    }

    pub fn set_email(&self, email: &str) -> ContactInfo {
        let mut draft = self.contact.borrow_mut();
        draft.email = email.to_string();
        draft.clone()
    }

    pub fn set_phone(&self, phone: &str) -> ContactInfo {
        let mut draft = self.contact.borrow_mut();
        draft.phone = phone.to_string();
        draft.clone()
    }

    pub fn delivery(&self) -> DeliveryInfo {
        self.delivery.borrow().clone()
    }

    pub fn contact(&self) -> ContactInfo {
        self.contact.borrow().clone()
    }

    pub fn reset(&self) {
        debug!("form drafts cleared");
        self.delivery.replace(DeliveryInfo::default());
        self.contact.replace(ContactInfo::default());
    }
}
