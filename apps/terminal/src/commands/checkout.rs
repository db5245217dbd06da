//! Checkout commands.
//!
//! Step actions map one-to-one onto checkout events. Form fields go through
//! [`FormState`] first, so each event carries the whole record for its step.

use larek_core::{CheckoutStage, Event};

use super::Command;
use crate::state::FormState;

/// The event for a step action (`order`, `next`, `submit`, `retry`, `close`).
pub fn action(command: &Command) -> Option<Event> {
    let event = match command {
        Command::Order => Event::OrderOpen,
        Command::Next => Event::DeliveryAdvance,
        Command::Submit => Event::ContactSubmit,
        Command::Retry => Event::CheckoutRetry,
        Command::Close => Event::CheckoutClose,
        _ => return None,
    };
    Some(event)
}

/// The checkout stage whose form a field command edits.
pub fn form_of(command: &Command) -> Option<CheckoutStage> {
    match command {
        Command::Pay(_) | Command::Address(_) => Some(CheckoutStage::DeliveryEntry),
        Command::Email(_) | Command::Phone(_) => Some(CheckoutStage::ContactEntry),
        _ => None,
    }
}

/// Records a form field in the draft and returns the input event carrying
/// the updated record.
pub fn field(forms: &FormState, command: &Command) -> Option<Event> {
    let event = match command {
        Command::Pay(method) => Event::DeliveryInput(forms.set_payment(*method)),
        Command::Address(address) => Event::DeliveryInput(forms.set_address(address)),
        Command::Email(email) => Event::ContactInput(forms.set_email(email)),
        Command::Phone(phone) => Event::ContactInput(forms.set_phone(phone)),
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use larek_core::{ContactInfo, DeliveryInfo, PaymentMethod};

    use super::*;

    #[test]
    fn test_actions() {
        assert_eq!(action(&Command::Order), Some(Event::OrderOpen));
        assert_eq!(action(&Command::Submit), Some(Event::ContactSubmit));
        assert_eq!(action(&Command::Cart), None);
    }

    #[test]
    fn test_fields_send_whole_records() {
        let forms = FormState::new();

        field(&forms, &Command::Pay(PaymentMethod::Card));
        assert_eq!(
            field(&forms, &Command::Address("Elm St".into())),
            Some(Event::DeliveryInput(DeliveryInfo::new(
                Some(PaymentMethod::Card),
                "Elm St"
            )))
        );
        assert_eq!(
            field(&forms, &Command::Phone("+7 900".into())),
            Some(Event::ContactInput(ContactInfo::new("", "+7 900")))
        );
        assert!(field(&forms, &Command::Next).is_none());
    }

    #[test]
    fn test_form_of() {
        assert_eq!(
            form_of(&Command::Address(String::new())),
            Some(CheckoutStage::DeliveryEntry)
        );
        assert_eq!(
            form_of(&Command::Email(String::new())),
            Some(CheckoutStage::ContactEntry)
        );
        assert_eq!(form_of(&Command::Submit), None);
    }
}
