//! Test fixtures shared by the store and checkout tests.

use crate::money::Money;
use crate::types::{Category, ContactInfo, DeliveryInfo, PaymentMethod, Product};

pub fn product(id: &str, price: Option<i64>) -> Product {
    Product {
        id: id.to_string(),
        title: format!("Product {id}"),
        description: String::new(),
        category: Category::Other,
        image: format!("/{id}.svg"),
        price: price.map(Money::from_units),
    }
}

pub fn delivery() -> DeliveryInfo {
    DeliveryInfo::new(Some(PaymentMethod::Cash), "Elm St")
}

pub fn contact() -> ContactInfo {
    ContactInfo::new("a@b.c", "+7 900 000 00 00")
}
