//! # Domain Types
//!
//! Core domain types shared by the stores, the checkout machine and the
//! network collaborators.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  DeliveryInfo   │   │  OrderSnapshot  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  payment        │   │  delivery       │       │
//! │  │  title          │   │  address        │   │  contact        │       │
//! │  │  category       │   └─────────────────┘   │  total          │       │
//! │  │  price | ∅      │   ┌─────────────────┐   │  items (ids)    │       │
//! │  └─────────────────┘   │  ContactInfo    │   └─────────────────┘       │
//! │                        │  ─────────────  │                              │
//! │  ┌─────────────────┐   │  email          │   ┌─────────────────┐       │
//! │  │   Category      │   │  phone          │   │  OrderResult    │       │
//! │  │  SoftSkill ...  │   └─────────────────┘   │  id, total      │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Field names match the storefront API JSON exactly, so these types are
//! (de)serialized directly by larek-client without DTO copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// Product category. The set is fixed by the storefront API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "софт-скил")]
    SoftSkill,
    #[serde(rename = "хард-скил")]
    HardSkill,
    #[serde(rename = "дополнительное")]
    Additional,
    #[serde(rename = "другое")]
    Other,
    #[serde(rename = "кнопка")]
    Button,
}

impl Category {
    /// All categories, in catalog display order.
    pub const ALL: [Category; 5] = [
        Category::SoftSkill,
        Category::HardSkill,
        Category::Additional,
        Category::Other,
        Category::Button,
    ];

    /// The exact string the API uses.
    pub const fn as_wire_str(&self) -> &'static str {
        match self {
            Category::SoftSkill => "софт-скил",
            Category::HardSkill => "хард-скил",
            Category::Additional => "дополнительное",
            Category::Other => "другое",
            Category::Button => "кнопка",
        }
    }

    /// Short English label for text adapters.
    pub const fn label(&self) -> &'static str {
        match self {
            Category::SoftSkill => "soft-skill",
            Category::HardSkill => "hard-skill",
            Category::Additional => "additional",
            Category::Other => "other",
            Category::Button => "button",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// Immutable once fetched: the catalog replaces the whole list on the next
/// fetch instead of patching products in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier assigned by the API.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Long description shown in the preview.
    #[serde(default)]
    pub description: String,

    /// One of the fixed categories.
    pub category: Category,

    /// Image path relative to the CDN base URL.
    pub image: String,

    /// Price, or `None` for a "priceless" product.
    ///
    /// Priceless products are displayable but cannot be purchased: they never
    /// count toward the cart amount and are never submitted.
    #[serde(default)]
    pub price: Option<Money>,
}

impl Product {
    /// Checks if this product has no price.
    #[inline]
    pub fn is_priceless(&self) -> bool {
        self.price.is_none()
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Online card payment.
    Card,
    /// Cash on delivery.
    Cash,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" | "online" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            _ => Err(ValidationError::NotAllowed {
                field: "payment",
                allowed: vec!["card", "cash"],
            }),
        }
    }
}

// =============================================================================
// Form Records
// =============================================================================

/// Delivery step of the checkout form.
///
/// `payment: None` is the "unset" state: no method button selected yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub payment: Option<PaymentMethod>,
    pub address: String,
}

impl DeliveryInfo {
    pub fn new(payment: Option<PaymentMethod>, address: impl Into<String>) -> Self {
        DeliveryInfo {
            payment,
            address: address.into(),
        }
    }
}

/// Contact step of the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
}

impl ContactInfo {
    pub fn new(email: impl Into<String>, phone: impl Into<String>) -> Self {
        ContactInfo {
            email: email.into(),
            phone: phone.into(),
        }
    }
}

// =============================================================================
// Order Snapshot
// =============================================================================

/// The immutable record sent to the order endpoint.
///
/// Holds copies of the cart amount and priced item ids taken at submit time,
/// so toggling cards while the request is in flight cannot change what was
/// sent.
///
/// Serializes flat, matching the API body:
/// `{ payment, address, email, phone, total, items }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSnapshot {
    #[serde(flatten)]
    pub delivery: DeliveryInfo,

    #[serde(flatten)]
    pub contact: ContactInfo,

    pub total: Money,

    /// Priced product ids, in cart insertion order.
    pub items: Vec<String>,

    /// When the snapshot was taken (local only, not sent).
    #[serde(skip)]
    pub taken_at: DateTime<Utc>,
}

// =============================================================================
// Order Result
// =============================================================================

/// Response of a successful order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    /// Order id assigned by the API.
    pub id: String,
    /// Total actually charged.
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
