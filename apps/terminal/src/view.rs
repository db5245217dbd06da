//! # Terminal View
//!
//! Renders storefront output events as text.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        View Subscriptions                               │
//! │                                                                         │
//! │  catalog:changed ──────► numbered product list                          │
//! │  catalog:failed ───────► "Could not load the catalog: ..."              │
//! │  preview:changed ──────► product card with image URL and buy state      │
//! │  cart:changed ─────────► one-line cart summary                          │
//! │  checkout:stage ───────► prompt for the step just entered               │
//! │  delivery/contact:validity ► form hint                                  │
//! │  checkout:refused ─────► "Refused: ..."                                 │
//! │  order:success/failure ► outcome line                                   │
//! │  dispatch failures ────► "Error: ..."                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The view only reads stores. Write errors inside a handler become handler
//! errors, which the bus logs and counts.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::{Rc, Weak};

use larek_client::{image_url, DisplaySettings};
use larek_core::cart::CartStore;
use larek_core::catalog::CatalogStore;
use larek_core::{CheckoutStage, Event, HandlerResult, Product, Storefront, StoreBus, Topic};
use url::Url;

pub struct View {
    catalog: Rc<CatalogStore>,
    cart: Rc<CartStore>,
    display: DisplaySettings,
    cdn_url: Url,
    out: RefCell<Box<dyn Write>>,
}

impl View {
    pub fn new(
        storefront: &Storefront,
        display: DisplaySettings,
        cdn_url: Url,
        out: Box<dyn Write>,
    ) -> Self {
        View {
            catalog: Rc::clone(&storefront.catalog),
            cart: Rc::clone(&storefront.cart),
            display,
            cdn_url,
            out: RefCell::new(out),
        }
    }

    /// Subscribes the renderers to the output topics.
    pub fn attach(self: &Rc<Self>, bus: &StoreBus) {
        self.on(bus, Topic::CatalogChanged, |v, _| v.render_catalog());
        self.on(bus, Topic::PreviewChanged, |v, _| v.render_preview());
        self.on(bus, Topic::CartChanged, |v, _| v.render_cart_summary());
        self.on(bus, Topic::CatalogFailed, |v, event| match event {
            Event::CatalogFailed(reason) => v.line(&format!("Could not load the catalog: {reason}")),
            _ => Ok(()),
        });
        self.on(bus, Topic::CheckoutStage, |v, event| match event {
            Event::CheckoutStage(stage) => v.render_stage(*stage),
            _ => Ok(()),
        });
        self.on(bus, Topic::DeliveryValidity, |v, event| match event {
            Event::DeliveryValidity(true) => v.line("Delivery details complete. `next` to continue."),
            Event::DeliveryValidity(false) => {
                v.line("Choose a payment method and enter an address.")
            }
            _ => Ok(()),
        });
        self.on(bus, Topic::ContactValidity, |v, event| match event {
            Event::ContactValidity(true) => v.line("Contacts complete. `submit` to place the order."),
            Event::ContactValidity(false) => v.line("Enter an e-mail and a phone number."),
            _ => Ok(()),
        });
        self.on(bus, Topic::CheckoutRefused, |v, event| match event {
            Event::CheckoutRefused(reason) => v.line(&format!("Refused: {reason}")),
            _ => Ok(()),
        });
        self.on(bus, Topic::OrderSuccess, |v, event| match event {
            Event::OrderSuccess(total) => v.line(&format!(
                "Order placed. Charged {}. `close` to return to the catalog.",
                v.display.format_money(*total)
            )),
            _ => Ok(()),
        });
        self.on(bus, Topic::OrderFailure, |v, event| match event {
            Event::OrderFailure(reason) => v.line(&format!(
                "Order failed: {reason}. `retry` to edit contacts or `close` to cancel."
            )),
            _ => Ok(()),
        });

        let weak = Rc::downgrade(self);
        bus.on_failure(move |failure| {
            if let Some(view) = weak.upgrade() {
                // Nothing left to report a failed write to.
                let _ = view.line(&format!("Error: {}", failure.message));
            }
        });
    }

    fn on<F>(self: &Rc<Self>, bus: &StoreBus, topic: Topic, render: F)
    where
        F: Fn(&View, &Event) -> io::Result<()> + 'static,
    {
        let weak: Weak<View> = Rc::downgrade(self);
        bus.subscribe(topic, move |event| -> HandlerResult {
            if let Some(view) = weak.upgrade() {
                render(&view, event)?;
            }
            Ok(())
        });
    }

    // =========================================================================
    // Renderers
    // =========================================================================

    pub fn line(&self, text: &str) -> io::Result<()> {
        let mut out = self.out.borrow_mut();
        writeln!(out, "{text}")?;
        out.flush()
    }

    pub fn render_catalog(&self) -> io::Result<()> {
        let products = self.catalog.products();
        let mut out = self.out.borrow_mut();
        if products.is_empty() {
            writeln!(out, "The catalog is empty.")?;
            return out.flush();
        }
        for (i, product) in products.iter().enumerate() {
            let mark = if self.cart.contains(&product.id) { '*' } else { ' ' };
            writeln!(
                out,
                "{mark}{:>3}. {} [{}] {}",
                i + 1,
                product.title,
                product.category,
                self.display.format_price(product.price)
            )?;
        }
        out.flush()
    }

    pub fn render_preview(&self) -> io::Result<()> {
        let Some(product) = self.catalog.preview() else {
            return Ok(());
        };
        let image = image_url(&self.cdn_url, &product)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| product.image.clone());

        let mut out = self.out.borrow_mut();
        writeln!(out, "── {} ──", product.title)?;
        writeln!(out, "Category: {}", product.category)?;
        writeln!(out, "Price:    {}", self.display.format_price(product.price))?;
        writeln!(out, "Image:    {image}")?;
        if !product.description.is_empty() {
            writeln!(out, "{}", product.description)?;
        }
        writeln!(out, "{}", self.purchase_hint(&product))?;
        out.flush()
    }

    fn purchase_hint(&self, product: &Product) -> &'static str {
        if product.is_priceless() {
            "Not for sale."
        } else if self.cart.contains(&product.id) {
            "In the cart. `toggle` to remove."
        } else {
            "`toggle` to add to the cart."
        }
    }

    pub fn render_cart_summary(&self) -> io::Result<()> {
        self.line(&format!(
            "Cart: {} item(s), {}",
            self.cart.count(),
            self.display.format_money(self.cart.amount())
        ))
    }

    pub fn render_cart(&self) -> io::Result<()> {
        let items = self.cart.items();
        let mut out = self.out.borrow_mut();
        if items.is_empty() {
            writeln!(out, "The cart is empty.")?;
            return out.flush();
        }
        for (i, product) in items.iter().enumerate() {
            writeln!(
                out,
                "{:>3}. {} {}",
                i + 1,
                product.title,
                self.display.format_price(product.price)
            )?;
        }
        writeln!(out, "Total: {}", self.display.format_money(self.cart.amount()))?;
        out.flush()
    }

    pub fn render_stage(&self, stage: CheckoutStage) -> io::Result<()> {
        let prompt = match stage {
            CheckoutStage::Idle => "Back to the catalog.",
            CheckoutStage::DeliveryEntry => {
                "Delivery: `pay card|cash` and `address <text>`, then `next`."
            }
            CheckoutStage::ContactEntry => {
                "Contacts: `email <text>` and `phone <text>`, then `submit`."
            }
            CheckoutStage::Submitting => "Placing the order...",
            // The outcome line follows.
            CheckoutStage::Success | CheckoutStage::Failed => return Ok(()),
        };
        self.line(prompt)
    }
}
