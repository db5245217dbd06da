//! # Terminal Commands Module
//!
//! Line commands typed by the shopper, and their translation into bus events.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (parsing, help text)
//! ├── catalog.rs   ◄─── show / toggle: catalog index or id → card:* events
//! └── checkout.rs  ◄─── pay / address / email / phone → form input events
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Terminal Command Flow                                │
//! │                                                                         │
//! │  stdin: "toggle 2"                                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  parse() ──► Command::Toggle(Target::Index(2))                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  catalog::toggle() ──► Event::CardToggle("854cef69-...")                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  bus.publish(event) ──► stores mutate ──► cart:changed ──► View        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never touch a store directly; everything that changes state goes
//! through the bus.

pub mod catalog;
pub mod checkout;

use larek_core::PaymentMethod;

use crate::error::{AppError, AppResult};

/// How a command names a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 1-based position in the rendered catalog.
    Index(usize),
    /// Full product id.
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Catalog,
    Reload,
    Show(Target),
    Toggle(Target),
    Cart,
    Order,
    Pay(PaymentMethod),
    Address(String),
    Next,
    Email(String),
    Phone(String),
    Submit,
    Retry,
    Close,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  catalog            list products
  reload             fetch the catalog again
  show <n|id>        open a product preview
  toggle <n|id>      add to / remove from the cart
  cart               show the cart
  order              start checkout
  pay card|cash      choose a payment method
  address <text>     set the delivery address
  next               continue to contacts
  email <text>       set the e-mail
  phone <text>       set the phone number
  submit             place the order
  retry              back to contacts after a failed order
  close              leave checkout
  help               this text
  quit               exit";

/// Parses one input line.
///
/// Free-text arguments are kept verbatim (not trimmed inside), so
/// `address  Elm St ` keeps its inner spacing.
pub fn parse(line: &str) -> AppResult<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "catalog" | "ls" => Command::Catalog,
        "reload" => Command::Reload,
        "show" => Command::Show(target("show", rest)?),
        "toggle" | "buy" => Command::Toggle(target("toggle", rest)?),
        "cart" | "basket" => Command::Cart,
        "order" | "checkout" => Command::Order,
        "pay" => Command::Pay(
            required("pay", "card|cash", rest)?
                .parse()
                .map_err(|e: larek_core::ValidationError| AppError::InvalidArgument(e.to_string()))?,
        ),
        "address" => Command::Address(rest.to_string()),
        "next" => Command::Next,
        "email" => Command::Email(rest.to_string()),
        "phone" => Command::Phone(rest.to_string()),
        "submit" => Command::Submit,
        "retry" => Command::Retry,
        "close" => Command::Close,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "" => return Err(AppError::EmptyInput),
        other => return Err(AppError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

fn required<'a>(
    command: &'static str,
    expected: &'static str,
    rest: &'a str,
) -> AppResult<&'a str> {
    if rest.is_empty() {
        return Err(AppError::MissingArgument { command, expected });
    }
    Ok(rest)
}

fn target(command: &'static str, rest: &str) -> AppResult<Target> {
    let arg = required(command, "<n|id>", rest)?;
    Ok(match arg.parse::<usize>() {
        Ok(n) => Target::Index(n),
        Err(_) => Target::Id(arg.to_string()),
    })
}
