//! # Terminal App
//!
//! Ties a [`Session`] to the line-command interface.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Command Loop                                     │
//! │                                                                         │
//! │  stdin line ──► parse() ──► execute()                                   │
//! │                               │                                         │
//! │             ┌─────────────────┼──────────────────────┐                  │
//! │             ▼                 ▼                      ▼                  │
//! │      local rendering    bus.publish(event)     session.load_catalog()   │
//! │      (catalog, cart,          │                                         │
//! │       help)                   ▼                                         │
//! │                         stores / checkout ──► output events ──► View    │
//! │                                                                         │
//! │  Input errors are printed and the loop goes on. EOF or `quit` ends it, │
//! │  after any in-flight order submission has settled.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;
use std::rc::Rc;

use larek_client::{DisplaySettings, Session, StoreApi};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};
use url::Url;

use crate::commands::{self, checkout, Command, HELP};
use crate::error::{AppError, AppResult};
use crate::state::FormState;
use crate::view::View;

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<A> {
    session: Session<A>,
    forms: Rc<FormState>,
    view: Rc<View>,
}

impl<A: StoreApi + 'static> App<A> {
    /// Wires the view, the form drafts and the submission driver to the
    /// session's storefront.
    pub fn new(
        session: Session<A>,
        display: DisplaySettings,
        cdn_url: Url,
        out: Box<dyn Write>,
    ) -> Self {
        let storefront = session.storefront();

        let view = Rc::new(View::new(storefront, display, cdn_url, out));
        view.attach(&storefront.bus);

        let forms = Rc::new(FormState::new());
        forms.attach(&storefront.bus);

        session.attach_submitter();

        App {
            session,
            forms,
            view,
        }
    }

    pub fn session(&self) -> &Session<A> {
        &self.session
    }

    /// Loads the catalog and prints the greeting.
    ///
    /// A failed load is reported through `catalog:failed`; the shopper can
    /// `reload`.
    pub async fn start(&self) -> AppResult<()> {
        self.view.line("Welcome to Web-larek. Type `help` for commands.")?;
        if let Err(err) = self.session.load_catalog().await {
            debug!(error = %err, "initial catalog load failed");
        }
        Ok(())
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R>(&self, input: R) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let command = match commands::parse(&line) {
                Ok(command) => command,
                Err(AppError::EmptyInput) => continue,
                Err(err) => {
                    self.view.line(&err.to_string())?;
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) if err.is_input_error() => self.view.line(&err.to_string())?,
                Err(err) => return Err(err),
            }

            // Let a submission spawned by this command make progress.
            tokio::task::yield_now().await;
        }

        self.settle().await;
        info!("session ended");
        Ok(())
    }

    /// Runs one command.
    pub async fn execute(&self, command: Command) -> AppResult<Flow> {
        let storefront = self.session.storefront();
        debug!(?command, stage = %storefront.checkout.stage(), "executing command");

        match &command {
            Command::Catalog => self.view.render_catalog()?,
            Command::Cart => self.view.render_cart()?,
            Command::Help => self.view.line(HELP)?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Reload => {
                if let Err(err) = self.session.load_catalog().await {
                    debug!(error = %err, "catalog reload failed");
                }
            }
            Command::Show(target) => {
                storefront
                    .bus
                    .publish(commands::catalog::show(&storefront.catalog, target)?);
            }
            Command::Toggle(target) => {
                storefront
                    .bus
                    .publish(commands::catalog::toggle(&storefront.catalog, target)?);
            }
            _ => {
                if let Some(event) = checkout::action(&command) {
                    storefront.bus.publish(event);
                } else if let Some(stage) = checkout::form_of(&command) {
                    if storefront.checkout.stage() != stage {
                        self.view
                            .line(&format!("The {stage} form is not open. `order` starts checkout."))?;
                    } else if let Some(event) = checkout::field(&self.forms, &command) {
                        storefront.bus.publish(event);
                    }
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Waits for in-flight submissions so their outcome is printed.
    async fn settle(&self) {
        if self.session.in_flight() > 0 {
            debug!(in_flight = self.session.in_flight(), "waiting for submissions");
            self.session.wait_idle().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use larek_client::{ClientError, ClientResult};
    use larek_core::{
        Category, CheckoutStage, DeliveryInfo, Money, OrderResult, OrderSnapshot, PaymentMethod,
        Product, Storefront,
    };
    use reqwest::StatusCode;
    use tokio::task::LocalSet;

    use super::*;
    use crate::view::tests::{cdn, SharedBuffer};

    struct FakeApi {
        catalog_down: Cell<bool>,
        reject_with: RefCell<Option<String>>,
        slow: Cell<bool>,
        submitted: RefCell<Vec<OrderSnapshot>>,
    }

    impl FakeApi {
        fn new() -> Self {
            FakeApi {
                catalog_down: Cell::new(false),
                reject_with: RefCell::new(None),
                slow: Cell::new(false),
                submitted: RefCell::default(),
            }
        }
    }

    fn product(id: &str, title: &str, price: Option<i64>) -> Product {
        Product {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category: Category::Additional,
            image: format!("/{id}.svg"),
            price: price.map(Money::from_units),
        }
    }

    impl StoreApi for FakeApi {
        async fn fetch_products(&self) -> ClientResult<Vec<Product>> {
            if self.catalog_down.get() {
                return Err(ClientError::Api {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    message: "maintenance".into(),
                });
            }
            Ok(vec![
                product("p1", "Timer", Some(750)),
                product("p2", "Shell", None),
                product("p3", "Cat", Some(100)),
            ])
        }

        async fn submit_order(&self, snapshot: &OrderSnapshot) -> ClientResult<OrderResult> {
            self.submitted.borrow_mut().push(snapshot.clone());
            if self.slow.get() {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            } else {
                tokio::task::yield_now().await;
            }
            match self.reject_with.borrow().clone() {
                Some(message) => Err(ClientError::Api {
                    status: StatusCode::BAD_REQUEST,
                    message,
                }),
                None => Ok(OrderResult {
                    id: "order-1".into(),
                    total: snapshot.total,
                }),
            }
        }
    }

    fn app(api: FakeApi) -> (App<FakeApi>, SharedBuffer) {
        let out = SharedBuffer::default();
        let session = Session::new(Storefront::new(), api);
        let app = App::new(session, DisplaySettings::default(), cdn(), Box::new(out.clone()));
        (app, out)
    }

    async fn exec(app: &App<FakeApi>, line: &str) {
        let command = commands::parse(line).unwrap();
        app.execute(command).await.unwrap();
    }

    #[tokio::test]
    async fn test_start_lists_catalog() {
        let (app, out) = app(FakeApi::new());

        app.start().await.unwrap();

        let text = out.take();
        assert!(text.starts_with("Welcome to Web-larek."));
        assert!(text.contains("   2. Shell [additional] Priceless\n"));
    }

    #[tokio::test]
    async fn test_catalog_failure_then_reload() {
        let api = FakeApi::new();
        api.catalog_down.set(true);
        let (app, out) = app(api);

        app.start().await.unwrap();
        assert!(out.take().contains("Could not load the catalog: maintenance"));

        app.session().api().catalog_down.set(false);
        exec(&app, "reload").await;
        assert!(out.take().contains("1. Timer"));
    }

    #[tokio::test]
    async fn test_form_fields_outside_their_step_are_rejected() {
        let (app, out) = app(FakeApi::new());
        app.start().await.unwrap();
        out.take();

        exec(&app, "email a@b.c").await;

        assert_eq!(
            out.take(),
            "The contacts form is not open. `order` starts checkout.\n"
        );
        assert_eq!(app.forms.contact().email, "");
    }

    #[tokio::test]
    async fn test_unknown_index_is_an_input_error() {
        let (app, _out) = app(FakeApi::new());
        app.start().await.unwrap();

        let err = app
            .execute(commands::parse("toggle 9").unwrap())
            .await
            .unwrap_err();

        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn test_full_purchase_through_the_command_loop() {
        LocalSet::new()
            .run_until(async {
                let (app, out) = app(FakeApi::new());
                app.start().await.unwrap();

                let script = "toggle 1\ntoggle 2\ntoggle 3\norder\npay cash\naddress Elm St\n\
                              next\nemail a@b.c\nphone +7 900\nsubmit\n";
                app.run(script.as_bytes()).await.unwrap();

                let text = out.take();
                assert!(text.contains("Cart: 3 item(s), 850 synapses"));
                assert!(text.contains("Delivery details complete."));
                assert!(text.contains("Contacts complete."));
                assert!(text.contains("Placing the order..."));
                assert!(text.contains("Order placed. Charged 850 synapses."));

                let storefront = app.session().storefront();
                assert_eq!(storefront.checkout.stage(), CheckoutStage::Success);
                assert!(storefront.cart.is_empty());
                assert_eq!(app.forms.delivery(), DeliveryInfo::default());

                let submitted = app.session().api().submitted.borrow();
                assert_eq!(submitted.len(), 1);
                assert_eq!(submitted[0].items, vec!["p1", "p3"]);
                assert_eq!(submitted[0].delivery.payment, Some(PaymentMethod::Cash));
            })
            .await;
    }

    #[tokio::test]
    async fn test_failed_order_can_be_retried() {
        LocalSet::new()
            .run_until(async {
                let api = FakeApi::new();
                *api.reject_with.borrow_mut() = Some("Неверный адрес".into());
                let (app, out) = app(api);
                app.start().await.unwrap();

                let script = "toggle 1\norder\npay card\naddress Elm St\nnext\n\
                              email a@b.c\nphone +7 900\nsubmit\n";
                app.run(script.as_bytes()).await.unwrap();

                assert!(out
                    .take()
                    .contains("Order failed: Неверный адрес. `retry` to edit contacts"));
                let storefront = app.session().storefront();
                assert_eq!(storefront.checkout.stage(), CheckoutStage::Failed);
                assert_eq!(storefront.cart.count(), 1);

                app.session().api().reject_with.borrow_mut().take();
                app.run("retry\nsubmit\n".as_bytes()).await.unwrap();

                assert_eq!(storefront.checkout.stage(), CheckoutStage::Success);
                assert_eq!(app.session().api().submitted.borrow().len(), 2);
            })
            .await;
    }

    #[tokio::test]
    async fn test_end_of_input_waits_for_pending_submission() {
        LocalSet::new()
            .run_until(async {
                let api = FakeApi::new();
                api.slow.set(true);
                let (app, out) = app(api);
                app.start().await.unwrap();

                let script = "toggle 3\norder\npay card\naddress Elm St\nnext\n\
                              email a@b.c\nphone +7 900\nsubmit\n";
                app.run(script.as_bytes()).await.unwrap();

                assert_eq!(app.session().in_flight(), 0);
                assert!(out.take().contains("Order placed. Charged 100 synapses."));
                assert_eq!(
                    app.session().storefront().checkout.stage(),
                    CheckoutStage::Success
                );
            })
            .await;
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        let (app, out) = app(FakeApi::new());

        app.run("help\nquit\ncart\n".as_bytes()).await.unwrap();

        let text = out.take();
        assert!(text.starts_with("Commands:"));
        assert!(!text.contains("The cart is empty."));
    }
}
