use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn, Instrument};

use crate::clients::{OrderClient, ProductClient};
use crate::controllers::validation::{validate, OrderFormFields};
use crate::domain::{Order, Product};
use crate::error::{ControllerError, TransportError, ValidationErrors};
use crate::handle_method;
use crate::messages::FormRequest;
use crate::view_state::{CallTracker, OnFailure, Resolution, ViewState};

pub const LOAD_PRODUCTS_FAILED: &str = "Failed to load products";
pub const ORDER_CREATION_FAILED: &str = "Order creation failed";

/// Called with no payload after each successful order submission.
///
/// A listener that panics is logged and skipped; the form and the remaining
/// listeners keep running.
pub type CreatedListener = Box<dyn Fn() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Form fields plus the view state shared by product loading and submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub fields: OrderFormFields,
    pub view: ViewState<Product>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rejected before any network call. State is untouched.
    Invalid(ValidationErrors),
    Created(Order),
    /// The message now shown in the view state's `error`.
    Failed(String),
    /// A newer submission was started before this one finished; its outcome was dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FormCall {
    LoadProducts,
    Submit,
}

#[derive(Debug)]
enum FormOutcome {
    Products {
        seq: u64,
        result: Result<Vec<Product>, TransportError>,
    },
    Submitted {
        seq: u64,
        result: Result<Order, TransportError>,
    },
}

/// Owns the order form: its fields, the product list and the created listeners.
pub struct OrderFormService {
    receiver: mpsc::Receiver<FormRequest>,
    outcomes: mpsc::UnboundedReceiver<FormOutcome>,
    outcome_sender: mpsc::UnboundedSender<FormOutcome>,
    order_client: OrderClient,
    product_client: ProductClient,
    fields: OrderFormFields,
    state: ViewState<Product>,
    calls: CallTracker<FormCall>,
    activated: bool,
    listeners: Vec<(ListenerId, CreatedListener)>,
    next_listener_id: u64,
    product_waiters: HashMap<u64, oneshot::Sender<FormSnapshot>>,
    submit_waiters: HashMap<u64, oneshot::Sender<SubmitOutcome>>,
}

impl OrderFormService {
    pub fn new(
        buffer_size: usize,
        order_client: OrderClient,
        product_client: ProductClient,
        discard_stale: bool,
    ) -> (Self, OrderFormClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (outcome_sender, outcomes) = mpsc::unbounded_channel();
        let service = Self {
            receiver,
            outcomes,
            outcome_sender,
            order_client,
            product_client,
            fields: OrderFormFields::default(),
            state: ViewState::new(),
            calls: CallTracker::new(discard_stale),
            activated: false,
            listeners: Vec::new(),
            next_listener_id: 1,
            product_waiters: HashMap::new(),
            submit_waiters: HashMap::new(),
        };
        (service, OrderFormClient::new(sender))
    }

    #[instrument(name = "order_form", skip(self))]
    pub async fn run(mut self) {
        info!("OrderForm starting");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(FormRequest::Shutdown) | None => {
                        info!("OrderForm shutting down");
                        break;
                    }
                    Some(request) => self.handle_request(request),
                },
                Some(outcome) = self.outcomes.recv() => match outcome {
                    FormOutcome::Products { seq, result } => self.handle_products_outcome(seq, result),
                    FormOutcome::Submitted { seq, result } => self.handle_submit_outcome(seq, result),
                },
            }
        }

        // Listeners must not outlive the form.
        self.listeners.clear();
        info!("OrderForm stopped");
    }

    fn handle_request(&mut self, request: FormRequest) {
        match request {
            FormRequest::Activate { respond_to } => {
                if self.activated {
                    debug!("Already activated");
                    let _ = respond_to.send(self.snapshot());
                } else {
                    self.activated = true;
                    self.handle_load_products(respond_to);
                }
            }
            FormRequest::LoadProducts { respond_to } => self.handle_load_products(respond_to),
            FormRequest::Submit { respond_to } => self.handle_submit(respond_to),
            FormRequest::SetProduct { product, respond_to } => {
                self.fields.product = product;
                let _ = respond_to.send(self.fields.clone());
            }
            FormRequest::SetQuantity { quantity, respond_to } => {
                self.fields.quantity = quantity;
                let _ = respond_to.send(self.fields.clone());
            }
            FormRequest::ResetFields { respond_to } => {
                self.fields = OrderFormFields::default();
                let _ = respond_to.send(self.fields.clone());
            }
            FormRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(self.snapshot());
            }
            FormRequest::Subscribe { listener, respond_to } => {
                let id = ListenerId(self.next_listener_id);
                self.next_listener_id += 1;
                self.listeners.push((id, listener));
                debug!(listener_count = self.listeners.len(), "Listener registered");
                let _ = respond_to.send(id);
            }
            FormRequest::Unsubscribe { id, respond_to } => {
                let before = self.listeners.len();
                self.listeners.retain(|(existing, _)| *existing != id);
                let _ = respond_to.send(self.listeners.len() != before);
            }
            FormRequest::Shutdown => {}
        }
    }

    fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            fields: self.fields.clone(),
            view: self.state.clone(),
        }
    }

    #[instrument(skip(self, respond_to))]
    fn handle_load_products(&mut self, respond_to: oneshot::Sender<FormSnapshot>) {
        let seq = self.calls.issue(FormCall::LoadProducts);
        self.state.begin();
        self.product_waiters.insert(seq, respond_to);
        debug!(seq, "Fetching products");

        let client = self.product_client.clone();
        let outcomes = self.outcome_sender.clone();
        tokio::spawn(
            async move {
                let result = client.fetch_products().await;
                let _ = outcomes.send(FormOutcome::Products { seq, result });
            }
            .in_current_span(),
        );
    }

    /// Validation runs first; an invalid form never reaches the transport.
    #[instrument(fields(product = %self.fields.product, quantity = self.fields.quantity), skip(self, respond_to))]
    fn handle_submit(&mut self, respond_to: oneshot::Sender<SubmitOutcome>) {
        let draft = match validate(&self.fields) {
            Ok(draft) => draft,
            Err(errors) => {
                debug!(reasons = %errors, "Submission rejected by validation");
                let _ = respond_to.send(SubmitOutcome::Invalid(errors));
                return;
            }
        };

        let seq = self.calls.issue(FormCall::Submit);
        self.state.begin();
        self.submit_waiters.insert(seq, respond_to);
        debug!(seq, "Submitting order");

        let client = self.order_client.clone();
        let outcomes = self.outcome_sender.clone();
        tokio::spawn(
            async move {
                let result = client.create_order(draft).await;
                let _ = outcomes.send(FormOutcome::Submitted { seq, result });
            }
            .in_current_span(),
        );
    }

    #[instrument(skip(self, result))]
    fn handle_products_outcome(&mut self, seq: u64, result: Result<Vec<Product>, TransportError>) {
        match self.calls.resolve(FormCall::LoadProducts, seq) {
            Resolution::Stale => debug!("Discarding superseded outcome"),
            Resolution::Apply { still_loading } => match result {
                Ok(products) => {
                    info!(product_count = products.len(), "Products loaded");
                    self.state.succeed(Some(products), still_loading);
                }
                Err(e) => {
                    error!(error = %e, "Loading products failed");
                    self.state.fail(LOAD_PRODUCTS_FAILED, OnFailure::ClearItems, still_loading);
                }
            },
        }

        if let Some(respond_to) = self.product_waiters.remove(&seq) {
            let _ = respond_to.send(self.snapshot());
        }
    }

    #[instrument(skip(self, result))]
    fn handle_submit_outcome(&mut self, seq: u64, result: Result<Order, TransportError>) {
        let outcome = match self.calls.resolve(FormCall::Submit, seq) {
            Resolution::Stale => {
                debug!("Discarding superseded outcome");
                SubmitOutcome::Superseded
            }
            Resolution::Apply { still_loading } => match result {
                Ok(order) => {
                    info!(order_id = ?order.id, "Order submitted");
                    self.fields = OrderFormFields::default();
                    self.state.succeed(None, still_loading);
                    self.notify_created();
                    SubmitOutcome::Created(order)
                }
                Err(e) => {
                    error!(error = %e, "Order submission failed");
                    let message = e.backend_message().unwrap_or(ORDER_CREATION_FAILED).to_string();
                    self.state.fail(message.clone(), OnFailure::KeepItems, still_loading);
                    SubmitOutcome::Failed(message)
                }
            },
        };

        if let Some(respond_to) = self.submit_waiters.remove(&seq) {
            let _ = respond_to.send(outcome);
        }
    }

    fn notify_created(&self) {
        debug!(listener_count = self.listeners.len(), "Notifying created listeners");
        for (id, listener) in &self.listeners {
            if panic::catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
                warn!(listener = ?id, "Created listener panicked");
            }
        }
    }
}

/// Handle to the order form controller.
#[derive(Clone)]
pub struct OrderFormClient {
    sender: mpsc::Sender<FormRequest>,
}

impl OrderFormClient {
    pub fn new(sender: mpsc::Sender<FormRequest>) -> Self {
        Self { sender }
    }

    /// Registers a listener for successful submissions.
    #[instrument(skip(self, listener))]
    pub async fn on_created(&self, listener: impl Fn() + Send + 'static) -> Result<ListenerId, ControllerError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(FormRequest::Subscribe {
                listener: Box::new(listener),
                respond_to,
            })
            .await
            .map_err(|_| ControllerError::Closed)?;
        response.await.map_err(|_| ControllerError::Dropped)
    }

    pub async fn fields(&self) -> Result<OrderFormFields, ControllerError> {
        Ok(self.state().await?.fields)
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), ControllerError> {
        debug!("Sending shutdown request");
        self.sender
            .send(FormRequest::Shutdown)
            .await
            .map_err(|_| ControllerError::Closed)
    }
}

handle_method!(OrderFormClient => fn activate() -> FormSnapshot as FormRequest::Activate);
handle_method!(OrderFormClient => fn load_products() -> FormSnapshot as FormRequest::LoadProducts);
handle_method!(OrderFormClient => fn submit() -> SubmitOutcome as FormRequest::Submit);
handle_method!(OrderFormClient => fn set_product(product: String) -> OrderFormFields as FormRequest::SetProduct);
handle_method!(OrderFormClient => fn set_quantity(quantity: i64) -> OrderFormFields as FormRequest::SetQuantity);
handle_method!(OrderFormClient => fn reset_fields() -> OrderFormFields as FormRequest::ResetFields);
handle_method!(OrderFormClient => fn state() -> FormSnapshot as FormRequest::Snapshot);
handle_method!(OrderFormClient => fn remove_listener(id: ListenerId) -> bool as FormRequest::Unsubscribe);
