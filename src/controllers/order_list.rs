use std::collections::HashMap;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn, Instrument};

use crate::clients::OrderClient;
use crate::domain::Order;
use crate::error::{ControllerError, TransportError};
use crate::handle_method;
use crate::messages::ListRequest;
use crate::view_state::{CallTracker, OnFailure, Resolution, ViewState};

pub const LOAD_ORDERS_FAILED: &str = "Failed to load orders";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ListCall {
    FetchOrders,
}

#[derive(Debug)]
struct ListOutcome {
    seq: u64,
    result: Result<Vec<Order>, TransportError>,
}

/// Owns the order list view state. All mutation happens on this task.
pub struct OrderListService {
    receiver: mpsc::Receiver<ListRequest>,
    outcomes: mpsc::UnboundedReceiver<ListOutcome>,
    outcome_sender: mpsc::UnboundedSender<ListOutcome>,
    order_client: OrderClient,
    state: ViewState<Order>,
    calls: CallTracker<ListCall>,
    activated: bool,
    waiters: HashMap<u64, oneshot::Sender<ViewState<Order>>>,
}

impl OrderListService {
    pub fn new(buffer_size: usize, order_client: OrderClient, discard_stale: bool) -> (Self, OrderListClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (outcome_sender, outcomes) = mpsc::unbounded_channel();
        let service = Self {
            receiver,
            outcomes,
            outcome_sender,
            order_client,
            state: ViewState::new(),
            calls: CallTracker::new(discard_stale),
            activated: false,
            waiters: HashMap::new(),
        };
        (service, OrderListClient::new(sender))
    }

    /// Runs until shut down or until every handle is dropped. Outcomes of calls
    /// still in flight at that point are dropped with the outcome channel.
    #[instrument(name = "order_list", skip(self))]
    pub async fn run(mut self) {
        info!("OrderList starting");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(ListRequest::Activate { respond_to }) => self.handle_activate(respond_to),
                    Some(ListRequest::Refresh { respond_to }) => self.handle_refresh(respond_to),
                    Some(ListRequest::Snapshot { respond_to }) => {
                        let _ = respond_to.send(self.state.clone());
                    }
                    Some(ListRequest::Shutdown) | None => {
                        info!("OrderList shutting down");
                        break;
                    }
                },
                Some(outcome) = self.outcomes.recv() => self.handle_outcome(outcome),
            }
        }

        info!("OrderList stopped");
    }

    fn handle_activate(&mut self, respond_to: oneshot::Sender<ViewState<Order>>) {
        if self.activated {
            debug!("Already activated");
            let _ = respond_to.send(self.state.clone());
            return;
        }
        self.activated = true;
        self.handle_refresh(Some(respond_to));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_refresh(&mut self, respond_to: Option<oneshot::Sender<ViewState<Order>>>) {
        let seq = self.calls.issue(ListCall::FetchOrders);
        self.state.begin();
        if let Some(respond_to) = respond_to {
            self.waiters.insert(seq, respond_to);
        }
        debug!(seq, "Fetching orders");

        let client = self.order_client.clone();
        let outcomes = self.outcome_sender.clone();
        tokio::spawn(
            async move {
                let result = client.fetch_orders().await;
                let _ = outcomes.send(ListOutcome { seq, result });
            }
            .in_current_span(),
        );
    }

    #[instrument(fields(seq = outcome.seq), skip(self, outcome))]
    fn handle_outcome(&mut self, outcome: ListOutcome) {
        match self.calls.resolve(ListCall::FetchOrders, outcome.seq) {
            Resolution::Stale => debug!("Discarding superseded outcome"),
            Resolution::Apply { still_loading } => match outcome.result {
                Ok(orders) => {
                    info!(order_count = orders.len(), "Orders loaded");
                    self.state.succeed(Some(orders), still_loading);
                }
                Err(e) => {
                    error!(error = %e, "Loading orders failed");
                    self.state.fail(LOAD_ORDERS_FAILED, OnFailure::KeepItems, still_loading);
                }
            },
        }

        if let Some(respond_to) = self.waiters.remove(&outcome.seq) {
            let _ = respond_to.send(self.state.clone());
        }
    }
}

/// Handle to the order list controller.
#[derive(Clone)]
pub struct OrderListClient {
    sender: mpsc::Sender<ListRequest>,
}

impl OrderListClient {
    pub fn new(sender: mpsc::Sender<ListRequest>) -> Self {
        Self { sender }
    }

    /// Refreshes and waits until that refresh has been reconciled.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<ViewState<Order>, ControllerError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ListRequest::Refresh { respond_to: Some(respond_to) })
            .await
            .map_err(|_| ControllerError::Closed)?;
        response.await.map_err(|_| ControllerError::Dropped)
    }

    /// Enqueues a refresh without waiting for its outcome.
    #[instrument(skip(self))]
    pub async fn request_refresh(&self) -> Result<(), ControllerError> {
        debug!("Sending request");
        self.sender
            .send(ListRequest::Refresh { respond_to: None })
            .await
            .map_err(|_| ControllerError::Closed)
    }

    /// Non-blocking variant of [`Self::request_refresh`] for use from listeners.
    pub fn try_request_refresh(&self) -> Result<(), ControllerError> {
        self.sender
            .try_send(ListRequest::Refresh { respond_to: None })
            .map_err(|e| match e {
                TrySendError::Full(_) => {
                    warn!("Refresh queue full, dropping refresh");
                    ControllerError::Busy
                }
                TrySendError::Closed(_) => ControllerError::Closed,
            })
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), ControllerError> {
        debug!("Sending shutdown request");
        self.sender
            .send(ListRequest::Shutdown)
            .await
            .map_err(|_| ControllerError::Closed)
    }
}

handle_method!(OrderListClient => fn activate() -> ViewState<Order> as ListRequest::Activate);
handle_method!(OrderListClient => fn state() -> ViewState<Order> as ListRequest::Snapshot);
