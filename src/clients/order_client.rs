use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::client_method;
use crate::domain::{Order, OrderDraft};
use crate::error::TransportError;
use crate::messages::OrderRequest;

/// Client for the order transport service.
///
/// Every call maps to exactly one HTTP request and resolves with exactly one
/// outcome: the decoded payload or the transport error, untouched.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderRequest>,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<OrderRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), TransportError> {
        debug!("Sending shutdown request");
        self.sender
            .send(OrderRequest::Shutdown)
            .await
            .map_err(|_| TransportError::closed())
    }
}

client_method!(OrderClient => fn fetch_orders() -> Vec<Order> as OrderRequest::FetchOrders, Error = TransportError);
client_method!(OrderClient => fn create_order(draft: OrderDraft) -> Order as OrderRequest::CreateOrder, Error = TransportError);
