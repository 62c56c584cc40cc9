use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, Instrument};

use crate::clients::OrderClient;
use crate::domain::{Order, OrderDraft};
use crate::error::TransportError;
use crate::messages::{OrderRequest, ServiceResponse};
use crate::transport::http;

/// Owns the HTTP connection to the order backend.
///
/// Each request is served in its own task, which takes ownership of the reply
/// channel. Concurrent calls are therefore never serialized here.
pub struct OrderService {
    receiver: mpsc::Receiver<OrderRequest>,
    http: reqwest::Client,
    base_url: String,
}

impl OrderService {
    pub fn new(buffer_size: usize, http: reqwest::Client, base_url: impl Into<String>) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            http,
            base_url: base_url.into(),
        };
        (service, OrderClient::new(sender))
    }

    #[instrument(name = "order_service", skip(self), fields(base_url = %self.base_url))]
    pub async fn run(mut self) {
        info!("OrderService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderRequest::FetchOrders { respond_to } => self.handle_fetch_orders(respond_to),
                OrderRequest::CreateOrder { draft, respond_to } => {
                    self.handle_create_order(draft, respond_to)
                }
                OrderRequest::Shutdown => {
                    info!("OrderService shutting down");
                    break;
                }
            }
        }

        info!("OrderService stopped");
    }

    fn orders_url(&self) -> String {
        format!("{}/orders", self.base_url)
    }

    #[instrument(skip(self, respond_to))]
    fn handle_fetch_orders(&self, respond_to: ServiceResponse<Vec<Order>, TransportError>) {
        debug!("Processing fetch_orders request");
        let client = self.http.clone();
        let url = self.orders_url();

        tokio::spawn(
            async move {
                let result = http::get_json::<Vec<Order>>(&client, &url).await;
                match &result {
                    Ok(orders) => info!(order_count = orders.len(), "Orders fetched"),
                    Err(e) => error!(error = %e, "Fetching orders failed"),
                }
                let _ = respond_to.send(result);
            }
            .in_current_span(),
        );
    }

    #[instrument(fields(product = %draft.product, quantity = draft.quantity), skip(self, draft, respond_to))]
    fn handle_create_order(&self, draft: OrderDraft, respond_to: ServiceResponse<Order, TransportError>) {
        debug!("Processing create_order request");
        let client = self.http.clone();
        let url = self.orders_url();

        tokio::spawn(
            async move {
                let result = http::post_json::<_, Order>(&client, &url, &draft).await;
                match &result {
                    Ok(order) => info!(order_id = ?order.id, status = ?order.status, "Order created"),
                    Err(e) => error!(error = %e, "Creating order failed"),
                }
                let _ = respond_to.send(result);
            }
            .in_current_span(),
        );
    }
}
