//! # Mock Framework
//!
//! Utilities for testing controllers without a backend.
//!
//! Use [`create_mock_order_client`] / [`create_mock_product_client`] to get a transport
//! client and the receiver its requests land on. Then use helpers like
//! [`expect_fetch_orders`] or [`expect_create_order`] to take the next request and
//! answer it whenever the test is ready.
//!
//! Holding on to the responder is how a test keeps a call "in flight": the
//! controller sees `loading = true` until the responder is used or dropped.

use tokio::sync::mpsc;

use crate::clients::{OrderClient, ProductClient};
use crate::domain::{Order, OrderDraft, Product};
use crate::error::TransportError;
use crate::messages::{OrderRequest, ProductRequest, ServiceResponse};

pub fn create_mock_order_client(buffer_size: usize) -> (OrderClient, mpsc::Receiver<OrderRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (OrderClient::new(sender), receiver)
}

pub fn create_mock_product_client(buffer_size: usize) -> (ProductClient, mpsc::Receiver<ProductRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ProductClient::new(sender), receiver)
}

/// Helper to verify that the next message is a FetchOrders request
pub async fn expect_fetch_orders(
    receiver: &mut mpsc::Receiver<OrderRequest>,
) -> Option<ServiceResponse<Vec<Order>, TransportError>> {
    match receiver.recv().await {
        Some(OrderRequest::FetchOrders { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a CreateOrder request
pub async fn expect_create_order(
    receiver: &mut mpsc::Receiver<OrderRequest>,
) -> Option<(OrderDraft, ServiceResponse<Order, TransportError>)> {
    match receiver.recv().await {
        Some(OrderRequest::CreateOrder { draft, respond_to }) => Some((draft, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a FetchProducts request
pub async fn expect_fetch_products(
    receiver: &mut mpsc::Receiver<ProductRequest>,
) -> Option<ServiceResponse<Vec<Product>, TransportError>> {
    match receiver.recv().await {
        Some(ProductRequest::FetchProducts { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Backend error body the order service sends when it rejects an order.
pub fn backend_rejection(message: &str) -> TransportError {
    TransportError::Status {
        status: 400,
        body: Some(serde_json::json!({ "error": { "message": message } })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_order_client(10);

        let create_task = tokio::spawn(async move {
            client.create_order(OrderDraft::new("Widget", 2)).await
        });

        let (draft, responder) = expect_create_order(&mut receiver).await.expect("Expected CreateOrder request");
        assert_eq!(draft, OrderDraft::new("Widget", 2));
        responder.send(Ok(Order::new(1, "Widget", 2, "CREATED"))).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(Order::new(1, "Widget", 2, "CREATED")));
    }

    #[tokio::test]
    async fn test_dropped_responder_surfaces_as_unavailable() {
        let (client, mut receiver) = create_mock_product_client(10);

        let task = tokio::spawn(async move { client.fetch_products().await });
        drop(expect_fetch_products(&mut receiver).await.unwrap());

        assert!(matches!(task.await.unwrap(), Err(TransportError::Unavailable(_))));
    }
}
