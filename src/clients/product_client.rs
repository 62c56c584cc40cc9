use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::client_method;
use crate::domain::Product;
use crate::error::TransportError;
use crate::messages::ProductRequest;

/// Client for the product transport service.
#[derive(Clone)]
pub struct ProductClient {
    sender: mpsc::Sender<ProductRequest>,
}

impl ProductClient {
    pub fn new(sender: mpsc::Sender<ProductRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), TransportError> {
        debug!("Sending shutdown request");
        self.sender
            .send(ProductRequest::Shutdown)
            .await
            .map_err(|_| TransportError::closed())
    }
}

client_method!(ProductClient => fn fetch_products() -> Vec<Product> as ProductRequest::FetchProducts, Error = TransportError);
