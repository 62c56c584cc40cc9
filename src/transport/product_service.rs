use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, Instrument};

use crate::clients::ProductClient;
use crate::domain::Product;
use crate::error::TransportError;
use crate::messages::{ProductRequest, ServiceResponse};
use crate::transport::http;

/// Owns the HTTP connection to the inventory backend.
pub struct ProductService {
    receiver: mpsc::Receiver<ProductRequest>,
    http: reqwest::Client,
    base_url: String,
}

impl ProductService {
    pub fn new(buffer_size: usize, http: reqwest::Client, base_url: impl Into<String>) -> (Self, ProductClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            http,
            base_url: base_url.into(),
        };
        (service, ProductClient::new(sender))
    }

    #[instrument(name = "product_service", skip(self), fields(base_url = %self.base_url))]
    pub async fn run(mut self) {
        info!("ProductService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ProductRequest::FetchProducts { respond_to } => self.handle_fetch_products(respond_to),
                ProductRequest::Shutdown => {
                    info!("ProductService shutting down");
                    break;
                }
            }
        }

        info!("ProductService stopped");
    }

    #[instrument(skip(self, respond_to))]
    fn handle_fetch_products(&self, respond_to: ServiceResponse<Vec<Product>, TransportError>) {
        debug!("Processing fetch_products request");
        let client = self.http.clone();
        let url = format!("{}/inventory/products", self.base_url);

        tokio::spawn(
            async move {
                let result = http::get_json::<Vec<Product>>(&client, &url).await;
                match &result {
                    Ok(products) => info!(product_count = products.len(), "Products fetched"),
                    Err(e) => error!(error = %e, "Fetching products failed"),
                }
                let _ = respond_to.send(result);
            }
            .in_current_span(),
        );
    }
}
