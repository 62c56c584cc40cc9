use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::clients::{OrderClient, ProductClient};
use crate::config::ConsoleConfig;
use crate::controllers::{ListenerId, OrderFormClient, OrderFormService, OrderListClient, OrderListService};
use crate::error::{ControllerError, TransportError};
use crate::transport::{OrderService, ProductService};

/// Starts, wires and stops every service of the console.
///
/// **Startup Order:**
/// 1. Transport services (orders, inventory)
/// 2. Controllers, each handed the transport clients it needs
///
/// Shutdown runs the other way round.
pub struct OrderConsole {
    pub order_client: OrderClient,
    pub product_client: ProductClient,
    pub order_list: OrderListClient,
    pub order_form: OrderFormClient,
    handles: Vec<JoinHandle<()>>,
}

impl OrderConsole {
    #[instrument(name = "order_console", skip(config), fields(orders = %config.orders_base_url, inventory = %config.products_base_url))]
    pub fn new(config: &ConsoleConfig) -> Result<Self, TransportError> {
        info!("Starting order console");
        let http = reqwest::Client::builder().build()?;

        let (order_service, order_client) =
            OrderService::new(config.channel_capacity, http.clone(), config.orders_base_url.as_str());
        let (product_service, product_client) =
            ProductService::new(config.channel_capacity, http, config.products_base_url.as_str());
        let handles = vec![tokio::spawn(order_service.run()), tokio::spawn(product_service.run())];

        let console = Self::start_controllers(config, order_client, product_client, handles);
        info!("Order console started");
        Ok(console)
    }

    /// Starts the controllers on top of transport clients that are already served
    /// elsewhere (for instance by a test).
    pub fn with_transports(config: &ConsoleConfig, order_client: OrderClient, product_client: ProductClient) -> Self {
        Self::start_controllers(config, order_client, product_client, Vec::new())
    }

    fn start_controllers(
        config: &ConsoleConfig,
        order_client: OrderClient,
        product_client: ProductClient,
        mut handles: Vec<JoinHandle<()>>,
    ) -> Self {
        let (list_service, order_list) = OrderListService::new(
            config.channel_capacity,
            order_client.clone(),
            config.discard_stale_outcomes,
        );
        handles.push(tokio::spawn(list_service.run()));

        let (form_service, order_form) = OrderFormService::new(
            config.channel_capacity,
            order_client.clone(),
            product_client.clone(),
            config.discard_stale_outcomes,
        );
        handles.push(tokio::spawn(form_service.run()));

        Self {
            order_client,
            product_client,
            order_list,
            order_form,
            handles,
        }
    }

    /// Makes every successful submission on the form trigger a list refresh.
    pub async fn refresh_list_on_created(&self) -> Result<ListenerId, ControllerError> {
        let list = self.order_list.clone();
        self.order_form
            .on_created(move || {
                if let Err(e) = list.try_request_refresh() {
                    warn!(error = %e, "Could not refresh order list after creation");
                }
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), ControllerError> {
        info!("Shutting down order console");

        // Controllers first, they depend on the transports.
        let _ = self.order_form.shutdown().await;
        let _ = self.order_list.shutdown().await;
        let _ = self.order_client.shutdown().await;
        let _ = self.product_client.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
            }
        }

        info!("Order console shutdown complete");
        Ok(())
    }
}
