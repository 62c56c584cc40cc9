use clap::Parser;
use tracing::{error, info, warn, Instrument};

use order_console::app_system::{setup_tracing, OrderConsole};
use order_console::config::ConsoleConfig;
use order_console::controllers::SubmitOutcome;

/// Loads the order list and the product list. With a product, also submits an order
/// and lets the created notification refresh the list.
#[derive(Parser, Debug)]
#[command(name = "order_console", about = "Browse orders and products, optionally place an order")]
struct Args {
    /// Product to order
    product: Option<String>,
    /// Quantity to order (the form default when omitted)
    #[arg(requires = "product", allow_negative_numbers = true)]
    quantity: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Setup tracing once for the entire application
    setup_tracing();

    let config = ConsoleConfig::from_env();
    info!(orders = %config.orders_base_url, inventory = %config.products_base_url, "Starting order console");

    let console = OrderConsole::new(&config)?;
    console.refresh_list_on_created().await?;

    let orders = console.order_list.activate().await?;
    match &orders.error {
        Some(message) => warn!(message = %message, "Order list unavailable"),
        None => info!(order_count = orders.items.len(), "Order list loaded"),
    }

    let form = console.order_form.activate().await?;
    match &form.view.error {
        Some(message) => warn!(message = %message, "Product list unavailable"),
        None => {
            for product in &form.view.items {
                info!(id = product.id, name = %product.name, stock = product.stock_quantity, "Product");
            }
        }
    }

    if let Some(product) = args.product {
        let span = tracing::info_span!("order_submission");
        let outcome = async {
            console.order_form.set_product(product).await?;
            if let Some(quantity) = args.quantity {
                console.order_form.set_quantity(quantity).await?;
            }
            console.order_form.submit().await
        }
        .instrument(span)
        .await?;

        match outcome {
            SubmitOutcome::Created(order) => {
                info!(order_id = ?order.id, status = ?order.status, "Order created");
                let orders = console.order_list.refresh().await?;
                info!(order_count = orders.items.len(), "Order list refreshed");
            }
            SubmitOutcome::Invalid(errors) => warn!(reasons = %errors, "Order not submitted"),
            SubmitOutcome::Failed(message) => error!(message = %message, "Order creation failed"),
            SubmitOutcome::Superseded => warn!("Order submission was superseded"),
        }
    }

    console.shutdown().await?;
    info!("Order console finished");
    Ok(())
}
