use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

use order_intake::domain::{NewRestaurant, Product};
use order_intake::retry::RetryPolicy;
use order_intake::{setup_tracing, OrderSystem, OrderSystemConfig};

/// Runs the order-intake core against an in-process catalog.
#[derive(Debug, Parser)]
#[command(name = "order_intake", about = "Order-intake demo", long_about = None)]
struct Cli {
    /// Upper bound on a single store request, in milliseconds
    #[arg(long, env = "ORDER_STORE_TIMEOUT_MS", default_value = "2000")]
    store_timeout_ms: u64,

    /// Retries after a lost write race
    #[arg(long, env = "ORDER_MAX_RETRIES", default_value = "5")]
    max_retries: usize,

    /// Mailbox capacity of each store actor
    #[arg(long, env = "ORDER_BUFFER_SIZE", default_value = "100")]
    buffer_size: usize,

    /// JSON array of restaurants to load instead of the built-in catalog
    #[arg(long, env = "ORDER_CATALOG")]
    catalog: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> OrderSystemConfig {
        OrderSystemConfig {
            buffer_size: self.buffer_size,
            store_timeout: Duration::from_millis(self.store_timeout_ms),
            retry: RetryPolicy {
                max_retries: self.max_retries,
                ..RetryPolicy::default()
            },
        }
    }

    fn restaurants(&self) -> Result<Vec<NewRestaurant>, String> {
        let Some(path) = &self.catalog else {
            return Ok(demo_catalog());
        };
        let raw = std::fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
        serde_json::from_str(&raw).map_err(|e| format!("parsing {}: {e}", path.display()))
    }
}

fn demo_catalog() -> Vec<NewRestaurant> {
    vec![
        NewRestaurant::with_product(
            "La Pizzeria ",
            Product::new(1, "Margherita", 1, Decimal::new(800, 2), Decimal::new(950, 2)),
        ),
        NewRestaurant::with_product(
            "Sushi Go",
            Product::new(2, "Nigiri box", 4, Decimal::new(1250, 2), Decimal::new(1800, 2)),
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<(), String> {
    _ = dotenvy::dotenv();
    let cli = Cli::parse();

    setup_tracing();

    info!("Starting order-intake core");

    let system = OrderSystem::new(cli.config());
    let restaurants = cli.restaurants()?;
    system.seed(restaurants).await.map_err(|e| e.to_string())?;

    let span = tracing::info_span!("named_order");
    let receipt = async {
        info!("Placing single-unit order by restaurant name");
        system
            .placement
            .place_order_by_restaurant_name("La Pizzeria", "Margherita", Decimal::new(950, 2), "user-42")
            .await
    }
    .instrument(span)
    .await;

    match &receipt {
        Ok(receipt) => info!(order_id = %receipt.order_id, "Order placed successfully"),
        Err(e) => error!(error = %e, "Order placement failed"),
    }

    let span = tracing::info_span!("quantity_order");
    let quantity_result = async {
        info!("Placing quantity order by product id");
        system.placement.place_order(2, 3).await
    }
    .instrument(span)
    .await;

    match quantity_result {
        Ok(receipt) => info!(
            code = %receipt.code,
            product_name = %receipt.product_name,
            restaurant_name = %receipt.restaurant_name,
            "Quantity order placed successfully"
        ),
        Err(e) => error!(error = %e, "Quantity order failed"),
    }

    if let Ok(receipt) = receipt {
        let orders = system.lifecycle.list_orders("user-42").await.map_err(|e| e.to_string())?;
        info!(order_count = orders.len(), "Retrieved order history");

        match system.lifecycle.cancel_order("user-42", &receipt.order_id).await {
            Ok(order) => info!(order_id = %order.order_id, state = ?order.state, "Order cancelled"),
            Err(e) => error!(error = %e, "Cancellation failed"),
        }
    }

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}
