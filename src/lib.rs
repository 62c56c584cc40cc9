//! # order-console
//!
//! Client-side core of the order management console: transport clients for the
//! order and inventory backends, and the view-state controllers for the order list
//! and the order form.
//!
//! ## Terminology
//!
//! - **Service** (e.g. `OrderListService`) = a task that exclusively owns some state
//! - **Client** (e.g. `OrderListClient`) = the cloneable handle used to talk to it
//!
//! ## Flow
//!
//! controller activation → transport call → one terminal outcome → reconciliation of
//! `{items, loading, error}` → (form only) created notification.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use order_console::app_system::OrderConsole;
//! use order_console::config::ConsoleConfig;
//!
//! let console = OrderConsole::new(&ConsoleConfig::from_env())?;
//! console.refresh_list_on_created().await?;
//!
//! let orders = console.order_list.activate().await?;
//! console.order_form.set_product("Widget".to_string()).await?;
//! console.order_form.set_quantity(2).await?;
//! let outcome = console.order_form.submit().await?;
//!
//! console.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod app_system;
pub mod clients;
pub mod config;
pub mod controllers;
pub mod domain;
pub mod error;
pub mod messages;
pub mod transport;
pub mod view_state;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;
