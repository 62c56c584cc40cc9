//! Runtime configuration for the console.
//!
//! The two base URLs point at independent backends (orders and inventory). They are
//! fixed for the lifetime of the process.

use std::str::FromStr;

use tracing::warn;

pub const DEFAULT_ORDERS_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_PRODUCTS_BASE_URL: &str = "http://localhost:8081";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

pub const ORDERS_URL_VAR: &str = "ORDER_SERVICE_URL";
pub const PRODUCTS_URL_VAR: &str = "INVENTORY_SERVICE_URL";
pub const CHANNEL_CAPACITY_VAR: &str = "CONSOLE_CHANNEL_CAPACITY";
pub const DISCARD_STALE_VAR: &str = "CONSOLE_DISCARD_STALE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub orders_base_url: String,
    pub products_base_url: String,
    /// Buffer size of every service's request channel.
    pub channel_capacity: usize,
    /// Drop outcomes of calls that were superseded by a newer call of the same kind.
    pub discard_stale_outcomes: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            orders_base_url: DEFAULT_ORDERS_BASE_URL.to_string(),
            products_base_url: DEFAULT_PRODUCTS_BASE_URL.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            discard_stale_outcomes: true,
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            orders_base_url: lookup(ORDERS_URL_VAR)
                .map(|url| trim_base_url(&url))
                .unwrap_or(defaults.orders_base_url),
            products_base_url: lookup(PRODUCTS_URL_VAR)
                .map(|url| trim_base_url(&url))
                .unwrap_or(defaults.products_base_url),
            channel_capacity: parse_or(&lookup, CHANNEL_CAPACITY_VAR, defaults.channel_capacity)
                .max(1),
            discard_stale_outcomes: parse_or(&lookup, DISCARD_STALE_VAR, defaults.discard_stale_outcomes),
        }
    }

    pub fn with_base_urls(mut self, orders: &str, products: &str) -> Self {
        self.orders_base_url = trim_base_url(orders);
        self.products_base_url = trim_base_url(products);
        self
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, "Ignoring unparseable config value");
                default
            }
        },
        None => default,
    }
}
