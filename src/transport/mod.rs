//! HTTP transport services. The only place in the crate that performs network I/O.

pub mod http;
pub mod order_service;
pub mod product_service;

pub use order_service::OrderService;
pub use product_service::ProductService;
