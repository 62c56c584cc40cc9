//! System orchestration, startup, and shutdown logic.

pub mod console;
pub mod telemetry;

pub use console::*;
pub use telemetry::*;
