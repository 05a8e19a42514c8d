//! Process start-up: logger and shared HTTP client.

mod client;
mod logger;

pub use client::init_client;
pub use logger::init_logger_with;
