//! Endpoint scanning: lookup, projection and persistence for one collection.

mod scanner;
mod types;


pub use scanner::EndpointScanner;
pub use types::{PassReport, ScanReport};
