//! Application configuration and constants.
//!
//! This module provides:
//! - Default values and fixed constants
//! - CLI option types and parsing
//! - The live scan configuration and its snapshot holder

mod constants;
mod manager;
mod types;

pub use constants::*;
pub use manager::ConfigManager;
pub use types::{
    Config, ConfigPatch, LogFormat, LogLevel, ScanConfig, TagPrefixPatch, TagPrefixes,
};
