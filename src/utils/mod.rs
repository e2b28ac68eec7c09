//! Utilities Module
//!
//! Common utilities used across the crate.

mod json;
pub mod logging;
pub mod network_config;

pub use json::*;
