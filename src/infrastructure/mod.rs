//! Infrastructure - cold path only
//!
//! This module contains non-latency-critical code:
//! - Configuration management
//! - Logging
//! - Status API server

pub mod api;
pub mod config;
pub mod logging;

pub use api::start_server;
pub use config::{Config, ConfigError};
