//! In-process performance and resource management for web services
//!
//! Concurrency-safe utilities that sit between the request-handling
//! layer and the backing store:
//! - **monitor**: per-call latency recording and health verdicts
//! - **cache**: TTL-bounded result cache with capacity eviction
//! - **limiter**: per-identity sliding-window admission control
//! - **pool**: bounded checkout/return of opaque resource handles
//!
//! The four components are independent; the request-handling layer
//! composes them. Each owns exactly one structure behind one lock,
//! no operation does I/O while holding it, and no component calls
//! another.

pub mod cache;
pub mod infrastructure;
pub mod limiter;
pub mod monitor;
pub mod pool;
pub mod system;

// Re-export commonly used types
pub use cache::TtlCache;
pub use infrastructure::config::Config;
pub use limiter::RateLimiter;
pub use monitor::{HealthReport, PerformanceMonitor};
pub use pool::ResourcePool;
pub use system::{SystemMonitor, SystemStats};

use thiserror::Error;

/// Main error type for the performance layer
#[derive(Error, Debug)]
pub enum PerfError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<infrastructure::config::ConfigError> for PerfError {
    fn from(err: infrastructure::config::ConfigError) -> Self {
        match err {
            infrastructure::config::ConfigError::Invalid(msg) => PerfError::InvalidArgument(msg),
            other => PerfError::Config(other.to_string()),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PerfError>;
