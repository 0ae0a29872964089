//! Performance layer service host
//!
//! # Architecture
//! - **monitor / cache / limiter / pool**: concurrency-safe core shared
//!   with the request-handling layer
//! - **system**: host resource snapshots for the health report
//! - **infrastructure**: cold path (logging, config, status API)
//!
//! The binary hosts the status API; the embedding application builds
//! its cache, limiter and pool from the same [`Config`] and shares the
//! monitor by `Arc`.

use perfkit::infrastructure::{logging::init_logging, start_server, Config};
use perfkit::{PerformanceMonitor, Result, SystemMonitor};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Keep guards alive so file appenders flush until exit
    let _guards = init_logging();

    let config = Config::load()?;

    // Process-wide instances, constructed once and passed by shared
    // reference. Nothing here is global mutable state.
    let monitor = Arc::new(PerformanceMonitor::new());
    let system = Arc::new(SystemMonitor::new());

    tracing::info!("Starting performance status API on port {}", config.api.port);
    start_server(monitor, system, &config.api).await
}
