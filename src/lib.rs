//! Pull- and push-based Prometheus export for connection pool statistics.
//!
//! A [`PoolMonitor`] attaches to a long-lived pool through the
//! [`StatusSource`] trait, samples its statistics on a timer, and exposes the
//! latest snapshot two ways:
//!
//! 1. **Pull**: a process-wide `GET /metrics` endpoint scraped on demand
//! 2. **Push** (optional): periodic delivery to a Prometheus Pushgateway
//!
//! Initialization is idempotent; re-attaching never launches duplicate
//! timers, push loops, or listeners.
//!
//! ```no_run
//! use poolwatch::{Config, PoolMonitor};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = sqlx::sqlite::SqlitePoolOptions::new()
//!     .connect("sqlite::memory:")
//!     .await?;
//!
//! let monitor = PoolMonitor::new(Config {
//!     pool_name: "orders".to_string(),
//!     start_server: true,
//!     ..Config::default()
//! });
//! monitor.initialize(Arc::new(pool)).await?;
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod monitor;
mod push;
mod server;
pub mod stats;
pub mod status;

#[cfg(feature = "sqlx")]
pub mod sqlx;

pub use collector::MetricsCollector;
pub use config::{Config, DEFAULT_HTTP_SERVER_PORT, DEFAULT_REFRESH_INTERVAL};
pub use error::{MonitorError, StatusError};
pub use monitor::PoolMonitor;
pub use stats::PoolStats;
pub use status::{PoolStatus, StatusSource};
