//! Monitor configuration.
//!
//! Configuration is immutable once a [`PoolMonitor`](crate::monitor::PoolMonitor)
//! has been constructed; zero-valued fields are replaced with defaults at
//! construction time.

use crate::collector::MetricsCollector;
use std::env;
use std::fmt;

/// Default sampling/push interval, matching the Prometheus scrape default.
pub const DEFAULT_REFRESH_INTERVAL: u64 = 15;

/// Default port for the pull endpoint.
pub const DEFAULT_HTTP_SERVER_PORT: u16 = 8080;

/// Configuration for a [`PoolMonitor`](crate::monitor::PoolMonitor).
pub struct Config {
    /// Label applied to every snapshot gauge; empty means unlabeled.
    pub pool_name: String,
    /// Sampling and push interval in seconds; 0 selects the default.
    pub refresh_interval: u64,
    /// Pushgateway base address; empty disables the push loop.
    pub push_addr: String,
    /// Whether to start the process-wide pull endpoint.
    pub start_server: bool,
    /// Pull endpoint port; 0 selects the default.
    pub http_server_port: u16,
    /// Extra collector providers, consulted on the first initialize.
    pub collectors: Vec<Box<dyn MetricsCollector>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pool_name: String::new(),
            refresh_interval: 0,
            push_addr: String::new(),
            start_server: false,
            http_server_port: 0,
            collectors: Vec::new(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("pool_name", &self.pool_name)
            .field("refresh_interval", &self.refresh_interval)
            .field("push_addr", &self.push_addr)
            .field("start_server", &self.start_server)
            .field("http_server_port", &self.http_server_port)
            .field("collectors", &self.collectors.len())
            .finish()
    }
}

impl Config {
    /// Load configuration from `POOLWATCH_*` environment variables, falling
    /// back to the documented defaults.
    pub fn from_env() -> Self {
        Self {
            pool_name: env::var("POOLWATCH_POOL_NAME").unwrap_or_default(),
            refresh_interval: env::var("POOLWATCH_REFRESH_INTERVAL")
                .unwrap_or_else(|_| DEFAULT_REFRESH_INTERVAL.to_string())
                .parse::<u64>()
                .unwrap_or(DEFAULT_REFRESH_INTERVAL),
            push_addr: env::var("POOLWATCH_PUSH_ADDR").unwrap_or_default(),
            start_server: env::var("POOLWATCH_START_SERVER")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<bool>()
                .unwrap_or(false),
            http_server_port: env::var("POOLWATCH_HTTP_SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_HTTP_SERVER_PORT.to_string())
                .parse::<u16>()
                .unwrap_or(DEFAULT_HTTP_SERVER_PORT),
            collectors: Vec::new(),
        }
    }
}
