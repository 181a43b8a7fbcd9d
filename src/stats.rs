//! Snapshot store for pool statistics.
//!
//! All metrics use the `poolwatch_` prefix and carry the monitor's label set
//! as const labels.

use crate::status::PoolStatus;
use prometheus::core::Collector;
use prometheus::{Gauge, IntGauge, Opts, Registry};
use std::collections::HashMap;

/// Gauges holding the most recent [`PoolStatus`] sample.
///
/// The gauges are atomic, so the sampling loop may overwrite them while an
/// exporter is rendering. Clones of a gauge share its underlying value.
pub struct PoolStats {
    /// Maximum number of open connections to the pool
    pub max_open_connections: IntGauge,
    /// Established connections, both in use and idle
    pub open_connections: IntGauge,
    /// Connections currently in use
    pub in_use_connections: IntGauge,
    /// Idle connections
    pub idle_connections: IntGauge,
    /// Total number of acquisitions that waited
    pub wait_count: IntGauge,
    /// Total time blocked waiting for a connection
    pub wait_duration_seconds: Gauge,
    /// Connections closed due to the idle-count limit
    pub max_idle_closed: IntGauge,
    /// Connections closed due to the idle-time limit
    pub max_idle_time_closed: IntGauge,
    /// Connections closed due to the lifetime limit
    pub max_lifetime_closed: IntGauge,
}

fn int_gauge(
    name: &str,
    help: &str,
    labels: &HashMap<String, String>,
) -> Result<IntGauge, prometheus::Error> {
    IntGauge::with_opts(Opts::new(name, help).const_labels(labels.clone()))
}

impl PoolStats {
    /// Create a fresh set of gauges bound to `labels`.
    pub fn new(labels: &HashMap<String, String>) -> Result<Self, prometheus::Error> {
        Ok(Self {
            max_open_connections: int_gauge(
                "poolwatch_max_open_connections",
                "Maximum number of open connections to the pool.",
                labels,
            )?,
            open_connections: int_gauge(
                "poolwatch_open_connections",
                "The number of established connections both in use and idle.",
                labels,
            )?,
            in_use_connections: int_gauge(
                "poolwatch_in_use_connections",
                "The number of connections currently in use.",
                labels,
            )?,
            idle_connections: int_gauge(
                "poolwatch_idle_connections",
                "The number of idle connections.",
                labels,
            )?,
            wait_count: int_gauge(
                "poolwatch_wait_count",
                "The total number of connections waited for.",
                labels,
            )?,
            wait_duration_seconds: Gauge::with_opts(
                Opts::new(
                    "poolwatch_wait_duration_seconds",
                    "The total time blocked waiting for a new connection, in seconds.",
                )
                .const_labels(labels.clone()),
            )?,
            max_idle_closed: int_gauge(
                "poolwatch_max_idle_closed",
                "The total number of connections closed due to the idle limit.",
                labels,
            )?,
            max_idle_time_closed: int_gauge(
                "poolwatch_max_idle_time_closed",
                "The total number of connections closed due to the idle time limit.",
                labels,
            )?,
            max_lifetime_closed: int_gauge(
                "poolwatch_max_lifetime_closed",
                "The total number of connections closed due to the lifetime limit.",
                labels,
            )?,
        })
    }

    /// Overwrite every gauge with the values from `status`.
    pub fn set(&self, status: &PoolStatus) {
        self.max_open_connections.set(status.max_open as i64);
        self.open_connections.set(status.open as i64);
        self.in_use_connections.set(status.in_use as i64);
        self.idle_connections.set(status.idle as i64);
        self.wait_count.set(status.wait_count as i64);
        self.wait_duration_seconds
            .set(status.wait_duration.as_secs_f64());
        self.max_idle_closed.set(status.max_idle_closed as i64);
        self.max_idle_time_closed
            .set(status.max_idle_time_closed as i64);
        self.max_lifetime_closed.set(status.max_lifetime_closed as i64);
    }

    /// Fresh collector boxes for every gauge. Each call builds new boxes, so
    /// the same stats can be registered with more than one registry.
    pub fn collectors(&self) -> Vec<Box<dyn Collector>> {
        vec![
            Box::new(self.max_open_connections.clone()),
            Box::new(self.open_connections.clone()),
            Box::new(self.in_use_connections.clone()),
            Box::new(self.idle_connections.clone()),
            Box::new(self.wait_count.clone()),
            Box::new(self.wait_duration_seconds.clone()),
            Box::new(self.max_idle_closed.clone()),
            Box::new(self.max_idle_time_closed.clone()),
            Box::new(self.max_lifetime_closed.clone()),
        ]
    }

    /// Register the gauges with `registry`, replacing any collectors left
    /// behind by a previous generation with the same label set.
    pub fn register(&self, registry: &Registry) -> Result<(), prometheus::Error> {
        for collector in self.collectors() {
            let _ = registry.unregister(collector);
        }
        for collector in self.collectors() {
            registry.register(collector)?;
        }
        Ok(())
    }
}
