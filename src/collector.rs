use crate::monitor::PoolMonitor;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use std::sync::Arc;

/// Supplies additional registry entries for a monitor.
///
/// Providers are consulted exactly once, on the first
/// [`initialize`](PoolMonitor::initialize) call; the returned collectors are
/// exposed by both the pull endpoint and the push loop.
pub trait MetricsCollector: Send + Sync {
    fn metrics(&self, monitor: &PoolMonitor) -> Vec<Box<dyn Collector>>;
}

/// Lets one collector instance be registered with several registries.
pub(crate) struct SharedCollector(Arc<dyn Collector>);

impl SharedCollector {
    pub(crate) fn new(inner: Arc<dyn Collector>) -> Self {
        Self(inner)
    }
}

impl Collector for SharedCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.0.desc()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.0.collect()
    }
}
