//! Lifecycle coordination for pool monitoring.
//!
//! A [`PoolMonitor`] owns its configuration, the snapshot store, and the
//! once-guards that keep repeated initialization from launching duplicate
//! background activities.

use crate::collector::SharedCollector;
use crate::config::{Config, DEFAULT_HTTP_SERVER_PORT, DEFAULT_REFRESH_INTERVAL};
use crate::error::MonitorError;
use crate::stats::PoolStats;
use crate::status::StatusSource;
use crate::{push, server};
use prometheus::core::Collector;
use prometheus::Registry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Attaches pull- and push-based Prometheus export to a connection pool.
///
/// Clones are shallow and share the same monitor state.
#[derive(Clone)]
pub struct PoolMonitor {
    inner: Arc<Inner>,
}

pub(crate) struct Inner {
    pub(crate) config: Config,
    pub(crate) labels: HashMap<String, String>,
    pub(crate) source: RwLock<Option<Arc<dyn StatusSource>>>,
    pub(crate) stats: RwLock<Option<Arc<PoolStats>>>,
    pub(crate) push_registry: Registry,
    sampling_started: AtomicBool,
    push_started: AtomicBool,
}

impl PoolMonitor {
    /// Build a monitor from `config`, filling in defaults for zero-valued
    /// fields.
    pub fn new(mut config: Config) -> Self {
        if config.refresh_interval == 0 {
            config.refresh_interval = DEFAULT_REFRESH_INTERVAL;
        }
        if config.http_server_port == 0 {
            config.http_server_port = DEFAULT_HTTP_SERVER_PORT;
        }

        let mut labels = HashMap::new();
        if !config.pool_name.is_empty() {
            labels.insert("pool_name".to_string(), config.pool_name.clone());
        }

        Self {
            inner: Arc::new(Inner {
                config,
                labels,
                source: RwLock::new(None),
                stats: RwLock::new(None),
                push_registry: Registry::new(),
                sampling_started: AtomicBool::new(false),
                push_started: AtomicBool::new(false),
            }),
        }
    }

    /// Labels applied to every gauge in the snapshot store.
    pub fn labels(&self) -> &HashMap<String, String> {
        &self.inner.labels
    }

    /// The configuration this monitor runs with, defaults applied.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Attach the monitor to `source` and launch the background activities.
    ///
    /// Safe to call repeatedly: the source is rebound (last call wins for
    /// subsequent samples) and the snapshot store is recreated, while the
    /// sampling loop and push loop each start at most once per monitor and
    /// the pull server at most once per process. The only synchronous failure
    /// is snapshot-store registration; exporter launches report their errors
    /// through the logger.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn initialize(&self, source: Arc<dyn StatusSource>) -> Result<(), MonitorError> {
        *self.inner.source.write().await = Some(source);

        let stats = Arc::new(PoolStats::new(&self.inner.labels)?);
        stats.register(prometheus::default_registry())?;
        stats.register(&self.inner.push_registry)?;
        *self.inner.stats.write().await = Some(stats);

        if self.begin_sampling() {
            self.attach_collectors();
            tokio::spawn(sampling_loop(self.inner.clone()));
        }

        if self.inner.config.start_server {
            server::spawn(self.inner.config.http_server_port);
        }

        if !self.inner.config.push_addr.is_empty() && self.begin_push() {
            tokio::spawn(push::run(self.inner.clone()));
        }

        Ok(())
    }

    /// Consume the sampling once-guard. True only on the first call.
    fn begin_sampling(&self) -> bool {
        !self.inner.sampling_started.swap(true, Ordering::SeqCst)
    }

    /// Consume the push once-guard. True only on the first call.
    fn begin_push(&self) -> bool {
        !self.inner.push_started.swap(true, Ordering::SeqCst)
    }

    /// Gather the collector set and register it with the pull and push
    /// registries. Runs once per monitor.
    fn attach_collectors(&self) {
        for provider in &self.inner.config.collectors {
            for entry in provider.metrics(self) {
                let entry: Arc<dyn Collector> = Arc::from(entry);
                if let Err(err) =
                    prometheus::default_registry().register(Box::new(SharedCollector::new(entry.clone())))
                {
                    warn!("Failed to register extra collector: {}", err);
                }
                if let Err(err) = self
                    .inner
                    .push_registry
                    .register(Box::new(SharedCollector::new(entry)))
                {
                    warn!("Failed to register extra collector for push: {}", err);
                }
            }
        }
    }
}

/// Periodically refresh the snapshot store. The first tick fires immediately
/// so a scrape right after attach already sees real values.
async fn sampling_loop(inner: Arc<Inner>) {
    let period = Duration::from_secs(inner.config.refresh_interval);
    info!("Starting pool sampling loop (interval: {:?})", period);

    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        refresh(&inner).await;
    }
}

async fn refresh(inner: &Inner) {
    let source = inner.source.read().await.clone();
    let Some(source) = source else {
        return;
    };

    match source.status().await {
        Ok(status) => {
            if let Some(stats) = inner.stats.read().await.as_ref() {
                stats.set(&status);
            }
        }
        // the previous snapshot stays in place
        Err(err) => error!("Failed to collect pool status: {}", err),
    }
}
