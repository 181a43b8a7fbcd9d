use thiserror::Error;

/// Errors reported by a [`StatusSource`](crate::status::StatusSource) when a
/// sampling tick cannot produce a snapshot.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("pool is closed")]
    Closed,

    #[error("pool status unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Errors surfaced synchronously from [`PoolMonitor::initialize`](crate::monitor::PoolMonitor::initialize).
///
/// Everything that happens after the background activities are launched is
/// logged instead of propagated.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("failed to register pool statistics: {0}")]
    Registration(#[from] prometheus::Error),
}
