use crate::error::StatusError;
use async_trait::async_trait;
use std::time::Duration;

/// Point-in-time statistics for a connection pool.
///
/// Fields a pool implementation does not track are left at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStatus {
    /// Maximum number of open connections allowed by the pool.
    pub max_open: u64,
    /// Established connections, both in use and idle.
    pub open: u64,
    /// Connections currently handed out.
    pub in_use: u64,
    /// Connections sitting idle in the pool.
    pub idle: u64,
    /// Total number of acquisitions that had to wait.
    pub wait_count: u64,
    /// Total time spent blocked waiting for a connection.
    pub wait_duration: Duration,
    /// Connections closed because of the idle-count limit.
    pub max_idle_closed: u64,
    /// Connections closed because of the idle-time limit.
    pub max_idle_time_closed: u64,
    /// Connections closed because of the lifetime limit.
    pub max_lifetime_closed: u64,
}

/// The boundary to the monitored resource.
///
/// The sampling loop calls [`status`](StatusSource::status) on every tick; a
/// returned error leaves the previously published snapshot untouched.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn status(&self) -> Result<PoolStatus, StatusError>;
}
