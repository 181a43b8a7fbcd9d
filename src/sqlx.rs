//! [`StatusSource`] implementation for sqlx connection pools.
//!
//! sqlx does not track wait or close counters, so those fields report zero.

use crate::error::StatusError;
use crate::status::{PoolStatus, StatusSource};
use async_trait::async_trait;
use ::sqlx::{Database, Pool};

#[async_trait]
impl<DB: Database> StatusSource for Pool<DB> {
    async fn status(&self) -> Result<PoolStatus, StatusError> {
        if self.is_closed() {
            return Err(StatusError::Closed);
        }

        let open = u64::from(self.size());
        let idle = self.num_idle() as u64;
        Ok(PoolStatus {
            max_open: u64::from(self.options().get_max_connections()),
            open,
            in_use: open.saturating_sub(idle),
            idle,
            ..PoolStatus::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_sqlite_pool_status() {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory pool");

        let conn = pool.acquire().await.expect("failed to acquire connection");
        let status = pool.status().await.expect("failed to read pool status");

        assert_eq!(status.max_open, 5);
        assert!(status.in_use >= 1);
        assert_eq!(status.in_use + status.idle, status.open);

        drop(conn);
    }

    #[tokio::test]
    async fn test_closed_pool_reports_error() {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory pool");
        pool.close().await;

        assert!(matches!(pool.status().await, Err(StatusError::Closed)));
    }
}
