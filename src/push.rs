//! Push exporter: periodic delivery of the instance registry to a
//! Pushgateway.
//!
//! A failed push is dropped; the next tick sends fresh data. No retries, no
//! queueing.

use crate::monitor::Inner;
use prometheus::TextEncoder;
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

pub(crate) async fn run(inner: Arc<Inner>) {
    let url = push_url(&inner.config.push_addr, &inner.config.pool_name);
    let period = Duration::from_secs(inner.config.refresh_interval);
    info!("Starting metrics push loop to {} (interval: {:?})", url, period);

    let client = reqwest::Client::new();
    let encoder = TextEncoder::new();

    loop {
        tokio::time::sleep(period).await;

        let metric_families = inner.push_registry.gather();
        let body = match encoder.encode_to_string(&metric_families) {
            Ok(body) => body,
            Err(err) => {
                warn!("Failed to encode metrics for push: {}", err);
                continue;
            }
        };

        match client
            .put(url.as_str())
            .header(CONTENT_TYPE, prometheus::TEXT_FORMAT)
            .body(body)
            .send()
            .await
        {
            Ok(response) if !response.status().is_success() => {
                warn!("Push gateway returned {} for {}", response.status(), url);
            }
            Ok(_) => {}
            Err(err) => error!("Failed to push metrics: {}", err),
        }
    }
}

/// Pushgateway grouping URL for this pool. The job segment falls back to the
/// crate name when no pool name is configured.
fn push_url(addr: &str, pool_name: &str) -> String {
    let job = if pool_name.is_empty() {
        env!("CARGO_PKG_NAME")
    } else {
        pool_name
    };
    format!("{}/metrics/job/{}", addr.trim_end_matches('/'), job)
}
