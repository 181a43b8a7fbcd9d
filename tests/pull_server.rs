use async_trait::async_trait;
use poolwatch::{Config, PoolMonitor, PoolStatus, StatusError, StatusSource};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const PORT: u16 = 19642;

struct MockPool {
    status: Mutex<PoolStatus>,
}

impl MockPool {
    fn new(open: u64, idle: u64) -> Self {
        Self {
            status: Mutex::new(PoolStatus {
                max_open: 10,
                open,
                idle,
                in_use: open - idle,
                ..PoolStatus::default()
            }),
        }
    }

    fn set(&self, open: u64, idle: u64) {
        let mut status = self.status.lock().unwrap();
        status.open = open;
        status.idle = idle;
        status.in_use = open - idle;
    }
}

#[async_trait]
impl StatusSource for MockPool {
    async fn status(&self) -> Result<PoolStatus, StatusError> {
        Ok(*self.status.lock().unwrap())
    }
}

async fn scrape(path: &str) -> reqwest::Response {
    reqwest::get(format!("http://127.0.0.1:{PORT}{path}"))
        .await
        .expect("request to pull endpoint failed")
}

// Single test function: the listener binds once per process, so the whole
// pull lifecycle is exercised in order.
#[tokio::test]
async fn metrics_endpoint_serves_latest_snapshot() {
    let pool = Arc::new(MockPool::new(5, 2));
    let monitor = PoolMonitor::new(Config {
        pool_name: "orders".to_string(),
        refresh_interval: 1,
        start_server: true,
        http_server_port: PORT,
        ..Config::default()
    });
    monitor.initialize(pool.clone()).await.unwrap();

    tokio::time::sleep(Duration::from_millis(500)).await;

    let response = scrape("/metrics").await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response.headers()[reqwest::header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    let body = response.text().await.unwrap();
    assert!(
        body.contains(r#"poolwatch_open_connections{pool_name="orders"} 5"#),
        "scrape missing sampled values:\n{body}"
    );
    assert!(body.contains(r#"poolwatch_idle_connections{pool_name="orders"} 2"#));
    assert!(body.contains(r#"poolwatch_max_open_connections{pool_name="orders"} 10"#));

    // The next tick picks up new values.
    pool.set(7, 1);
    tokio::time::sleep(Duration::from_secs(1)).await;
    let body = scrape("/metrics").await.text().await.unwrap();
    assert!(
        body.contains(r#"poolwatch_open_connections{pool_name="orders"} 7"#),
        "scrape not refreshed:\n{body}"
    );
    assert!(body.contains(r#"poolwatch_idle_connections{pool_name="orders"} 1"#));

    // A second monitor on the same port: no error, no second listener, and
    // its snapshot shows up through the shared registry.
    let other = PoolMonitor::new(Config {
        pool_name: "billing".to_string(),
        refresh_interval: 1,
        start_server: true,
        http_server_port: PORT,
        ..Config::default()
    });
    other
        .initialize(Arc::new(MockPool::new(3, 3)))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(500)).await;
    let body = scrape("/metrics").await.text().await.unwrap();
    assert!(body.contains(r#"poolwatch_open_connections{pool_name="orders"}"#));
    assert!(body.contains(r#"poolwatch_open_connections{pool_name="billing"} 3"#));

    // Only /metrics is routed.
    let response = scrape("/health").await;
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
