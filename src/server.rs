//! Pull exporter: the process-wide `/metrics` endpoint.
//!
//! The endpoint renders the default registry, so one listener serves every
//! monitor attached in the process.

use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use prometheus::TextEncoder;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};

// Only one listener may bind the port, no matter how many monitors ask.
static SERVER_STARTED: AtomicBool = AtomicBool::new(false);

/// Launch the pull endpoint on `port`. Every call after the first in the
/// process is a no-op.
pub(crate) fn spawn(port: u16) {
    if SERVER_STARTED.swap(true, Ordering::SeqCst) {
        return;
    }
    tokio::spawn(serve(port));
}

async fn serve(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let make_svc = make_service_fn(|_conn| async { Ok::<_, hyper::Error>(service_fn(handle)) });

    let builder = match Server::try_bind(&addr) {
        Ok(builder) => builder,
        Err(err) => {
            error!("Failed to bind metrics server on {}: {}", addr, err);
            return;
        }
    };

    info!("Serving pool metrics on http://{}/metrics", addr);
    if let Err(err) = builder.serve(make_svc).await {
        error!("Metrics server error: {}", err);
    }
}

async fn handle(req: Request<Body>) -> Result<Response<Body>, hyper::Error> {
    if req.method() == Method::GET && req.uri().path() == "/metrics" {
        let mut response = Response::new(Body::from(render()));
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(prometheus::TEXT_FORMAT));
        Ok(response)
    } else {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NOT_FOUND;
        Ok(response)
    }
}

/// Render the process-wide registry in the text exposition format.
fn render() -> String {
    TextEncoder::new()
        .encode_to_string(&prometheus::gather())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::IntGauge;

    #[tokio::test]
    async fn test_metrics_route_renders_default_registry() {
        let gauge = IntGauge::new("server_test_entries", "visible through the pull route").unwrap();
        gauge.set(11);
        prometheus::default_registry()
            .register(Box::new(gauge))
            .unwrap();

        let req = Request::builder()
            .method(Method::GET)
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();
        let response = handle(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            HeaderValue::from_static(prometheus::TEXT_FORMAT)
        );

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("server_test_entries 11"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = handle(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_spawn_guard_consumes_once() {
        // No runtime is entered here: the guard must trip before any spawn
        // happens on calls after the first.
        assert!(!SERVER_STARTED.swap(true, Ordering::SeqCst));
        spawn(0);
        assert!(SERVER_STARTED.load(Ordering::SeqCst));
    }
}
