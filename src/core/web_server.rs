//! Keep-alive HTTP server.
//!
//! Hosting platforms ping the bot's port to decide whether the process is
//! alive. Serves:
//! - `/`        - plain-text liveness banner
//! - `/health`  - JSON status with uptime and active backend
//! - `/metrics` - Prometheus metrics

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

use super::error::AppResult;
use super::metrics;

pub const BANNER: &str = "🤖 TeraBox bot is running";

#[derive(Clone)]
struct ServerState {
    start_time: Instant,
    backend: &'static str,
}

/// Builds the router; exposed separately so tests can serve it on an ephemeral port.
///
/// `/health` reports uptime relative to `start_time`.
pub fn router(backend: &'static str, start_time: Instant) -> Router {
    let state = ServerState { start_time, backend };

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(Arc::new(state))
}

/// Binds `0.0.0.0:port` and serves until `shutdown` resolves.
pub async fn start_web_server(
    port: u16,
    backend: &'static str,
    start_time: Instant,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> AppResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;

    log::info!("Starting keep-alive server on http://{}", addr);
    log::info!("  /        - Liveness banner");
    log::info!("  /health  - Health check (JSON)");
    log::info!("  /metrics - Prometheus metrics");

    serve(listener, backend, start_time, shutdown).await
}

/// Serves the router on an already bound listener.
pub async fn serve(
    listener: TcpListener,
    backend: &'static str,
    start_time: Instant,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> AppResult<()> {
    axum::serve(listener, router(backend, start_time))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn root_handler() -> &'static str {
    BANNER
}

async fn health_handler(State(state): State<Arc<ServerState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "backend": state.backend,
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn metrics_handler() -> Response {
    match metrics::gather_text() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            log::error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to encode metrics: {}", e)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    async fn spawn_server() -> (String, oneshot::Sender<()>) {
        spawn_server_started_at(Instant::now()).await
    }

    async fn spawn_server_started_at(start_time: Instant) -> (String, oneshot::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            serve(listener, "api", start_time, async {
                let _ = rx.await;
            })
            .await
            .unwrap();
        });

        (format!("http://{}", addr), tx)
    }

    #[tokio::test]
    async fn test_root_banner() {
        let (base, _shutdown) = spawn_server().await;
        let body = reqwest::get(&base).await.unwrap().text().await.unwrap();
        assert_eq!(body, BANNER);
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let (base, _shutdown) = spawn_server().await;
        let health: serde_json::Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(health["status"], "ok");
        assert_eq!(health["backend"], "api");
        assert!(health["uptime_seconds"].is_u64());
    }

    #[tokio::test]
    async fn test_health_uptime_counts_from_given_start() {
        let Some(start_time) = Instant::now().checked_sub(Duration::from_secs(90)) else {
            return;
        };
        let (base, _shutdown) = spawn_server_started_at(start_time).await;
        let health: serde_json::Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert!(health["uptime_seconds"].as_u64().unwrap() >= 90);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        metrics::init_metrics();
        let (base, _shutdown) = spawn_server().await;
        let response = reqwest::get(format!("{}/metrics", base)).await.unwrap();

        assert!(response.status().is_success());
        let body = response.text().await.unwrap();
        assert!(body.contains("terabox_browser_sessions_active"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (base, _shutdown) = spawn_server().await;
        let response = reqwest::get(format!("{}/nope", base)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
