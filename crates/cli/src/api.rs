//! HTTP API for watch-mode health checks and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use anyhow::Context as _;
use chrono::{DateTime, Utc};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::info;

/// Outcome of the most recent watch runs
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStatus {
    pub cluster: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_success: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

/// Shared application state
pub struct WatchState {
    status: RwLock<RunStatus>,
}

impl WatchState {
    pub fn new(cluster: impl Into<String>) -> Self {
        Self {
            status: RwLock::new(RunStatus {
                cluster: cluster.into(),
                ..RunStatus::default()
            }),
        }
    }

    pub async fn record_success(&self, total: u64) {
        let mut status = self.status.write().await;
        status.last_success = Some(Utc::now());
        status.last_total = Some(total);
        status.last_error = None;
        status.consecutive_failures = 0;
    }

    pub async fn record_failure(&self, error: impl Into<String>) {
        let mut status = self.status.write().await;
        status.last_error = Some(error.into());
        status.consecutive_failures += 1;
    }

    pub async fn snapshot(&self) -> RunStatus {
        self.status.read().await.clone()
    }
}

/// Health check - 503 once the latest run has failed
async fn healthz(State(state): State<Arc<WatchState>>) -> impl IntoResponse {
    let status = state.snapshot().await;

    let status_code = if status.consecutive_failures == 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(status))
}

/// Readiness check - 200 after the first successful run
async fn readyz(State(state): State<Arc<WatchState>>) -> impl IntoResponse {
    let status = state.snapshot().await;

    let status_code = if status.last_success.is_some() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(status))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            e.to_string().into_bytes(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<WatchState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Bind the API listener on all interfaces
pub async fn bind(port: u16) -> anyhow::Result<TcpListener> {
    let addr = format!("0.0.0.0:{}", port);
    TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind API server to {addr}"))
}

/// Serve the API on an already bound listener
pub async fn serve(listener: TcpListener, state: Arc<WatchState>) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = ?listener.local_addr().ok(), "Starting API server");
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use space_lib::EstimatorMetrics;
    use tower::ServiceExt;

    async fn get_status(router: Router, path: &str) -> StatusCode {
        router
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_not_ready_before_first_run() {
        let state = Arc::new(WatchState::new("prod"));
        let router = create_router(state);

        assert_eq!(get_status(router.clone(), "/healthz").await, StatusCode::OK);
        assert_eq!(
            get_status(router, "/readyz").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_failure_then_recovery() {
        let state = Arc::new(WatchState::new("prod"));
        let router = create_router(state.clone());

        state.record_failure("remote query failed: throttled").await;
        assert_eq!(
            get_status(router.clone(), "/healthz").await,
            StatusCode::SERVICE_UNAVAILABLE
        );

        state.record_success(7).await;
        assert_eq!(get_status(router.clone(), "/healthz").await, StatusCode::OK);
        assert_eq!(get_status(router, "/readyz").await, StatusCode::OK);

        let status = state.snapshot().await;
        assert_eq!(status.last_total, Some(7));
        assert_eq!(status.consecutive_failures, 0);
    }

    #[tokio::test]
    async fn test_bind_fails_when_port_taken() {
        let taken = bind(0).await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = bind(port).await.unwrap_err();
        assert!(err.to_string().contains(&port.to_string()));
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let _metrics = EstimatorMetrics::new();
        let router = create_router(Arc::new(WatchState::new("prod")));

        assert_eq!(get_status(router, "/metrics").await, StatusCode::OK);
    }
}
