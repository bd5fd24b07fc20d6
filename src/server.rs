//! HTTP surface of the travel search service.
//!
//! ## Endpoints
//!
//! - `POST /search`: aggregated, ranked listings for the given criteria
//! - `GET /health`: liveness probe
//!
//! Any other route answers `404 {"error": "Route not found"}`.

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use bounce_search::{Aggregator, SearchCriteria, SearchError, SearchResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{Instrument, info};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::{BounceError, Result};

/// Error body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error category.
    pub error: String,
    /// Human-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response from the `GET /health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"OK"`.
    pub status: String,
    /// RFC 3339 time the probe was answered.
    pub timestamp: String,
    /// Service version.
    pub version: String,
}

/// Shared state for axum handlers.
#[derive(Clone)]
struct AppState {
    aggregator: Arc<Aggregator>,
}

/// Build the service router around `aggregator`.
pub fn router(aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route("/search", post(handle_search))
        .route("/health", get(handle_health))
        .fallback(handle_not_found)
        .with_state(AppState { aggregator })
}

/// Travel search HTTP server running on a background task.
pub struct SearchServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl SearchServer {
    /// Start the search server.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for auto-assign)
    /// and begins serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns [`BounceError::Server`] if the TCP listener cannot bind.
    pub async fn start(aggregator: Aggregator, config: &ServerConfig) -> Result<Self> {
        let app = router(Arc::new(aggregator));

        let listener = TcpListener::bind(config.bind_addr())
            .await
            .map_err(|e| BounceError::Server(format!("bind to {} failed: {e}", config.bind_addr())))?;

        let addr = listener
            .local_addr()
            .map_err(|e| BounceError::Server(format!("failed to get local addr: {e}")))?;

        info!("search server listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("search server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for SearchServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn error_response(status: StatusCode, error: &str, message: Option<String>) -> Response {
    let body = ErrorResponse {
        error: error.to_owned(),
        message,
    };
    (status, Json(body)).into_response()
}

/// `POST /search`: fan the criteria out to every provider.
async fn handle_search(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SearchCriteria>, JsonRejection>,
) -> Response {
    let span = tracing::info_span!("search", request_id = %Uuid::new_v4());
    async move {
        let criteria = match payload {
            Ok(Json(criteria)) => criteria,
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "malformed search request");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "Invalid search request",
                    Some(rejection.body_text()),
                );
            }
        };

        match state.aggregator.search(&criteria).await {
            Ok(result) => {
                log_result(&result);
                Json(result).into_response()
            }
            Err(SearchError::Validation(message)) => {
                tracing::debug!(%message, "search criteria rejected");
                error_response(StatusCode::BAD_REQUEST, "Invalid search request", Some(message))
            }
            Err(err) => {
                tracing::error!(error = %err, "search failed");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    Some(err.to_string()),
                )
            }
        }
    }
    .instrument(span)
    .await
}

fn log_result(result: &SearchResult) {
    info!(
        listings = result.len(),
        highlights = result.highlights.len(),
        "search answered"
    );
}

/// `GET /health`: liveness probe.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_owned(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

async fn handle_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Route not found", None)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn error_response_omits_missing_message() {
        let body = ErrorResponse {
            error: "Route not found".into(),
            message: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Route not found"}));
    }

    #[tokio::test]
    async fn health_reports_ok_and_version() {
        let Json(health) = handle_health().await;
        assert_eq!(health.status, "OK");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
        assert!(chrono::DateTime::parse_from_rfc3339(&health.timestamp).is_ok());
    }

    #[tokio::test]
    async fn not_found_status() {
        let response = handle_not_found().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn start_on_port_zero_assigns_port() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        };
        let aggregator = Aggregator::new(&bounce_search::SearchConfig::default());
        let server = SearchServer::start(aggregator, &config).await.unwrap();
        assert_ne!(server.port(), 0);
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
        server.shutdown();
    }

    #[tokio::test]
    async fn bind_failure_is_server_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: taken.local_addr().unwrap().port(),
        };
        let aggregator = Aggregator::new(&bounce_search::SearchConfig::default());
        let err = SearchServer::start(aggregator, &config).await.err().unwrap();
        assert!(matches!(err, BounceError::Server(_)));
    }
}
