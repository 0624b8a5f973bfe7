//! REST API endpoints.
//!
//! Axum-based HTTP API that turns a match page URL into a ranked
//! player list.

pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::extract::{ExtractError, MatchStatsExtractor};
use crate::fetch::{DocumentSource, FetchError};
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Fetch(FetchError::InvalidUrl(msg)) => ApiError::BadRequest(msg),
            other => {
                error!("Match extraction failed: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

/// Build the API router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(routes::health::health))
        .route(
            "/api/v1/process-match",
            post(routes::matches::process_match),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Ignoring invalid CORS origin: {}", origin);
            layer
        }
    }
}

/// The HTTP server, built explicitly from its configuration.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    pub fn new(config: ServerConfig, source: Arc<dyn DocumentSource>) -> Self {
        let state = AppState {
            extractor: Arc::new(MatchStatsExtractor::new(source)),
        };
        Self { config, state }
    }

    /// Full router with CORS applied.
    pub fn router(&self) -> Router {
        build_router(self.state.clone()).layer(cors_layer(&self.config.cors_origin))
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> std::io::Result<()> {
        let app = self.router();
        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Listening on http://{}", addr);
        axum::serve(listener, app).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticSource;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    #[test]
    fn test_invalid_url_maps_to_bad_request() {
        let err: ApiError = ExtractError::Fetch(FetchError::InvalidUrl("nope".to_string())).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_fetch_failure_maps_to_internal() {
        let err: ApiError = ExtractError::Fetch(FetchError::HttpStatus {
            status: 502,
            message: "Bad Gateway".to_string(),
        })
        .into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_error_response_status() {
        let resp = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = ApiError::BadRequest("bad".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_server_router_sets_cors_header() {
        let server = Server::new(
            ServerConfig {
                cors_origin: "https://app.example.com".to_string(),
                ..ServerConfig::default()
            },
            Arc::new(StaticSource::new("")),
        );

        let resp = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("origin", "https://app.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("https://app.example.com")
        );
    }
}
