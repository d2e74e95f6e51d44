// HTTP surface - axum router, shared state and the JSON envelope

pub mod handlers;

use crate::config::AppConfig;
use crate::error::{DirectoryError, Result};
use crate::import::PageFetcher;
use crate::store::RecordStore;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    pub fetcher: PageFetcher,
    pub free_results: usize,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(AppState {
            store: RecordStore::new(&config.store),
            fetcher: PageFetcher::new(config.fetch_timeout)?,
            free_results: config.free_results,
        })
    }
}

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn err(message: String) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message),
        }
    }
}

impl DirectoryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::Validation { .. } | DirectoryError::InvalidUrl { .. } => {
                StatusCode::BAD_REQUEST
            }
            DirectoryError::Fetch { .. } => StatusCode::BAD_GATEWAY,
            DirectoryError::Io(_) | DirectoryError::Serialize(_) | DirectoryError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if matches!(
            self,
            DirectoryError::Io(_) | DirectoryError::Serialize(_) | DirectoryError::Config(_)
        ) {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ApiResponse::err(self.to_string()))).into_response()
    }
}

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/vendor", post(handlers::submit_vendor))
        .route("/vendor/manual", post(handlers::submit_manual_vendor))
        .route("/vendor/import/preview", post(handlers::import_preview))
        .route("/faculty/manual", post(handlers::submit_faculty))
        .route("/search", get(handlers::search_vendors))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
