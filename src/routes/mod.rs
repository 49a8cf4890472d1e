use axum::{http::HeaderValue, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{
    config::RankingSettings,
    error::{AppError, AppResult},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    models::GenreMap,
    services::CatalogProvider,
};

pub mod genres;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    /// Absent when no TMDB API key is configured
    pub catalog: Option<Arc<dyn CatalogProvider>>,
    /// Genre table loaded at startup
    pub genres: GenreMap,
    pub ranking: RankingSettings,
}

impl AppState {
    pub fn new(
        catalog: Option<Arc<dyn CatalogProvider>>,
        genres: GenreMap,
        ranking: RankingSettings,
    ) -> Self {
        Self {
            catalog,
            genres,
            ranking,
        }
    }

    pub fn catalog(&self) -> AppResult<Arc<dyn CatalogProvider>> {
        self.catalog
            .clone()
            .ok_or_else(|| AppError::Configuration("TMDB API key not configured.".to_string()))
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/genres", get(genres::list))
        .route(
            "/recommendations/:movie_title",
            get(recommendations::recommend),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(cors_layer(cors_origins))
}

/// CORS for the configured front-end origins, with credentials
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            // a wildcard cannot be combined with credentials
            Ok(value) if value == "*" => {
                tracing::warn!("Ignoring wildcard CORS origin");
                None
            }
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
