use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{models::GenreMap, routes::AppState};

/// Handler for the genre table endpoint
pub async fn list(State(state): State<Arc<AppState>>) -> Json<GenreMap> {
    Json(state.genres.clone())
}
