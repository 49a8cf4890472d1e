use std::sync::Arc;

use crate::{models::GenreMap, services::providers::CatalogProvider};

/// Loads the genre table once at startup
///
/// Without a provider, or when the catalog is unreachable, the service still
/// starts with an empty table; movies then carry no genre names.
pub async fn load_genre_map(provider: Option<Arc<dyn CatalogProvider>>) -> GenreMap {
    let Some(provider) = provider else {
        tracing::warn!("TMDB API key not configured, genre table left empty");
        return GenreMap::default();
    };

    match provider.fetch_genres().await {
        Ok(genres) => {
            tracing::info!(
                genres = genres.len(),
                provider = provider.name(),
                "Genre table loaded"
            );
            genres
        }
        Err(e) => {
            tracing::warn!(error = %e, provider = provider.name(), "Failed to load genre table");
            GenreMap::default()
        }
    }
}
