//! Movie catalog provider abstraction
//!
//! The recommendation flow only needs four things from a catalog: title
//! search, a candidate listing for a movie, the director of a movie and the
//! genre table. TMDB is the only provider today.
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{GenreMap, ItemId, TmdbMovie},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search movies by title, best match first
    async fn search_movies(&self, query: &str) -> AppResult<Vec<TmdbMovie>>;

    /// Candidate movies related to `movie_id`
    async fn fetch_recommendations(&self, movie_id: ItemId) -> AppResult<Vec<TmdbMovie>>;

    /// Director credited on `movie_id`, if any
    async fn fetch_director(&self, movie_id: ItemId) -> AppResult<Option<String>>;

    /// Genre id → name table
    async fn fetch_genres(&self) -> AppResult<GenreMap>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Looks up directors for many movies in parallel
///
/// A failed lookup degrades to `None` for that movie; the rest still resolve.
pub async fn fetch_directors(
    provider: Arc<dyn CatalogProvider>,
    movie_ids: Vec<ItemId>,
) -> HashMap<ItemId, Option<String>> {
    let mut tasks = Vec::with_capacity(movie_ids.len());

    for movie_id in movie_ids {
        let provider = provider.clone();
        let task = tokio::spawn(async move { (movie_id, provider.fetch_director(movie_id).await) });
        tasks.push((movie_id, task));
    }

    let mut directors = HashMap::new();
    let mut failures = 0usize;

    for (movie_id, task) in tasks {
        let director = match task.await {
            Ok((_, Ok(director))) => director,
            Ok((_, Err(e))) => {
                tracing::warn!(movie_id, error = %e, "Director lookup failed");
                failures += 1;
                None
            }
            Err(e) => {
                tracing::error!(movie_id, error = %e, "Director lookup task join error");
                failures += 1;
                None
            }
        };
        directors.insert(movie_id, director);
    }

    if failures > 0 {
        tracing::warn!(
            provider = provider.name(),
            success_count = directors.len() - failures,
            error_count = failures,
            "Partial director lookup failure"
        );
    }

    directors
}
