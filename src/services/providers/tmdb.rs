//! TMDB catalog provider
//!
//! Endpoints used:
//! 1. `/search/movie` for the title the user typed
//! 2. `/movie/{id}/recommendations` for candidate movies
//! 3. `/movie/{id}/credits` for the director
//! 4. `/genre/movie/list` for genre names
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{GenreMap, ItemId, TmdbCredits, TmdbGenreList, TmdbMovie, TmdbPage},
    services::providers::CatalogProvider,
};

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const RECOMMENDATIONS_CACHE_TTL: u64 = 21600; // 6 hours
const DIRECTOR_CACHE_TTL: u64 = 604800; // 1 week
const GENRES_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            cache,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// GET a TMDB endpoint with the api key and language attached
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = self.endpoint(path);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(extra)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<TmdbMovie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch(self.language.clone(), query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let page: TmdbPage = self.get_json("search/movie", &[("query", query)]).await?;

                tracing::info!(
                    query = %query,
                    results = page.results.len(),
                    provider = self.name(),
                    "Movie search completed"
                );

                Ok::<_, AppError>(page.results)
            }
        )
    }

    async fn fetch_recommendations(&self, movie_id: ItemId) -> AppResult<Vec<TmdbMovie>> {
        cached!(
            self.cache,
            CacheKey::Recommendations(self.language.clone(), movie_id),
            RECOMMENDATIONS_CACHE_TTL,
            async move {
                let path = format!("movie/{}/recommendations", movie_id);
                let page: TmdbPage = self.get_json(&path, &[]).await?;

                tracing::info!(
                    movie_id,
                    candidates = page.results.len(),
                    provider = self.name(),
                    "Recommendations fetched"
                );

                Ok::<_, AppError>(page.results)
            }
        )
    }

    async fn fetch_director(&self, movie_id: ItemId) -> AppResult<Option<String>> {
        cached!(
            self.cache,
            CacheKey::Director(movie_id),
            DIRECTOR_CACHE_TTL,
            async move {
                let path = format!("movie/{}/credits", movie_id);
                let credits: TmdbCredits = self.get_json(&path, &[]).await?;
                let director = credits.director();

                tracing::debug!(movie_id, director = ?director, "Credits fetched");

                Ok::<_, AppError>(director)
            }
        )
    }

    async fn fetch_genres(&self) -> AppResult<GenreMap> {
        cached!(
            self.cache,
            CacheKey::Genres(self.language.clone()),
            GENRES_CACHE_TTL,
            async move {
                let list: TmdbGenreList = self.get_json("genre/movie/list", &[]).await?;
                let genres = GenreMap::from(list);

                tracing::info!(
                    genres = genres.len(),
                    language = %self.language,
                    provider = self.name(),
                    "Genre table fetched"
                );

                Ok::<_, AppError>(genres)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
