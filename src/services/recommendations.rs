use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    config::RankingSettings,
    error::{AppError, AppResult},
    graph::{build_graph, rank_from, Deadline, RankOptions, SearchError},
    models::{GenreMap, ItemId, ItemRecord, Movie, RecommendationResponse, RecommendedMovie},
    services::providers::{fetch_directors, CatalogProvider},
};

/// Recommends movies related to the best match for `title`
///
/// The searched movie and the catalog's candidates become a genre-similarity
/// graph; candidates are ordered by A* path cost from the searched movie and
/// only reachable ones are returned, at most `settings.top_k`.
pub async fn recommend_for_title(
    provider: Arc<dyn CatalogProvider>,
    genres: &GenreMap,
    title: &str,
    settings: RankingSettings,
) -> AppResult<RecommendationResponse> {
    let start = Instant::now();
    let title = title.trim();

    if title.is_empty() {
        return Err(AppError::InvalidInput(
            "Movie title cannot be empty".to_string(),
        ));
    }

    // 1. Resolve the searched movie
    let searched = provider
        .search_movies(title)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("Movie '{}' not found.", title)))?;

    tracing::info!(
        query = %title,
        movie_id = searched.id,
        movie = %searched.title,
        "Searched movie resolved"
    );

    // 2. Candidate movies
    let candidates: Vec<_> = provider
        .fetch_recommendations(searched.id)
        .await?
        .into_iter()
        .filter(|candidate| candidate.id != searched.id)
        .collect();

    // 3. Directors for everything that enters the graph
    let mut movie_ids = vec![searched.id];
    movie_ids.extend(candidates.iter().map(|c| c.id));
    movie_ids.sort_unstable();
    movie_ids.dedup();
    let directors = fetch_directors(provider.clone(), movie_ids).await;
    let director_of = |id: ItemId| directors.get(&id).cloned().flatten();

    let searched_director = director_of(searched.id);
    let searched_movie = Movie::from_tmdb(searched, genres, searched_director);
    let candidate_movies: Vec<Movie> = candidates
        .into_iter()
        .map(|raw| {
            let director = director_of(raw.id);
            Movie::from_tmdb(raw, genres, director)
        })
        .collect();

    // 4. Graph + ranking off the async runtime
    let options = RankOptions {
        top_k: settings.top_k,
        deadline: Deadline::after(settings.timeout),
        parallel: settings.parallel,
    };
    // dropping this future (client gone) stops the blocking ranking at its next check
    let _cancel_on_drop = CancelOnDrop(options.deadline.clone());
    let searched_for_ranking = searched_movie.clone();
    let recommendations = tokio::task::spawn_blocking(move || {
        rank_movies(&searched_for_ranking, candidate_movies, &options)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Ranking task failed: {}", e)))??;

    tracing::info!(
        movie_id = searched_movie.id,
        recommendations = recommendations.len(),
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendations ranked"
    );

    Ok(RecommendationResponse {
        searched_movie,
        recommendations,
    })
}

/// Cancels the wrapped deadline when dropped
struct CancelOnDrop(Deadline);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Ranks `candidates` by path cost from `searched` in the similarity graph
///
/// Candidates sharing an id collapse to the last one seen, matching the graph
/// builder.
pub fn rank_movies(
    searched: &Movie,
    candidates: Vec<Movie>,
    options: &RankOptions,
) -> Result<Vec<RecommendedMovie>, SearchError> {
    let mut records = Vec::with_capacity(candidates.len() + 1);
    records.push(ItemRecord::from(searched));
    records.extend(candidates.iter().map(ItemRecord::from));

    let graph = build_graph(&records);
    let ranked = rank_from(&graph, searched.id, options)?;

    let mut by_id: HashMap<_, Movie> = candidates.into_iter().map(|m| (m.id, m)).collect();

    Ok(ranked
        .into_iter()
        .filter_map(|item| {
            by_id.remove(&item.id).map(|movie| RecommendedMovie {
                movie,
                cost: item.cost,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TmdbMovie;
    use crate::services::providers::MockCatalogProvider;
    use std::time::Duration;

    fn raw(id: u64, title: &str, genre_ids: &[u32]) -> TmdbMovie {
        TmdbMovie {
            id,
            title: title.to_string(),
            overview: None,
            poster_path: None,
            release_date: None,
            vote_average: None,
            genre_ids: genre_ids.to_vec(),
            popularity: Some(10.0),
        }
    }

    fn movie(id: u64, genre_ids: &[u32], director: Option<&str>) -> Movie {
        Movie::from_tmdb(
            raw(id, &format!("Movie {id}"), genre_ids),
            &GenreMap::default(),
            director.map(str::to_string),
        )
    }

    fn settings() -> RankingSettings {
        RankingSettings {
            top_k: 12,
            timeout: Duration::from_secs(5),
            parallel: false,
        }
    }

    #[test]
    fn test_rank_movies_orders_by_cost() {
        let searched = movie(1, &[28, 12, 878], None);
        let candidates = vec![
            movie(2, &[878], None),
            movie(3, &[28, 12, 878], None),
            movie(4, &[10749], None),
            movie(5, &[28, 12], None),
        ];

        let ranked = rank_movies(&searched, candidates, &RankOptions::default()).unwrap();
        let ids: Vec<u64> = ranked.iter().map(|r| r.movie.id).collect();

        assert_eq!(ids, vec![3, 5, 2]);
        assert_eq!(ranked[1].cost, 0.5);
    }

    #[test]
    fn test_rank_movies_respects_top_k() {
        let searched = movie(1, &[18], None);
        let candidates = (2..20).map(|id| movie(id, &[18], None)).collect();
        let options = RankOptions {
            top_k: 4,
            ..RankOptions::default()
        };

        let ranked = rank_movies(&searched, candidates, &options).unwrap();
        let ids: Vec<u64> = ranked.iter().map(|r| r.movie.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_rank_movies_duplicate_candidates_collapse() {
        let searched = movie(1, &[18], None);
        let candidates = vec![movie(2, &[18], None), movie(2, &[18, 35], None)];

        let ranked = rank_movies(&searched, candidates, &RankOptions::default()).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].movie.genre_ids, vec![18, 35]);
    }

    #[tokio::test]
    async fn test_recommend_for_title_happy_path() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_search_movies()
            .returning(|_| Ok(vec![raw(10, "Duna", &[878, 12]), raw(11, "Duna 2", &[878])]));
        mock.expect_fetch_recommendations().returning(|id| {
            assert_eq!(id, 10);
            Ok(vec![
                raw(20, "Blade Runner 2049", &[878]),
                raw(21, "Mad Max", &[12, 878]),
                raw(22, "Amélie", &[35]),
                raw(10, "Duna", &[878, 12]),
            ])
        });
        mock.expect_fetch_director().returning(|id| match id {
            10 | 20 => Ok(Some("Denis Villeneuve".to_string())),
            21 => Ok(Some("George Miller".to_string())),
            _ => Ok(None),
        });
        mock.expect_name().return_const("mock");

        let genres = GenreMap::from_pairs([(878, "Ficção científica"), (12, "Aventura")]);
        let response = recommend_for_title(Arc::new(mock), &genres, " Duna ", settings())
            .await
            .unwrap();

        assert_eq!(response.searched_movie.id, 10);
        assert_eq!(
            response.searched_movie.director.as_deref(),
            Some("Denis Villeneuve")
        );
        assert_eq!(response.searched_movie.genre, vec!["Ficção científica", "Aventura"]);

        let ids: Vec<u64> = response.recommendations.iter().map(|r| r.movie.id).collect();
        assert_eq!(ids, vec![21, 20]);
        assert_eq!(response.recommendations[0].cost, 0.5);
        assert_eq!(response.recommendations[1].cost, 1.0);
        assert_eq!(
            response.recommendations[0].movie.director.as_deref(),
            Some("George Miller")
        );
    }

    #[tokio::test]
    async fn test_recommend_for_title_not_found() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_search_movies().returning(|_| Ok(vec![]));

        let result =
            recommend_for_title(Arc::new(mock), &GenreMap::default(), "Nada", settings()).await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Movie 'Nada' not found."),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_recommend_for_title_rejects_blank_title() {
        let mock = MockCatalogProvider::new();
        let result =
            recommend_for_title(Arc::new(mock), &GenreMap::default(), "  ", settings()).await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_recommend_for_title_propagates_upstream_failure() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_search_movies()
            .returning(|_| Ok(vec![raw(10, "Duna", &[878])]));
        mock.expect_fetch_recommendations()
            .returning(|_| Err(AppError::ExternalApi("TMDB returned status 500".to_string())));

        let result =
            recommend_for_title(Arc::new(mock), &GenreMap::default(), "Duna", settings()).await;

        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_recommend_for_title_expired_deadline() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_search_movies()
            .returning(|_| Ok(vec![raw(10, "Duna", &[878])]));
        mock.expect_fetch_recommendations()
            .returning(|_| Ok(vec![raw(20, "Blade Runner", &[878])]));
        mock.expect_fetch_director().returning(|_| Ok(None));
        mock.expect_name().return_const("mock");

        let settings = RankingSettings {
            timeout: Duration::ZERO,
            ..settings()
        };
        let result =
            recommend_for_title(Arc::new(mock), &GenreMap::default(), "Duna", settings).await;

        assert!(matches!(
            result,
            Err(AppError::Search(SearchError::DeadlineExceeded))
        ));
    }

    #[test]
    fn test_cancel_on_drop_cancels_shared_deadline() {
        let deadline = Deadline::after(Duration::from_secs(60));
        drop(CancelOnDrop(deadline.clone()));
        assert_eq!(deadline.check(), Err(SearchError::Cancelled));
    }

    #[test]
    fn test_dropped_request_frees_blocking_thread() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .max_blocking_threads(1)
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let mut mock = MockCatalogProvider::new();
            mock.expect_search_movies()
                .returning(|_| Ok(vec![raw(1, "Duna", &[878])]));
            mock.expect_fetch_recommendations()
                .returning(|_| Ok((2..800).map(|id| raw(id, "Sci-fi", &[878])).collect()));
            mock.expect_fetch_director().returning(|_| Ok(None));
            mock.expect_name().return_const("mock");

            let genres = GenreMap::default();
            let settings = RankingSettings {
                timeout: Duration::from_secs(60),
                ..settings()
            };
            let request = recommend_for_title(Arc::new(mock), &genres, "Duna", settings);
            assert!(tokio::time::timeout(Duration::from_millis(100), request)
                .await
                .is_err());

            // only one blocking thread: this waits on the abandoned ranking
            let next = tokio::task::spawn_blocking(|| ());
            assert!(tokio::time::timeout(Duration::from_secs(2), next)
                .await
                .is_ok());
        });
    }
}
