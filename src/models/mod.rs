use serde::{Deserialize, Serialize};

pub mod genre;
pub mod item;

pub use genre::GenreMap;
pub use item::{CategoryId, ItemId, ItemRecord};

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw movie entry returned by TMDB search and recommendation listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbMovie {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<CategoryId>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

/// Paged listing wrapper used by `/search/movie` and `/movie/{id}/recommendations`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// Response from `/movie/{id}/credits`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewMember {
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl TmdbCredits {
    /// Name of the first crew member credited as director
    pub fn director(&self) -> Option<String> {
        self.crew
            .iter()
            .find(|member| member.job.as_deref() == Some("Director"))
            .and_then(|member| member.name.clone())
            .filter(|name| !name.trim().is_empty())
    }
}

/// Response from `/genre/movie/list`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: CategoryId,
    pub name: String,
}

// ============================================================================
// Client-facing Types
// ============================================================================

/// A movie enriched with genre names and director, as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: ItemId,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub genre_ids: Vec<CategoryId>,
    pub genre: Vec<String>,
    pub director: Option<String>,
    pub popularity: Option<f64>,
}

impl Movie {
    /// Enriches a raw TMDB entry with resolved genre names and a director
    pub fn from_tmdb(raw: TmdbMovie, genres: &GenreMap, director: Option<String>) -> Self {
        let genre = genres.names_for(&raw.genre_ids);
        Self {
            id: raw.id,
            title: raw.title,
            overview: raw.overview,
            poster_path: raw.poster_path,
            release_date: raw.release_date,
            vote_average: raw.vote_average,
            genre_ids: raw.genre_ids,
            genre,
            director,
            popularity: raw.popularity,
        }
    }
}

impl From<&Movie> for ItemRecord {
    fn from(movie: &Movie) -> Self {
        ItemRecord {
            id: movie.id,
            title: movie.title.clone(),
            categories: movie.genre_ids.iter().copied().collect(),
            popularity: movie.popularity,
            director: movie.director.clone(),
        }
    }
}

/// A recommended movie together with its path cost from the searched movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub cost: f64,
}

/// Response body of the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub searched_movie: Movie,
    pub recommendations: Vec<RecommendedMovie>,
}
