use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{CategoryId, TmdbGenreList};

/// Genre id → display name table, loaded once at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreMap(HashMap<CategoryId, String>);

impl GenreMap {
    pub fn from_pairs<N: Into<String>>(pairs: impl IntoIterator<Item = (CategoryId, N)>) -> Self {
        Self(pairs.into_iter().map(|(id, name)| (id, name.into())).collect())
    }

    pub fn get(&self, id: CategoryId) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    /// Resolves names for the given ids, skipping ids missing from the table
    pub fn names_for(&self, ids: &[CategoryId]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.0.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<TmdbGenreList> for GenreMap {
    fn from(list: TmdbGenreList) -> Self {
        Self::from_pairs(list.genres.into_iter().map(|g| (g.id, g.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_for_skips_unknown_ids() {
        let genres = GenreMap::from_pairs([(28, "Ação"), (35, "Comédia")]);
        assert_eq!(genres.names_for(&[35, 99, 28]), vec!["Comédia", "Ação"]);
    }

    #[test]
    fn test_from_tmdb_genre_list() {
        let list: TmdbGenreList =
            serde_json::from_str(r#"{"genres": [{"id": 18, "name": "Drama"}]}"#).unwrap();
        let genres = GenreMap::from(list);

        assert_eq!(genres.len(), 1);
        assert_eq!(genres.get(18), Some("Drama"));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let genres = GenreMap::from_pairs([(18, "Drama")]);
        let json = serde_json::to_string(&genres).unwrap();
        assert_eq!(json, r#"{"18":"Drama"}"#);
    }
}
