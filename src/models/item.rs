use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Catalog identifier of an item (TMDB movie id)
pub type ItemId = u64;

/// Numeric category code (TMDB genre id)
pub type CategoryId = u32;

/// Strongly-typed item record handed to the graph builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub categories: BTreeSet<CategoryId>,
    /// Informational only, never part of the cost model
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub director: Option<String>,
}

impl ItemRecord {
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            categories: BTreeSet::new(),
            popularity: None,
            director: None,
        }
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = CategoryId>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.director = Some(director.into());
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }
}
