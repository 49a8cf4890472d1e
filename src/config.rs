use serde::Deserialize;
use std::time::Duration;

use crate::graph::DEFAULT_TOP_K;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key; without it the recommendation endpoint is disabled
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language requested from TMDB for titles and genre names
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS (comma separated in the environment)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Maximum number of recommendations returned
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Time budget for ranking one request, in milliseconds
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,

    /// Run candidate searches in parallel
    #[serde(default = "default_parallel_search")]
    pub parallel_search: bool,
}

/// Ranking knobs handed to the recommendation service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingSettings {
    pub top_k: usize,
    pub timeout: Duration,
    pub parallel: bool,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            timeout: Duration::from_millis(default_search_timeout_ms()),
            parallel: default_parallel_search(),
        }
    }
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "pt-BR".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_recommendation_limit() -> usize {
    DEFAULT_TOP_K
}

fn default_search_timeout_ms() -> u64 {
    2000
}

fn default_parallel_search() -> bool {
    true
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn ranking_settings(&self) -> RankingSettings {
        RankingSettings {
            top_k: self.recommendation_limit,
            timeout: Duration::from_millis(self.search_timeout_ms),
            parallel: self.parallel_search,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
