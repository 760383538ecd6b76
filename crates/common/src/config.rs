//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Rating value bounds.
    #[serde(default)]
    pub rating: RatingConfig,
    /// Recommendation policy.
    #[serde(default)]
    pub recommendation: RecommendationConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Inclusive bounds for a single user rating.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingConfig {
    /// Lowest accepted rating value.
    #[serde(default = "default_rating_min")]
    pub min: i32,
    /// Highest accepted rating value.
    #[serde(default = "default_rating_max")]
    pub max: i32,
}

/// Collaborative-filtering policy.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    /// Maximum absolute rating difference for two ratings to count as agreement.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: i32,
    /// Minimum film score for a film to be recommended.
    #[serde(default = "default_quality_floor")]
    pub quality_floor: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            min: default_rating_min(),
            max: default_rating_max(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            quality_floor: default_quality_floor(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_rating_min() -> i32 {
    1
}

const fn default_rating_max() -> i32 {
    10
}

const fn default_similarity_threshold() -> i32 {
    1
}

const fn default_quality_floor() -> f64 {
    6.0
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present, only to populate the process environment)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `FILMRATE_ENV`)
    /// 4. Environment variables with `FILMRATE_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("FILMRATE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FILMRATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("FILMRATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
