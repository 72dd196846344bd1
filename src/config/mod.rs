//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RECOMMENDER_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_FINAL_COUNT, DEFAULT_RECOMMENDATION_COUNT};
use crate::embedding::{RerankerConfig, ScoreActivation, SentenceConfig};
use crate::recommend::RecommenderConfig;

/// Origins allowed by CORS when `RECOMMENDER_CORS_ORIGINS` is not set.
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RECOMMENDER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Postings JSON. Default: `Data/internships.json`.
    pub catalog_path: PathBuf,

    /// Precomputed `[N, 3, D]` posting vectors. Default: `Data/internships.npy`.
    pub vectors_path: PathBuf,

    /// Sentence-transformer directory. Unset selects the stub embedder.
    pub embedding_model_path: Option<PathBuf>,

    /// Cross-encoder directory. Unset selects the stub reranker.
    pub reranker_path: Option<PathBuf>,

    /// Mapping from cross-encoder logits to scores. Default: sigmoid.
    pub reranker_activation: ScoreActivation,

    /// Shortlist size (K) when a request gives no `count`. Default: `5`.
    pub recommendation_count: usize,

    /// Whether the cross-encoder stage runs. Default: `true`.
    pub rerank: bool,

    /// Origins allowed to call the API from a browser.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            catalog_path: PathBuf::from("Data/internships.json"),
            vectors_path: PathBuf::from("Data/internships.npy"),
            embedding_model_path: None,
            reranker_path: None,
            reranker_activation: ScoreActivation::default(),
            recommendation_count: DEFAULT_RECOMMENDATION_COUNT,
            rerank: true,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "RECOMMENDER_PORT";
    const ENV_BIND_ADDR: &'static str = "RECOMMENDER_BIND_ADDR";
    const ENV_CATALOG_PATH: &'static str = "RECOMMENDER_CATALOG_PATH";
    const ENV_VECTORS_PATH: &'static str = "RECOMMENDER_VECTORS_PATH";
    const ENV_COUNT: &'static str = "RECOMMENDER_COUNT";
    const ENV_RERANK: &'static str = "RECOMMENDER_RERANK";
    const ENV_CORS_ORIGINS: &'static str = "RECOMMENDER_CORS_ORIGINS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let catalog_path = Self::parse_path_from_env(Self::ENV_CATALOG_PATH, defaults.catalog_path);
        let vectors_path = Self::parse_path_from_env(Self::ENV_VECTORS_PATH, defaults.vectors_path);
        let embedding_model_path =
            Self::parse_optional_path_from_env(SentenceConfig::ENV_MODEL_PATH);
        let reranker_path = Self::parse_optional_path_from_env(RerankerConfig::ENV_MODEL_PATH);
        let reranker_activation = Self::parse_activation_from_env(defaults.reranker_activation)?;
        let recommendation_count =
            Self::parse_count_from_env(Self::ENV_COUNT, defaults.recommendation_count)?;
        let rerank = Self::parse_bool_from_env(Self::ENV_RERANK, defaults.rerank)?;
        let cors_origins = Self::parse_list_from_env(Self::ENV_CORS_ORIGINS, defaults.cors_origins);

        Ok(Self {
            port,
            bind_addr,
            catalog_path,
            vectors_path,
            embedding_model_path,
            reranker_path,
            reranker_activation,
            recommendation_count,
            rerank,
            cors_origins,
        })
    }

    /// Validates paths and basic invariants for serving.
    ///
    /// The vectors file must exist; use [`validate_for_vectorize`](Self::validate_for_vectorize)
    /// when it is about to be written.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_paths()?;
        require_file(&self.vectors_path)?;

        if let Some(ref path) = self.reranker_path {
            require_dir(path)?;
        }

        Ok(())
    }

    /// Validates what the offline vectorizer reads. An embedding model path is
    /// required here; the stub embedder never writes a vectors file.
    pub fn validate_for_vectorize(&self) -> Result<(), ConfigError> {
        if self.embedding_model_path.is_none() {
            return Err(ConfigError::MissingSetting {
                name: "RECOMMENDER_EMBEDDING_MODEL_PATH",
            });
        }

        self.validate_paths()
    }

    fn validate_paths(&self) -> Result<(), ConfigError> {
        require_file(&self.catalog_path)?;

        if self.vectors_path.is_dir() {
            return Err(ConfigError::NotAFile {
                path: self.vectors_path.clone(),
            });
        }

        if let Some(ref path) = self.embedding_model_path {
            require_dir(path)?;
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn sentence_config(&self) -> SentenceConfig {
        match &self.embedding_model_path {
            Some(path) => SentenceConfig::new(path),
            None => SentenceConfig::stub(),
        }
    }

    pub fn reranker_config(&self) -> RerankerConfig {
        let config = match &self.reranker_path {
            Some(path) => RerankerConfig::new(path),
            None => RerankerConfig::stub(),
        };
        config.with_activation(self.reranker_activation)
    }

    pub fn recommender_config(&self) -> RecommenderConfig {
        RecommenderConfig {
            recommendation_count: self.recommendation_count,
            final_count: DEFAULT_FINAL_COUNT,
            rerank: self.rerank,
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_activation_from_env(
        default: ScoreActivation,
    ) -> Result<ScoreActivation, ConfigError> {
        match env::var(RerankerConfig::ENV_ACTIVATION) {
            Ok(value) => value
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    name: RerankerConfig::ENV_ACTIVATION,
                    reason,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_count_from_env(name: &'static str, default: usize) -> Result<usize, ConfigError> {
        let Ok(value) = env::var(name) else {
            return Ok(default);
        };

        let count: i64 = value
            .trim()
            .parse()
            .map_err(|source| ConfigError::IntParseError {
                name,
                value: value.clone(),
                source,
            })?;

        usize::try_from(count).map_err(|_| ConfigError::NegativeCount { name, value: count })
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    name,
                    reason: format!("expected a boolean, got '{value}'"),
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_list_from_env(var_name: &str, default: Vec<String>) -> Vec<String> {
        match env::var(var_name) {
            Ok(value) => value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => default,
        }
    }
}

fn require_file(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::PathNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(ConfigError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn require_dir(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::PathNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_dir() {
        return Err(ConfigError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
