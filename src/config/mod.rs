//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `RECOMMENDER_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_TIMEOUT, DEFAULT_JUDGE_RETRIES, DEFAULT_JUDGE_TIMEOUT,
    DEFAULT_POOL_SIZE, MAX_RESULTS,
};
use crate::rerank::RerankerKind;

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RECOMMENDER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// JSON catalog file. Default: `./data/assessments.json`.
    pub catalog_path: PathBuf,

    /// Row-major F16 embedding matrix aligned with the catalog file rows.
    pub index_path: Option<PathBuf>,

    /// Embedding dimension shared by the embedder and the index. Default: `768`.
    pub embedding_dim: usize,

    /// Qdrant endpoint; takes precedence over `index_path` when set.
    pub qdrant_url: Option<String>,

    /// Qdrant collection holding one point per catalog entry.
    pub qdrant_collection: String,

    /// OpenAI-compatible embeddings endpoint (e.g. `https://host/v1/embeddings`).
    pub embedding_url: Option<String>,

    pub embedding_model: String,

    pub embedding_api_key: Option<String>,

    pub embedding_timeout: Duration,

    /// Reranking strategy. Default: `learned`.
    pub reranker: RerankerKind,

    /// Tree-ensemble model artifact used by the learned reranker.
    pub model_path: Option<PathBuf>,

    /// Model name passed to the external judge.
    pub judge_model: String,

    pub judge_timeout: Duration,

    pub judge_retries: u32,

    /// Candidate pool size K. Must exceed the maximum output size.
    pub pool_size: usize,

    /// Optional JSON vocabulary replacing the built-in skill / role lists.
    pub vocabulary_path: Option<PathBuf>,
}

pub const DEFAULT_CATALOG_PATH: &str = "./data/assessments.json";
pub const DEFAULT_QDRANT_COLLECTION: &str = "assessments";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
pub const DEFAULT_JUDGE_MODEL: &str = "gemini-2.5-flash";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            index_path: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            qdrant_url: None,
            qdrant_collection: DEFAULT_QDRANT_COLLECTION.to_string(),
            embedding_url: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_api_key: None,
            embedding_timeout: DEFAULT_EMBEDDING_TIMEOUT,
            reranker: RerankerKind::Learned,
            model_path: None,
            judge_model: DEFAULT_JUDGE_MODEL.to_string(),
            judge_timeout: DEFAULT_JUDGE_TIMEOUT,
            judge_retries: DEFAULT_JUDGE_RETRIES,
            pool_size: DEFAULT_POOL_SIZE,
            vocabulary_path: None,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "RECOMMENDER_PORT";
    const ENV_BIND_ADDR: &'static str = "RECOMMENDER_BIND_ADDR";
    const ENV_CATALOG_PATH: &'static str = "RECOMMENDER_CATALOG_PATH";
    const ENV_INDEX_PATH: &'static str = "RECOMMENDER_INDEX_PATH";
    const ENV_EMBEDDING_DIM: &'static str = "RECOMMENDER_EMBEDDING_DIM";
    const ENV_QDRANT_URL: &'static str = "RECOMMENDER_QDRANT_URL";
    const ENV_QDRANT_COLLECTION: &'static str = "RECOMMENDER_QDRANT_COLLECTION";
    const ENV_EMBEDDING_URL: &'static str = "RECOMMENDER_EMBEDDING_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "RECOMMENDER_EMBEDDING_MODEL";
    const ENV_EMBEDDING_API_KEY: &'static str = "RECOMMENDER_EMBEDDING_API_KEY";
    const ENV_EMBEDDING_TIMEOUT_MS: &'static str = "RECOMMENDER_EMBEDDING_TIMEOUT_MS";
    const ENV_RERANKER: &'static str = "RECOMMENDER_RERANKER";
    const ENV_MODEL_PATH: &'static str = "RECOMMENDER_MODEL_PATH";
    const ENV_JUDGE_MODEL: &'static str = "RECOMMENDER_JUDGE_MODEL";
    const ENV_JUDGE_TIMEOUT_MS: &'static str = "RECOMMENDER_JUDGE_TIMEOUT_MS";
    const ENV_JUDGE_RETRIES: &'static str = "RECOMMENDER_JUDGE_RETRIES";
    const ENV_POOL_SIZE: &'static str = "RECOMMENDER_POOL_SIZE";
    const ENV_VOCABULARY_PATH: &'static str = "RECOMMENDER_VOCABULARY_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let catalog_path = Self::parse_path_from_env(Self::ENV_CATALOG_PATH, defaults.catalog_path);
        let index_path = Self::parse_optional_path_from_env(Self::ENV_INDEX_PATH);
        let embedding_dim =
            Self::parse_number_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        let qdrant_url = Self::parse_optional_string_from_env(Self::ENV_QDRANT_URL);
        let qdrant_collection =
            Self::parse_string_from_env(Self::ENV_QDRANT_COLLECTION, defaults.qdrant_collection);
        let embedding_url = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_URL);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let embedding_api_key = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_API_KEY);
        let embedding_timeout =
            Self::parse_millis_from_env(Self::ENV_EMBEDDING_TIMEOUT_MS, defaults.embedding_timeout)?;
        let reranker = Self::parse_reranker_from_env(defaults.reranker)?;
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let judge_model = Self::parse_string_from_env(Self::ENV_JUDGE_MODEL, defaults.judge_model);
        let judge_timeout =
            Self::parse_millis_from_env(Self::ENV_JUDGE_TIMEOUT_MS, defaults.judge_timeout)?;
        let judge_retries =
            Self::parse_number_from_env(Self::ENV_JUDGE_RETRIES, defaults.judge_retries)?;
        let pool_size = Self::parse_number_from_env(Self::ENV_POOL_SIZE, defaults.pool_size)?;
        let vocabulary_path = Self::parse_optional_path_from_env(Self::ENV_VOCABULARY_PATH);

        Ok(Self {
            port,
            bind_addr,
            catalog_path,
            index_path,
            embedding_dim,
            qdrant_url,
            qdrant_collection,
            embedding_url,
            embedding_model,
            embedding_api_key,
            embedding_timeout,
            reranker,
            model_path,
            judge_model,
            judge_timeout,
            judge_retries,
            pool_size,
            vocabulary_path,
        })
    }

    /// Validates paths and basic invariants (does not open any file).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.catalog_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.catalog_path.clone(),
            });
        }
        if !self.catalog_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.catalog_path.clone(),
            });
        }

        if self.qdrant_url.is_none() && self.index_path.is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_INDEX_PATH,
            });
        }

        if let Some(ref path) = self.index_path {
            Self::require_file(path)?;
        }

        if let Some(ref path) = self.vocabulary_path {
            Self::require_file(path)?;
        }

        // A missing model file is tolerated (rule-based fallback); a directory is not.
        if let Some(ref path) = self.model_path
            && path.exists()
            && !path.is_file()
        {
            return Err(ConfigError::NotAFile { path: path.clone() });
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_DIM,
                value: self.embedding_dim.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.pool_size <= MAX_RESULTS {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_POOL_SIZE,
                value: self.pool_size.to_string(),
                reason: format!("must be greater than the output size ({})", MAX_RESULTS),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn require_file(path: &PathBuf) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound { path: path.clone() });
        }
        if !path.is_file() {
            return Err(ConfigError::NotAFile { path: path.clone() });
        }
        Ok(())
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

    fn parse_reranker_from_env(default: RerankerKind) -> Result<RerankerKind, ConfigError> {
        match env::var(Self::ENV_RERANKER) {
            Ok(value) => RerankerKind::from_str(&value).map_err(|reason| {
                ConfigError::InvalidValue {
                    name: Self::ENV_RERANKER,
                    value,
                    reason,
                }
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    name: var_name,
                    value: value.clone(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_millis_from_env(
        var_name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        let millis = Self::parse_number_from_env(var_name, default.as_millis() as u64)?;
        Ok(Duration::from_millis(millis))
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }
}
