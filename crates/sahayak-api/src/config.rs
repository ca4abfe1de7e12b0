use config::{Config as ConfigLoader, ConfigError, Environment, File};
use sahayak_cloud::Credentials;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    pub mongodb: MongoDbConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub reset: ResetConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub gcp_access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_request_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// `*` (or an empty list) echoes back whatever origin the caller sent
    #[serde(default)]
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceBackend {
    #[default]
    Mongodb,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PersistenceConfig {
    #[serde(default)]
    pub backend: PersistenceBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    pub database: String,
}

/// Fixed generation parameters for every completion
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Override for the OpenAI-compatible endpoint
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotaConfig {
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: i64,
    #[serde(default = "default_free_tokens")]
    pub free_tokens: i64,
    #[serde(default = "default_premium_tokens")]
    pub premium_tokens: i64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
            free_tokens: default_free_tokens(),
            premium_tokens: default_premium_tokens(),
        }
    }
}

fn default_cooldown_ms() -> i64 {
    6000
}

fn default_free_tokens() -> i64 {
    100
}

fn default_premium_tokens() -> i64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetConfig {
    #[serde(default = "default_reset_enabled")]
    pub enabled: bool,
    /// Six-field cron expression (seconds first)
    #[serde(default = "default_reset_schedule")]
    pub schedule: String,
    /// IANA zone the schedule is evaluated in
    #[serde(default = "default_reset_timezone")]
    pub timezone: String,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            enabled: default_reset_enabled(),
            schedule: default_reset_schedule(),
            timezone: default_reset_timezone(),
        }
    }
}

fn default_reset_enabled() -> bool {
    true
}

fn default_reset_schedule() -> String {
    "0 0 0 * * *".to_string()
}

fn default_reset_timezone() -> String {
    "Asia/Kathmandu".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Used when a finalize event carries no bucket
    pub bucket: String,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Send Storage and Vision calls without an `Authorization` header
    /// (emulators, public buckets)
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct VisionConfig {
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. `SAHAYAK_<SECTION>__<KEY>` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let config = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("SAHAYAK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.origins"),
            )
            .build()?;

        let mut cfg: Config = config.try_deserialize()?;

        // Secrets from ENV (not in TOML)
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
        })?;
        if cfg.persistence.backend == PersistenceBackend::Mongodb {
            cfg.mongodb_uri = std::env::var("MONGODB_URI").map_err(|_| {
                ConfigError::Message("MONGODB_URI environment variable is required".to_string())
            })?;
        }
        cfg.gcp_access_token = std::env::var("GCP_ACCESS_TOKEN").ok();

        Ok(cfg)
    }

    /// Credentials shared by the Storage and Vision clients
    pub fn google_credentials(&self) -> Credentials {
        if self.storage.anonymous {
            return Credentials::Anonymous;
        }
        Credentials::from_optional_token(self.gcp_access_token.clone())
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }
}
