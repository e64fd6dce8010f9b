use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            model: default_model(),
            dimensions: default_dimensions(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_endpoint() -> String { crate::services::gemini::DEFAULT_ENDPOINT.to_string() }
fn default_model() -> String { crate::services::gemini::DEFAULT_MODEL.to_string() }
fn default_dimensions() -> usize { crate::services::gemini::DEFAULT_DIMENSIONS }
fn default_timeout_ms() -> u64 { 5000 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub capacity: Option<u64>,
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub max_results: Option<usize>,
    pub max_limit: Option<usize>,
    pub max_candidates: Option<usize>,
    pub concurrency: Option<usize>,
}

impl MatchingSettings {
    pub fn max_results(&self) -> usize { self.max_results.unwrap_or(5) }
    pub fn max_limit(&self) -> usize { self.max_limit.unwrap_or(100) }
    pub fn max_candidates(&self) -> usize { self.max_candidates.unwrap_or(500) }
    pub fn concurrency(&self) -> usize { self.concurrency.unwrap_or(8) }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RUKNA__)
    /// 5. GEMINI_API_KEY / GOOGLE_GEMINI_API_KEY for the provider key
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RUKNA__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RUKNA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("RUKNA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the matcher cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.dimensions == 0 {
            return Err(ConfigError::Message("embedding.dimensions must be positive".into()));
        }
        if self.embedding.timeout_ms == 0 {
            return Err(ConfigError::Message("embedding.timeout_ms must be positive".into()));
        }
        if self.matching.max_results() == 0 {
            return Err(ConfigError::Message("matching.max_results must be positive".into()));
        }
        if self.matching.max_limit() == 0 {
            return Err(ConfigError::Message("matching.max_limit must be positive".into()));
        }
        Ok(())
    }
}

/// Pick up the provider key from the conventional variable names
///
/// An explicit `RUKNA__EMBEDDING__API_KEY` wins over `GEMINI_API_KEY`,
/// which wins over `GOOGLE_GEMINI_API_KEY`.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("RUKNA__EMBEDDING__API_KEY")
        .or_else(|_| env::var("GEMINI_API_KEY"))
        .or_else(|_| env::var("GOOGLE_GEMINI_API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("embedding.api_key", api_key)?;
    }

    builder.build()
}
