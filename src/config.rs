use crate::models::{MatchConfig, ScoringWeights, SoundexMode};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    pub database: DatabaseSettings,
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
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub participants: String,
    pub households: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Snapshot cache lifetime; 0 disables caching and every check reads the
    /// collections afresh
    #[serde(default)]
    pub snapshot_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub soundex_mode: SoundexMode,
    #[serde(default)]
    pub sort_results: bool,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            weights: WeightsConfig::default(),
            soundex_mode: SoundexMode::default(),
            sort_results: false,
            page_size: default_page_size(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl MatchingSettings {
    /// Build the matcher configuration, rejecting unusable values
    pub fn match_config(&self) -> Result<MatchConfig, ConfigError> {
        if self.threshold > 100 {
            return Err(ConfigError::Message(format!(
                "matching.threshold must be within 0..=100, got {}",
                self.threshold
            )));
        }

        let weights = ScoringWeights {
            name: self.weights.name,
            soundex: self.weights.soundex,
            location: self.weights.location,
            birthday: self.weights.birthday,
        };
        weights
            .validate()
            .map_err(|e| ConfigError::Message(format!("matching.weights: {}", e)))?;

        Ok(MatchConfig {
            threshold: self.threshold,
            weights,
            soundex_mode: self.soundex_mode,
            sort_results: self.sort_results,
        })
    }
}

fn default_threshold() -> u8 { 70 }
fn default_page_size() -> usize { 100 }
fn default_fetch_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_weight")]
    pub name: f64,
    #[serde(default = "default_weight")]
    pub soundex: f64,
    #[serde(default = "default_weight")]
    pub location: f64,
    #[serde(default = "default_weight")]
    pub birthday: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            name: default_weight(),
            soundex: default_weight(),
            location: default_weight(),
            birthday: default_weight(),
        }
    }
}

fn default_weight() -> f64 { 0.25 }

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
fn default_log_format() -> String { "full".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with DEDUP_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., DEDUP__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("DEDUP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }
}

/// Apply the conventional direct environment overrides
///
/// `DATABASE_URL` wins over the configured database URL, and the
/// `DEDUP_APPWRITE__*` variables override the Appwrite connection settings.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }

    for key in ["endpoint", "api_key", "project_id", "database_id"] {
        let var = format!("DEDUP_APPWRITE__{}", key.to_uppercase());
        if let Ok(value) = env::var(&var) {
            builder = builder.set_override(format!("appwrite.{}", key), value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const MINIMAL: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8080

        [appwrite]
        endpoint = "https://appwrite.test/v1"
        api_key = "key"
        project_id = "project"
        database_id = "livelihood"

        [collection]
        participants = "participants"
        households = "households"

        [database]
        url = "postgres://localhost/dedup"
    "#;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.name, 0.25);
        assert_eq!(weights.soundex, 0.25);
        assert_eq!(weights.location, 0.25);
        assert_eq!(weights.birthday, 0.25);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "full");
    }

    #[test]
    fn test_minimal_file_uses_matching_defaults() {
        let settings = parse(MINIMAL);

        assert_eq!(settings.cache.snapshot_ttl_secs, 0);
        assert_eq!(settings.matching.page_size, 100);
        assert_eq!(settings.matching.match_config().unwrap(), MatchConfig::default());
    }

    #[test]
    fn test_matching_overrides() {
        let toml = format!(
            r#"{}
[matching]
threshold = 80
soundex_mode = "standard"
sort_results = true

[matching.weights]
name = 0.4
birthday = 0.1
"#,
            MINIMAL
        );
        let config = parse(&toml).matching.match_config().unwrap();

        assert_eq!(config.threshold, 80);
        assert_eq!(config.soundex_mode, SoundexMode::Standard);
        assert!(config.sort_results);
        assert_eq!(config.weights.name, 0.4);
        assert_eq!(config.weights.soundex, 0.25);
        assert_eq!(config.weights.birthday, 0.1);
    }

    #[test]
    fn test_invalid_matching_settings_rejected() {
        let mut matching = MatchingSettings::default();
        matching.threshold = 101;
        assert!(matching.match_config().is_err());

        let mut matching = MatchingSettings::default();
        matching.weights = WeightsConfig {
            name: 0.0,
            soundex: 0.0,
            location: 0.0,
            birthday: 0.0,
        };
        assert!(matching.match_config().is_err());
    }
}
