use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub redis: RedisConfig,
    pub cache: CacheConfig,
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

fn default_ttl_seconds() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    pub garuda: ProviderSourceConfig,
    pub lion_air: ProviderSourceConfig,
    pub batik_air: ProviderSourceConfig,
    pub air_asia: ProviderSourceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderSourceConfig {
    pub data_path: String,
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
}

fn default_deadline_ms() -> u64 {
    2000
}

/// Best-value scoring weights. The defaults are inherited mock values, so
/// they stay configurable rather than baked in as constants.
#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    #[serde(default = "default_time_weight")]
    pub time_weight: f64,
    #[serde(default = "default_stop_penalty")]
    pub stop_penalty: f64,
    #[serde(default = "default_amenity_bonus")]
    pub amenity_bonus: f64,
}

fn default_time_weight() -> f64 {
    2500.0
}

fn default_stop_penalty() -> f64 {
    150_000.0
}

fn default_amenity_bonus() -> f64 {
    50_000.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            time_weight: default_time_weight(),
            stop_penalty: default_stop_penalty(),
            amenity_bonus: default_amenity_bonus(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of FARELINK)
            // Eg.. `FARELINK_DEBUG=1` would set the `debug` key
            .add_source(config::Environment::with_prefix("FARELINK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
