use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ResearchConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Settings for the canister channel. Read once at startup, never mutated.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    /// Which adapter to construct: "dfx" (subprocess) or "relay" (HTTP).
    pub transport: String,
    pub dfx_path: String,
    pub network: String,
    pub canister_id: String,
    pub relay_url: String,
    pub query_method: String,
    pub health_method: String,
    pub call_timeout_ms: u64,
    pub health_timeout_ms: u64,
    /// Cap on simultaneous subprocess spawns for the dfx adapter.
    pub max_inflight_calls: usize,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            transport: "dfx".to_string(),
            dfx_path: "dfx".to_string(),
            network: "local".to_string(),
            canister_id: "research_ai_simple_backend".to_string(),
            relay_url: "http://127.0.0.1:4943".to_string(),
            query_method: "get_latest_news".to_string(),
            health_method: "health_check".to_string(),
            call_timeout_ms: 10_000,
            health_timeout_ms: 2_000,
            max_inflight_calls: 8,
        }
    }
}

impl BackendSettings {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ResearchConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .build()?;
        s.try_deserialize()
    }
}
