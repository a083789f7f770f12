use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

/// Relay API key baked in at build time.
const BUILD_RELAY_API_KEY: Option<&str> = option_env!("BRIDGE_RELAY_API_KEY");
/// Build-time defaults; the browser has no process environment to read.
const BUILD_CACHE_PROVIDER: Option<&str> = option_env!("BRIDGE_CACHE_PROVIDER");
const BUILD_RUNTIME_PROFILE: Option<&str> = option_env!("BRIDGE_RUNTIME_PROFILE");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown runtime profile: {0}")]
    UnknownProfile(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    #[default]
    Development,
    Production,
}

impl FromStr for RuntimeProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::UnknownProfile(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BridgeAdapterConfig {
    pub runtime_profile: RuntimeProfile,
    /// API key for the wallet relay; sent as a bearer token to the JSON-RPC proxy.
    pub relay_api_key: Option<String>,
    pub eip1193_proxy_url: Option<String>,
    pub proxy_timeout_ms: u64,
    pub proxy_poll_interval_ms: u64,
    pub cache_provider: bool,
    pub cached_provider_storage_key: String,
}

impl Default for BridgeAdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: BUILD_RUNTIME_PROFILE
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
            relay_api_key: BUILD_RELAY_API_KEY
                .filter(|k| !k.trim().is_empty())
                .map(str::to_owned),
            eip1193_proxy_url: None,
            proxy_timeout_ms: 15_000,
            proxy_poll_interval_ms: 2_000,
            cache_provider: BUILD_CACHE_PROVIDER
                .and_then(|raw| parse_bool("BRIDGE_CACHE_PROVIDER", raw).ok())
                .unwrap_or(false),
            cached_provider_storage_key: "bridge-ui.cached-provider".to_owned(),
        }
    }
}

impl BridgeAdapterConfig {
    /// Build-time defaults overridden by `BRIDGE_*` process variables. Invalid
    /// values are logged and the default kept. In the browser only the
    /// build-time values apply.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(raw) = lookup("BRIDGE_RUNTIME_PROFILE") {
            match raw.parse() {
                Ok(profile) => cfg.runtime_profile = profile,
                Err(e) => warn!(error = %e, "ignoring BRIDGE_RUNTIME_PROFILE"),
            }
        }
        if let Some(key) = lookup("BRIDGE_RELAY_API_KEY").filter(|k| !k.trim().is_empty()) {
            cfg.relay_api_key = Some(key);
        }
        if let Some(url) = lookup("BRIDGE_EIP1193_PROXY_URL").filter(|u| !u.trim().is_empty()) {
            cfg.eip1193_proxy_url = Some(url);
        }
        if let Some(raw) = lookup("BRIDGE_PROXY_TIMEOUT_MS") {
            match parse_u64("BRIDGE_PROXY_TIMEOUT_MS", &raw) {
                Ok(ms) => cfg.proxy_timeout_ms = ms,
                Err(e) => warn!(error = %e, "ignoring BRIDGE_PROXY_TIMEOUT_MS"),
            }
        }
        if let Some(raw) = lookup("BRIDGE_PROXY_POLL_INTERVAL_MS") {
            match parse_u64("BRIDGE_PROXY_POLL_INTERVAL_MS", &raw) {
                Ok(ms) => cfg.proxy_poll_interval_ms = ms,
                Err(e) => warn!(error = %e, "ignoring BRIDGE_PROXY_POLL_INTERVAL_MS"),
            }
        }
        if let Some(raw) = lookup("BRIDGE_CACHE_PROVIDER") {
            match parse_bool("BRIDGE_CACHE_PROVIDER", &raw) {
                Ok(flag) => cfg.cache_provider = flag,
                Err(e) => warn!(error = %e, "ignoring BRIDGE_CACHE_PROVIDER"),
            }
        }
        cfg
    }

    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_owned(),
    })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_owned(),
        }),
    }
}
