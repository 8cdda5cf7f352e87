//! Gateway configuration, built from a key/value map or from `PROFIT_STARS_*`
//! environment variables.
use std::collections::HashMap;
use std::env;
use std::time::Duration;

use reqwest::Url;

use crate::ConfigError;
use crate::Credentials;

pub const DEFAULT_ENDPOINT: &str = "https://ws.eps.profitstars.com/PV/TransactionProcessing.asmx";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const KEY_STORE_ID: &str = "store-id";
const KEY_STORE_KEY: &str = "store-key";
const KEY_ENTITY_ID: &str = "entity-id";
const KEY_LOCATION_ID: &str = "location-id";
const KEY_ENDPOINT: &str = "endpoint";
const KEY_TIMEOUT_SECS: &str = "timeout-secs";

const ENV_KEYS: [(&str, &str); 6] = [
    (KEY_STORE_ID, "PROFIT_STARS_STORE_ID"),
    (KEY_STORE_KEY, "PROFIT_STARS_STORE_KEY"),
    (KEY_ENTITY_ID, "PROFIT_STARS_ENTITY_ID"),
    (KEY_LOCATION_ID, "PROFIT_STARS_LOCATION_ID"),
    (KEY_ENDPOINT, "PROFIT_STARS_ENDPOINT"),
    (KEY_TIMEOUT_SECS, "PROFIT_STARS_TIMEOUT_SECS"),
];

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    credentials: Credentials,
    endpoint: Url,
    timeout: Duration,
}

impl GatewayConfig {
    pub fn new(credentials: Credentials) -> Self {
        GatewayConfig {
            credentials,
            endpoint: default_endpoint(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the configuration from a map keyed by `store-id`, `store-key`,
    /// `entity-id` and `location-id`, plus the optional `endpoint` and
    /// `timeout-secs`.
    pub fn from_map<K, V>(map: &HashMap<K, V>) -> Result<Self, ConfigError>
    where
        K: std::borrow::Borrow<str> + std::hash::Hash + Eq,
        V: AsRef<str>,
    {
        let required = |key: &'static str| {
            map.get(key)
                .map(|value| value.as_ref().to_string())
                .ok_or(ConfigError::Missing(key))
        };
        let credentials = Credentials::new(
            required(KEY_STORE_ID)?,
            required(KEY_STORE_KEY)?,
            required(KEY_ENTITY_ID)?,
            required(KEY_LOCATION_ID)?,
        )?;

        let mut config = GatewayConfig::new(credentials);
        if let Some(endpoint) = map.get(KEY_ENDPOINT) {
            config.endpoint =
                Url::parse(endpoint.as_ref()).map_err(|e| ConfigError::Invalid {
                    key: KEY_ENDPOINT,
                    reason: e.to_string(),
                })?;
        }
        if let Some(timeout) = map.get(KEY_TIMEOUT_SECS) {
            let secs = timeout
                .as_ref()
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::Invalid {
                    key: KEY_TIMEOUT_SECS,
                    reason: e.to_string(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Reads `PROFIT_STARS_STORE_ID`, `PROFIT_STARS_STORE_KEY`,
    /// `PROFIT_STARS_ENTITY_ID`, `PROFIT_STARS_LOCATION_ID` and the optional
    /// `PROFIT_STARS_ENDPOINT` / `PROFIT_STARS_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let map: HashMap<&str, String> = ENV_KEYS
            .iter()
            .filter_map(|(key, var)| lookup(var).map(|value| (*key, value)))
            .collect();
        Self::from_map(&map).map_err(|e| match e {
            ConfigError::Missing(key) => ConfigError::Missing(env_name(key)),
            ConfigError::Empty(key) => ConfigError::Empty(env_name(key)),
            ConfigError::Invalid { key, reason } => ConfigError::Invalid {
                key: env_name(key),
                reason,
            },
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn env_name(key: &'static str) -> &'static str {
    ENV_KEYS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, var)| *var)
        .unwrap_or(key)
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL")
}
