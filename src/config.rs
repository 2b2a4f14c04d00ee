use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const ENV_PREFIX: &str = "MARKETDESK_";

/// Secrets read from the environment verbatim. The generic env provider parses
/// values, which turns an all-digit key into a number and drops leading zeros.
const VERBATIM_ENV_KEYS: [(&str, &str); 2] = [
    (
        "MARKETDESK_PROVIDERS__ALPHAVANTAGE__API_KEY",
        "providers.alphavantage.api_key",
    ),
    (
        "MARKETDESK_PROVIDERS__TIINGO__API_TOKEN",
        "providers.tiingo.api_token",
    ),
];

/// Runtime configuration, layered as defaults -> `config.toml` -> `MARKETDESK_*` env vars.
/// Nested keys use `__` in env names, e.g. `MARKETDESK_BASIC__DATABASE_URL`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub hashing: HashingConfig,
    pub http: HttpConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    pub body_limit_bytes: usize,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:accounts.db".to_string(),
            loglevel: "info".to_string(),
            body_limit_bytes: 64 * 1024,
        }
    }
}

/// Argon2id cost parameters used for new credential hashes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub proxy: Option<Url>,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            connect_timeout_secs: 5,
            timeout_secs: 30,
            user_agent: concat!("marketdesk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub alphavantage: AlphaVantageConfig,
    pub tiingo: TiingoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaVantageConfig {
    pub api_key: Option<String>,
    pub base_url: Url,
    /// Pause between consecutive calls when running the whole suite.
    pub call_pause_secs: u64,
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Url::parse("https://www.alphavantage.co/query")
                .expect("static Alpha Vantage URL is valid"),
            call_pause_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TiingoConfig {
    pub api_token: Option<String>,
    pub base_url: Url,
}

impl Default for TiingoConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: Url::parse("https://api.tiingo.com").expect("static Tiingo URL is valid"),
        }
    }
}

impl Config {
    /// Load from `config.toml` in the working directory plus the environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load from an explicit TOML path plus the environment. A missing file is not an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }

    fn figment(path: impl AsRef<Path>) -> Figment {
        let env = Env::prefixed(ENV_PREFIX).split("__").filter(|key| {
            !VERBATIM_ENV_KEYS
                .iter()
                .any(|(_, path)| key.as_str().eq_ignore_ascii_case(path))
        });
        let mut figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(env);
        for (var, path) in VERBATIM_ENV_KEYS {
            if let Ok(value) = std::env::var(var) {
                figment = figment.merge(Serialized::default(path, value));
            }
        }
        figment
    }
}
