use std::{env, fmt, str::FromStr};

use config::{Config, ConfigError, Environment, File};
use derive_more::Display;
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::Deserialize;
use zeroize::Zeroizing;

const MIN_SECRET_LENGTH: usize = 32;

#[derive(Debug, Display, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    #[default]
    #[display("development")]
    Development,
    #[display("production")]
    Production,
    #[display("testing")]
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Development, Self::Production, Self::Testing]
            .into_iter()
            .find(|candidate| candidate.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::Message(format!("Invalid APP_ENV value: {}", s)))
    }
}

/// Runtime settings. Every field is optional in the sources; missing ones
/// take the values from [`Default`].
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub env: AppEnvironment,
    pub name: String,
    pub port: u16,
    pub host: String,
    pub worker_count: usize,
    pub database_url: String,
    pub database_max_connections: u32,
    pub cors_allowed_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub rate_limit_max_requests: u64,
    pub rate_limit_window_secs: u64,
    /// Take the client address from `X-Forwarded-For` (app runs behind a proxy).
    pub trust_proxy: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: AppEnvironment::default(),
            name: "Jobs-API".to_string(),
            port: 5000,
            host: "127.0.0.1".to_string(),
            worker_count: num_cpus::get(),
            database_url: String::new(),
            database_max_connections: 20,
            cors_allowed_origins: vec!["*".to_string()],
            jwt_secret: String::new(),
            // 30 days
            jwt_expiration_minutes: 60 * 24 * 30,
            rate_limit_max_requests: 100,
            rate_limit_window_secs: 15 * 60,
            trust_proxy: true,
        }
    }
}

impl AppConfig {
    /// Layers `config/default`, `config/{APP_ENV}` and `APP_*` variables, in
    /// that order, then validates the result.
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let env_name = env::var("APP_ENV")
            .map(|raw| raw.parse())
            .unwrap_or(Ok(AppEnvironment::default()))?;

        let mut config: Self = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true),
            )
            .build()?
            .try_deserialize()?;

        config.env = env_name;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (self.database_url.trim().is_empty(), "DATABASE_URL cannot be empty"),
            (self.jwt_secret.len() < MIN_SECRET_LENGTH, "JWT_SECRET must be at least 32 characters"),
            (self.jwt_expiration_minutes <= 0, "JWT_EXPIRATION_MINUTES must be positive"),
            (
                self.rate_limit_max_requests == 0 || self.rate_limit_window_secs == 0,
                "Rate limit settings must be greater than zero",
            ),
            (
                self.is_production() && self.cors_origins().iter().any(|o| o == "*"),
                "Wildcard CORS (*) is not allowed in production",
            ),
        ];

        let failures: Vec<&str> = checks
            .iter()
            .filter(|(failed, _)| *failed)
            .map(|(_, message)| *message)
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(failures.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    /// Configured origins, accepting comma-separated entries.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("bind", &format_args!("{}:{}", self.host, self.port))
            .field("worker_count", &self.worker_count)
            .field("database_url", &"[REDACTED]")
            .field("database_max_connections", &self.database_max_connections)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field(
                "rate_limit",
                &format_args!("{}/{}s", self.rate_limit_max_requests, self.rate_limit_window_secs),
            )
            .field("trust_proxy", &self.trust_proxy)
            .finish()
    }
}

/// HS512 signing material derived from `jwt_secret`.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl From<&AppConfig> for JwtKeys {
    fn from(config: &AppConfig) -> Self {
        let secret = Zeroizing::new(config.jwt_secret.as_bytes().to_vec());

        JwtKeys {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtKeys([REDACTED])")
    }
}
