/*
 * Responsibility
 * - Load settings from the environment (.env via dotenvy): listen address, signing key, token channels
 * - Validate them once at startup (missing/invalid values fail the boot)
 * - Read-only afterwards; nothing here is reloaded at runtime
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::services::auth::decoder::{KeyFamily, KeyMaterial};
use crate::services::auth::locator::{DEFAULT_TOKEN_NAME, TokenSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// How incoming credentials are found and verified.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub algorithm: Algorithm,
    pub key: KeyMaterial,
    pub token_name: String,
    /// Extraction order; the first source yielding a token wins.
    pub sources: Vec<TokenSource>,
    pub leeway_seconds: u64,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub request_timeout: Duration,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with the variable lookup supplied by the caller.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match var("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let request_timeout = var("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let auth = AuthConfig::from_vars(&var)?;

        Ok(Self {
            addr,
            app_env,
            request_timeout,
            auth,
        })
    }
}

impl AuthConfig {
    fn from_vars(var: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let algorithm = match var("JWT_ALG") {
            Some(name) => Algorithm::from_str(name.trim())
                .map_err(|_| ConfigError::Invalid("JWT_ALG"))?,
            None => Algorithm::HS256,
        };

        let key = if KeyFamily::of(algorithm).uses_secret() {
            let secret = var("JWT_SECRET")
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::Missing("JWT_SECRET"))?;
            KeyMaterial::Secret(secret)
        } else {
            let pem = var("JWT_PUBLIC_KEY_PEM")
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::Missing("JWT_PUBLIC_KEY_PEM"))?
                .replace("\\n", "\n");
            KeyMaterial::Pem(pem)
        };

        let token_name = var("JWT_TOKEN_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_NAME.to_string());

        let sources = match var("JWT_TOKEN_SOURCES") {
            Some(list) => parse_sources(&list, &token_name)?,
            None => vec![
                TokenSource::Query(token_name.clone()),
                TokenSource::Header,
                TokenSource::Cookie(token_name.clone()),
            ],
        };

        let leeway_seconds = var("JWT_LEEWAY_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let issuer = var("JWT_ISSUER").filter(|s| !s.trim().is_empty());
        let audience = var("JWT_AUDIENCE").filter(|s| !s.trim().is_empty());

        Ok(Self {
            algorithm,
            key,
            token_name,
            sources,
            leeway_seconds,
            issuer,
            audience,
        })
    }
}

// "query,header,cookie" -> ordered sources. An empty list is allowed (nothing is ever found).
fn parse_sources(list: &str, token_name: &str) -> Result<Vec<TokenSource>, ConfigError> {
    list.split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .map(|s| match s.as_str() {
            "query" => Ok(TokenSource::Query(token_name.to_string())),
            "header" => Ok(TokenSource::Header),
            "cookie" => Ok(TokenSource::Cookie(token_name.to_string())),
            _ => Err(ConfigError::Invalid("JWT_TOKEN_SOURCES")),
        })
        .collect()
}
