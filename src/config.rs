//! Process-wide settings, read once at cold start.

use std::fmt;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::http::cors::{Allowed, CorsPolicy};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CORS_MAX_AGE_SECS: u32 = 600;

/// API key holder whose `Debug` never prints the value.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub upstream_timeout: Duration,
    pub cors: CorsPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("OPENAI_API_KEY")
            .or_else(|| get("OPENAI_KEY"))
            .ok_or_else(|| AppError::Config("Missing OPENAI_API_KEY".into()))?;

        let timeout_secs = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    AppError::Config(format!("UPSTREAM_TIMEOUT_SECS must be a positive integer, got {raw:?}"))
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let allow_credentials = match get("CORS_ALLOW_CREDENTIALS") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::Config(format!("CORS_ALLOW_CREDENTIALS must be true or false, got {raw:?}"))
            })?,
            None => true,
        };

        let max_age_secs = match get("CORS_MAX_AGE_SECS") {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                AppError::Config(format!("CORS_MAX_AGE_SECS must be an integer, got {raw:?}"))
            })?,
            None => DEFAULT_CORS_MAX_AGE_SECS,
        };

        let cors = CorsPolicy {
            origins: get("CORS_ALLOW_ORIGINS").map(|v| Allowed::parse(&v)).unwrap_or(Allowed::Any),
            methods: get("CORS_ALLOW_METHODS").map(|v| Allowed::parse(&v)).unwrap_or(Allowed::Any),
            headers: get("CORS_ALLOW_HEADERS").map(|v| Allowed::parse(&v)).unwrap_or(Allowed::Any),
            allow_credentials,
            max_age_secs,
        };

        Ok(Self {
            api_key: SecretString::new(api_key),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            upstream_timeout: Duration::from_secs(timeout_secs),
            cors,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
