//! Client configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Only the backend URL has a default; the access token is optional
//! here because most commands accept it explicitly.

use std::env;

/// Production backend used by the mobile app
pub const DEFAULT_API_URL: &str = "http://52.20.221.114/api";

const API_URL_VAR: &str = "HEALTHPLAN_API_URL";
const ACCESS_TOKEN_VAR: &str = "HEALTHPLAN_ACCESS_TOKEN";
const CURRENCY_PREFIX_VAR: &str = "HEALTHPLAN_CURRENCY_PREFIX";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("No access token configured (set HEALTHPLAN_ACCESS_TOKEN or pass --token)")]
    MissingToken,
}

/// Runtime configuration for talking to the plan backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL every endpoint path is joined onto
    pub api_base_url: String,
    /// Bearer credential, when provided through the environment
    pub access_token: Option<String>,
    /// Literal currency prefix used by price displays
    pub currency_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            access_token: None,
            currency_prefix: "R$".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `.env` (if present) and the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_process_env()
    }

    /// Load configuration from the environment without touching `.env`
    pub fn from_process_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base_url = match non_empty_var(API_URL_VAR) {
            Some(url) => validate_base_url(&url)?,
            None => defaults.api_base_url,
        };

        Ok(Self {
            api_base_url,
            access_token: non_empty_var(ACCESS_TOKEN_VAR),
            currency_prefix: non_empty_var(CURRENCY_PREFIX_VAR)
                .unwrap_or(defaults.currency_prefix),
        })
    }

    /// The configured token, or an explicit override when one is given
    pub fn token<'a>(&'a self, explicit: Option<&'a str>) -> Result<&'a str, ConfigError> {
        explicit
            .filter(|t| !t.trim().is_empty())
            .or(self.access_token.as_deref())
            .ok_or(ConfigError::MissingToken)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_base_url(url: &str) -> Result<String, ConfigError> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            name: API_URL_VAR,
            reason: format!("expected an http(s) URL, got {url:?}"),
        });
    }
    Ok(url.trim_end_matches('/').to_string())
}
