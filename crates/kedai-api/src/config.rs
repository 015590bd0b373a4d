//! Server configuration loaded from the environment.
//!
//! Every value has a default from `kedai_core::defaults`, so an empty
//! environment yields a runnable local configuration (apart from the
//! database itself).

use std::net::SocketAddr;

use rand::RngCore;
use tracing::warn;

use kedai_core::{defaults, RankingConfig};

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Prefix of all versioned routes, e.g. `/api/v1`.
    pub api_v1_str: String,
    pub secret_key: String,
    /// True when `secret_key` was generated at startup.
    pub secret_key_generated: bool,
    pub access_token_expires_minutes: i64,
    pub frontend_host: String,
    /// Extra CORS origins from `ALLOWED_ORIGINS` (comma separated).
    pub allowed_origins: Vec<String>,
    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u64,
    pub rate_limit_period_secs: u64,
    pub run_migrations: bool,
    pub db_max_connections: u32,
    pub ranking: RankingConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ApiConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        let config = Self::from_lookup(|key| std::env::var(key).ok());
        if config.secret_key_generated {
            warn!(
                subsystem = "api",
                component = "config",
                "SECRET_KEY not set; generated a random key, issued tokens will not survive a restart"
            );
        }
        config
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let (secret_key, secret_key_generated) = match get("SECRET_KEY") {
            Some(key) => (key, false),
            None => (generate_secret_key(), true),
        };

        let ranking = RankingConfig {
            fts_weight: parse_or(get("SEARCH_FTS_WEIGHT"), defaults::FTS_WEIGHT),
            similarity_weight: parse_or(get("SEARCH_SIMILARITY_WEIGHT"), defaults::SIMILARITY_WEIGHT),
            trigram_threshold: parse_or(get("SEARCH_TRIGRAM_THRESHOLD"), defaults::TRIGRAM_THRESHOLD),
        };

        Self {
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost/kedai".to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("PORT"), defaults::SERVER_PORT),
            api_v1_str: normalize_prefix(
                &get("API_V1_STR").unwrap_or_else(|| defaults::API_V1_STR.to_string()),
            ),
            secret_key,
            secret_key_generated,
            access_token_expires_minutes: parse_or(
                get("ACCESS_TOKEN_EXPIRES_MINUTES"),
                defaults::ACCESS_TOKEN_EXPIRES_MINUTES,
            ),
            frontend_host: get("FRONTEND_HOST")
                .unwrap_or_else(|| defaults::FRONTEND_HOST.to_string()),
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            rate_limit_enabled: parse_bool(get("RATE_LIMIT_ENABLED"), true),
            rate_limit_requests: parse_or(get("RATE_LIMIT_REQUESTS"), defaults::RATE_LIMIT_REQUESTS),
            rate_limit_period_secs: parse_or(
                get("RATE_LIMIT_PERIOD_SECS"),
                defaults::RATE_LIMIT_PERIOD_SECS,
            ),
            run_migrations: parse_bool(get("RUN_MIGRATIONS"), true),
            db_max_connections: parse_or(
                get("DB_MAX_CONNECTIONS"),
                kedai_db::pool::DEFAULT_MAX_CONNECTIONS,
            ),
            ranking,
        }
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// All CORS origins: the frontend host followed by `ALLOWED_ORIGINS`.
    ///
    /// A `*` entry is dropped with a warning; credentialed CORS only
    /// accepts explicit origins.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        for origin in std::iter::once(&self.frontend_host).chain(&self.allowed_origins) {
            let origin = origin.trim().trim_end_matches('/');
            if origin == "*" {
                warn!(
                    subsystem = "api",
                    "Ignoring wildcard CORS origin; list explicit origins instead"
                );
                continue;
            }
            if !origin.is_empty() && !origins.iter().any(|o| o == origin) {
                origins.push(origin.to_string());
            }
        }
        origins
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .and_then(|val| match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Leading slash, no trailing slash.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn generate_secret_key() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
