use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Process configuration, read once at startup and handed to whatever needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub redis_url: String,
    /// The `<ref>` in `https://<ref>.supabase.co`.
    pub supabase_project_ref: String,
    pub supabase_anon_key: String,
    /// When set, bearer tokens are verified with this HS256 secret instead of JWKS.
    pub jwt_secret: Option<String>,
    pub cors_max_age: usize,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub client_ttl: Duration,
    pub stats_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            client_ttl: Duration::from_secs(900), // 15 minutes
            stats_ttl: Duration::from_secs(60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so it can be exercised
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let supabase_url = required("SUPABASE_URL")?;
        let supabase_project_ref = parse_project_ref(&supabase_url)?;

        Ok(Self {
            port: parse_or("PORT", &lookup, 8080)?,
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            supabase_project_ref,
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            jwt_secret: lookup("SUPABASE_JWT_SECRET").filter(|v| !v.is_empty()),
            cors_max_age: parse_or("CORS_MAX_AGE", &lookup, 3600)?,
            cache: CacheConfig {
                client_ttl: Duration::from_secs(parse_or("CACHE_TTL_CLIENTS", &lookup, 900)?),
                stats_ttl: Duration::from_secs(parse_or("CACHE_TTL_STATS", &lookup, 60)?),
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_project_ref(supabase_url: &str) -> Result<String, ConfigError> {
    supabase_url
        .trim_end_matches('/')
        .strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Invalid {
            key: "SUPABASE_URL",
            reason: "expected https://PROJECT.supabase.co".to_string(),
        })
}
