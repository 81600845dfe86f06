//! Redis read-through cache for client profiles.
//!
//! Values are stored as JSON strings with an expiry. The cache is never the
//! source of truth: any failure is logged and the caller goes to the database.

use redis::{Client, RedisError, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use thiserror::Error;

use crate::config::CacheConfig;
use crate::models::clients::{ClientProfileResponse, ClientStats};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis: {0}")]
    Redis(#[from] RedisError),
    #[error("cached value is not valid JSON: {0}")]
    Codec(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let raw: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Store `value` for `ttl`. Redis expiries are whole seconds, so anything
    /// shorter is rounded up to one.
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;

        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(json)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut self.connection.clone())
            .await?;
        Ok(())
    }

    pub async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let _: () = redis::cmd("DEL")
            .arg(keys)
            .query_async(&mut self.connection.clone())
            .await?;
        Ok(())
    }
}

/// Client profile and stats entries, each with its own expiry.
///
/// Stats expire quickly because bid and project transitions change them
/// without touching the cache.
#[derive(Clone)]
pub struct ClientCache {
    redis: RedisCache,
    ttls: CacheConfig,
}

impl ClientCache {
    pub fn new(redis: RedisCache, ttls: CacheConfig) -> Self {
        Self { redis, ttls }
    }

    pub async fn profile(&self, email: &str) -> Option<ClientProfileResponse> {
        self.read(&keys::client(email)).await
    }

    pub async fn stats(&self, email: &str) -> Option<ClientStats> {
        self.read(&keys::client_stats(email)).await
    }

    pub async fn put_profile(&self, email: &str, profile: &ClientProfileResponse) {
        self.write(&keys::client(email), profile, self.ttls.client_ttl)
            .await;
    }

    pub async fn put_stats(&self, email: &str, stats: &ClientStats) {
        self.write(&keys::client_stats(email), stats, self.ttls.stats_ttl)
            .await;
    }

    pub async fn invalidate(&self, email: &str) {
        if let Err(e) = self.redis.delete(&keys::client_all(email)).await {
            tracing::warn!(email, "Cache invalidation failed: {}", e);
        }
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.redis.get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(key, "Cache read failed: {}", e);
                None
            }
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if let Err(e) = self.redis.set(key, value, ttl).await {
            tracing::warn!(key, "Cache write failed: {}", e);
        }
    }
}

pub mod keys {
    /// Client profile, keyed by normalised account email.
    pub fn client(email: &str) -> String {
        format!("client:{email}")
    }

    pub fn client_stats(email: &str) -> String {
        format!("client:{email}:stats")
    }

    /// Every key that describes one client.
    pub fn client_all(email: &str) -> Vec<String> {
        vec![client(email), client_stats(email)]
    }
}
