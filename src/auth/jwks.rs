//! Signing keys for asymmetric Supabase tokens.
//!
//! The whole key set is fetched on a cache miss and every key in it is cached,
//! so a key rotation costs one request.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::auth::jwt::{Claims, TokenError};
use crate::config::Config;

const KEY_TTL: Duration = Duration::from_secs(3600);
const MAX_KEYS: u64 = 10;

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

/// One EC public key from the set. Keys of other types are skipped.
#[derive(Debug, Deserialize)]
struct Jwk {
    kid: Option<String>,
    kty: String,
    alg: Option<String>,
    x: Option<String>,
    y: Option<String>,
}

#[derive(Clone)]
struct SigningKey {
    key: DecodingKey,
    algorithm: Algorithm,
}

impl SigningKey {
    fn from_jwk(jwk: &Jwk) -> Result<Self, TokenError> {
        let algorithm = match jwk.alg.as_deref().unwrap_or("ES256") {
            "ES256" => Algorithm::ES256,
            "ES384" => Algorithm::ES384,
            other => return Err(TokenError::UnsupportedAlgorithm(other.to_string())),
        };
        let (Some(x), Some(y)) = (&jwk.x, &jwk.y) else {
            return Err(TokenError::KeyFetch("EC key without x/y".to_string()));
        };
        let key = DecodingKey::from_ec_components(x, y)
            .map_err(|e| TokenError::KeyFetch(e.to_string()))?;
        Ok(Self { key, algorithm })
    }
}

#[derive(Clone)]
pub struct JwksCache {
    keys: Arc<Cache<String, SigningKey>>,
    jwks_url: String,
    client: reqwest::Client,
    anon_key: String,
}

impl JwksCache {
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.supabase_project_ref, &config.supabase_anon_key)
    }

    pub fn new(project_ref: &str, anon_key: &str) -> Self {
        let keys = Cache::builder()
            .time_to_live(KEY_TTL)
            .max_capacity(MAX_KEYS)
            .build();

        Self {
            keys: Arc::new(keys),
            jwks_url: format!("https://{project_ref}.supabase.co/auth/v1/.well-known/jwks.json"),
            client: reqwest::Client::new(),
            anon_key: anon_key.to_string(),
        }
    }

    async fn refresh(&self) -> Result<(), TokenError> {
        debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| TokenError::KeyFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::KeyFetch(format!("HTTP {status}")));
        }

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| TokenError::KeyFetch(e.to_string()))?;

        for jwk in set.keys.iter().filter(|k| k.kty == "EC") {
            let Some(kid) = &jwk.kid else { continue };
            match SigningKey::from_jwk(jwk) {
                Ok(key) => {
                    debug!(kid = %kid, "Caching JWKS key");
                    self.keys.insert(kid.clone(), key).await;
                }
                Err(e) => debug!(kid = %kid, "Skipping JWKS key: {}", e),
            }
        }
        Ok(())
    }

    async fn signing_key(&self, kid: &str) -> Result<SigningKey, TokenError> {
        if let Some(key) = self.keys.get(kid).await {
            return Ok(key);
        }

        self.refresh().await?;
        self.keys
            .get(kid)
            .await
            .ok_or_else(|| TokenError::UnknownKey(kid.to_string()))
    }

    pub async fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(TokenError::MissingKeyId)?;

        let signing = self.signing_key(&kid).await?;

        let mut validation = Validation::new(signing.algorithm);
        validation.validate_aud = false;

        Ok(decode::<Claims>(token, &signing.key, &validation)?.claims)
    }
}
