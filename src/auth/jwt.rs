use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::jwks::JwksCache;

/// Why a bearer token was refused. Every variant ends up as a 401.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token header has no key id")]
    MissingKeyId,
    #[error("no signing key with kid={0}")]
    UnknownKey(String),
    #[error("unsupported signing algorithm {0}")]
    UnsupportedAlgorithm(String),
    #[error("could not load signing keys: {0}")]
    KeyFetch(String),
    #[error("sub claim is not a UUID: {0}")]
    BadSubject(String),
    #[error("token carries no email")]
    MissingEmail,
    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<JwtError> for TokenError {
    fn from(err: JwtError) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Claims issued by Supabase Auth.
///
/// `sub` is the account id; `user_metadata` carries whatever the OAuth
/// provider returned about the person.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: Option<usize>,
    pub iss: Option<String>,
    pub email: Option<String>,
    /// Supabase's own role, e.g. "authenticated". Marketplace roles live in the database.
    pub role: Option<String>,
    pub user_metadata: Option<UserMetadata>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::BadSubject(self.sub.clone()))
    }

    pub fn display_name(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.full_name.clone().or_else(|| m.name.clone()))
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.avatar_url.clone().or_else(|| m.picture.clone()))
    }

    /// Top-level email first, then the provider's.
    pub fn user_email(&self) -> Option<String> {
        self.email
            .clone()
            .or_else(|| self.user_metadata.as_ref().and_then(|m| m.email.clone()))
    }
}

/// How bearer tokens are checked, picked once at startup from the config.
#[derive(Clone)]
pub enum TokenVerifier {
    /// Asymmetric keys published at the project's JWKS endpoint.
    Jwks(JwksCache),
    /// Legacy projects sign with a shared HS256 secret.
    Secret(String),
}

impl TokenVerifier {
    pub async fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        match self {
            TokenVerifier::Jwks(keys) => keys.validate_token(token).await,
            TokenVerifier::Secret(secret) => validate_token_with_secret(token, secret),
        }
    }
}

/// Validate an HS256 token signed with the project's JWT secret.
pub fn validate_token_with_secret(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}
