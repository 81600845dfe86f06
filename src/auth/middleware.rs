use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, http::header, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::jwt::{TokenError, TokenVerifier};
use crate::db::users::find_or_create_account;
use crate::models::users::{self, NewAccount};

const AUTH_PROVIDER: &str = "google";

/// The caller's account, resolved from a verified bearer token.
///
/// Taking this as a handler argument is what makes a route authenticated.
pub struct AuthenticatedUser(pub users::Model);

impl AuthenticatedUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ErrorUnauthorized("Missing Authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ErrorUnauthorized("Authorization header must be: Bearer <token>"))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = bearer_token(&req)?;

            let verifier = req
                .app_data::<web::Data<Arc<TokenVerifier>>>()
                .ok_or_else(|| ErrorInternalServerError("Token verifier not configured"))?;
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| ErrorInternalServerError("Database not configured"))?;

            let claims = verifier.verify(token).await.map_err(unauthorized)?;
            let account = NewAccount {
                id: claims.user_id().map_err(unauthorized)?,
                email: claims
                    .user_email()
                    .ok_or(TokenError::MissingEmail)
                    .map_err(unauthorized)?
                    .trim()
                    .to_lowercase(),
                display_name: claims.display_name(),
                avatar_url: claims.avatar_url(),
                auth_provider: AUTH_PROVIDER.to_string(),
            };

            let user = find_or_create_account(db.get_ref(), account)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to load account: {}", e);
                    ErrorInternalServerError("Database error")
                })?;

            Ok(AuthenticatedUser(user))
        })
    }
}

fn unauthorized(err: TokenError) -> Error {
    tracing::debug!("Rejected bearer token: {}", err);
    ErrorUnauthorized(format!("Invalid token: {err}"))
}
