use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::ServiceError;
use crate::handlers::users::change_account;
use crate::models::users::{AccountChanges, UserResponse};

/// GET /api/auth/me: the account behind the bearer token.
pub async fn me(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(UserResponse::from(user.0))
}

/// POST /api/auth/complete-profile: pick a username and a role after first login.
pub async fn complete_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<AccountChanges>,
) -> Result<HttpResponse, ServiceError> {
    let updated = change_account(db.get_ref(), &user, user.id(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
