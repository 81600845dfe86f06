use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::require_self;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::ClientCache;
use crate::db::users as user_db;
use crate::error::ServiceError;
use crate::models::PaginationQuery;
use crate::models::users::{self, AccountChanges, Roles, UserResponse};

pub const ACCOUNT_IN_USE: &str = "This account still has bid history and cannot be deleted";

/// GET /api/freelancers: list freelancer accounts with pagination.
/// Query params: ?page=1&limit=20
pub async fn get_freelancers(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, ServiceError> {
    let users =
        user_db::get_users_by_role_paginated(db.get_ref(), Roles::Freelancer, query.page(), query.limit())
            .await?;

    let response: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/freelancers/{id}
pub async fn get_freelancer(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let id = path.into_inner();

    match user_db::get_user_by_id(db.get_ref(), id).await? {
        Some(user) if user.role == Roles::Freelancer => {
            Ok(HttpResponse::Ok().json(UserResponse::from(user)))
        }
        _ => Err(ServiceError::not_found("Freelancer", id)),
    }
}

/// PUT /api/users/{id}: update your own account.
pub async fn update_user(
    auth_user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<AccountChanges>,
) -> Result<HttpResponse, ServiceError> {
    let updated = change_account(db.get_ref(), &auth_user, path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// DELETE /api/users/{id}: delete your own account.
///
/// Projects and the client profile go with it. Accounts that still have bids,
/// or projects that received bids, cannot be deleted.
pub async fn delete_user(
    auth_user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<ClientCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let id = path.into_inner();
    require_self(&auth_user.0, id, "account")?;

    let result = user_db::delete_user(db.get_ref(), id)
        .await
        .map_err(|e| ServiceError::from_delete(e, ACCOUNT_IN_USE))?;
    if result.rows_affected == 0 {
        return Err(ServiceError::not_found("User", id));
    }
    cache.invalidate(&auth_user.0.email).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("User {id} deleted"),
    })))
}

/// Self-service account edit. Admin cannot be self-assigned.
pub(crate) async fn change_account(
    db: &DatabaseConnection,
    caller: &AuthenticatedUser,
    target: Uuid,
    changes: AccountChanges,
) -> Result<users::Model, ServiceError> {
    require_self(&caller.0, target, "account")?;
    changes.validate().map_err(ServiceError::Validation)?;

    if changes.role == Some(Roles::Admin) && caller.0.role != Roles::Admin {
        return Err(ServiceError::Authorization(
            "The admin role cannot be self-assigned".to_string(),
        ));
    }

    user_db::update_account(db, target, changes)
        .await
        .map_err(|e| ServiceError::from_write(e, "That username is already taken"))?
        .ok_or_else(|| ServiceError::not_found("User", target))
}
