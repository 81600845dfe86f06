use actix_web::{HttpResponse, web};

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::ClientCache;
use crate::error::ServiceError;
use crate::models::PaginationQuery;
use crate::models::clients::{ClientProfileWithStats, CreateClientProfile, UpdateClientProfile};
use crate::models::users::Roles;
use crate::services::ClientService;
use crate::services::clients::normalize_email;

/// POST /api/clients: create the caller's client profile under their account email.
pub async fn create_client(
    user: AuthenticatedUser,
    clients: web::Data<ClientService>,
    body: web::Json<CreateClientProfile>,
) -> Result<HttpResponse, ServiceError> {
    require_role(&user.0, Roles::Client)?;

    let profile = clients
        .create_profile(user.id(), &user.0.email, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(profile))
}

/// GET /api/clients: list client profiles. Query params: ?page=1&limit=20
pub async fn get_clients(
    _user: AuthenticatedUser,
    clients: web::Data<ClientService>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, ServiceError> {
    let list = clients.list_profiles(query.page(), query.limit()).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// GET /api/clients/{email}: profile plus derived stats.
pub async fn get_client(
    _user: AuthenticatedUser,
    clients: web::Data<ClientService>,
    cache: web::Data<ClientCache>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let email = normalize_email(&path.into_inner());

    let body = match (cache.profile(&email).await, cache.stats(&email).await) {
        (Some(profile), Some(stats)) => ClientProfileWithStats { profile, stats },
        (Some(profile), None) => {
            let stats = clients.get_stats(&email).await?;
            cache.put_stats(&email, &stats).await;
            ClientProfileWithStats { profile, stats }
        }
        _ => {
            let fresh = clients.get_profile_with_stats(&email).await?;
            cache.put_profile(&email, &fresh.profile).await;
            cache.put_stats(&email, &fresh.stats).await;
            fresh
        }
    };

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/clients/{email}/stats
pub async fn get_client_stats(
    _user: AuthenticatedUser,
    clients: web::Data<ClientService>,
    cache: web::Data<ClientCache>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let email = normalize_email(&path.into_inner());

    if let Some(stats) = cache.stats(&email).await {
        return Ok(HttpResponse::Ok().json(stats));
    }

    let stats = clients.get_stats(&email).await?;
    cache.put_stats(&email, &stats).await;
    Ok(HttpResponse::Ok().json(stats))
}

/// PUT /api/clients/{email}: owners only.
pub async fn update_client(
    user: AuthenticatedUser,
    clients: web::Data<ClientService>,
    cache: web::Data<ClientCache>,
    path: web::Path<String>,
    body: web::Json<UpdateClientProfile>,
) -> Result<HttpResponse, ServiceError> {
    let email = normalize_email(&path.into_inner());

    let profile = clients
        .update_profile(&email, user.id(), body.into_inner())
        .await?;
    cache.invalidate(&email).await;
    Ok(HttpResponse::Ok().json(profile))
}

/// DELETE /api/clients/{email}: owners only.
pub async fn delete_client(
    user: AuthenticatedUser,
    clients: web::Data<ClientService>,
    cache: web::Data<ClientCache>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let email = normalize_email(&path.into_inner());

    clients.delete_profile(&email, user.id()).await?;
    cache.invalidate(&email).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Client {email} deleted"),
    })))
}
