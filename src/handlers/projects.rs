use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthenticatedUser;
use crate::error::ServiceError;
use crate::models::PaginationQuery;
use crate::models::projects::{CreateProject, UpdateProject};
use crate::models::users::Roles;
use crate::services::ProjectService;

/// GET /api/projects: open projects, newest first. Query params: ?page=1&limit=20
pub async fn get_open_projects(
    _user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, ServiceError> {
    let list = projects
        .list_open_projects(query.page(), query.limit())
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// GET /api/projects/{id}
pub async fn get_project(
    _user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let project = projects.get_project(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

/// POST /api/projects: a client posts a new project.
pub async fn create_project(
    user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    body: web::Json<CreateProject>,
) -> Result<HttpResponse, ServiceError> {
    require_role(&user.0, Roles::Client)?;

    let project = projects
        .create_project(user.id(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(project))
}

/// PUT /api/projects/{id}: the owner edits an open project.
pub async fn update_project(
    user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProject>,
) -> Result<HttpResponse, ServiceError> {
    let project = projects
        .update_project(path.into_inner(), user.id(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

/// POST /api/projects/{id}/cancel
pub async fn cancel_project(
    user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let project = projects
        .cancel_project(path.into_inner(), user.id())
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

/// POST /api/projects/{id}/complete
pub async fn complete_project(
    user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let project = projects
        .complete_project(path.into_inner(), user.id())
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

/// GET /api/projects/client/{client_id}: every project a client has posted.
pub async fn get_projects_by_client(
    _user: AuthenticatedUser,
    projects: web::Data<ProjectService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let list = projects.get_projects_by_client(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(list))
}
