use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::authorization::{require_role, require_self};
use crate::auth::middleware::AuthenticatedUser;
use crate::error::ServiceError;
use crate::models::bids::{SubmitBid, UpdateBid};
use crate::models::users::Roles;
use crate::services::BidService;

/// POST /api/projects/{id}/bids: a freelancer bids on an open project.
pub async fn submit_bid(
    user: AuthenticatedUser,
    bids: web::Data<BidService>,
    path: web::Path<Uuid>,
    body: web::Json<SubmitBid>,
) -> Result<HttpResponse, ServiceError> {
    require_role(&user.0, Roles::Freelancer)?;

    let bid = bids
        .submit_bid(path.into_inner(), user.id(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(bid))
}

/// GET /api/projects/{id}/bids: every bid on a project, oldest first.
pub async fn get_project_bids(
    _user: AuthenticatedUser,
    bids: web::Data<BidService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let list = bids.get_bids_for_project(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// GET /api/bids/{id}
pub async fn get_bid(
    _user: AuthenticatedUser,
    bids: web::Data<BidService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let bid = bids.get_bid(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(bid))
}

/// PUT /api/bids/{id}: the freelancer revises a bid that is still open.
pub async fn update_bid(
    user: AuthenticatedUser,
    bids: web::Data<BidService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBid>,
) -> Result<HttpResponse, ServiceError> {
    let bid = bids
        .update_bid(path.into_inner(), user.id(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(bid))
}

/// POST /api/bids/{id}/accept: the project owner hires this freelancer.
pub async fn accept_bid(
    user: AuthenticatedUser,
    bids: web::Data<BidService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let bid = bids.accept_bid(path.into_inner(), user.id()).await?;
    Ok(HttpResponse::Ok().json(bid))
}

/// POST /api/bids/{id}/reject
pub async fn reject_bid(
    user: AuthenticatedUser,
    bids: web::Data<BidService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let bid = bids.reject_bid(path.into_inner(), user.id()).await?;
    Ok(HttpResponse::Ok().json(bid))
}

/// POST /api/bids/{id}/withdraw
pub async fn withdraw_bid(
    user: AuthenticatedUser,
    bids: web::Data<BidService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let bid_id = path.into_inner();
    bids.withdraw_bid(bid_id, user.id()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Bid {bid_id} withdrawn"),
    })))
}

/// GET /api/freelancers/{id}/bids: a freelancer's own bids across projects.
pub async fn get_freelancer_bids(
    user: AuthenticatedUser,
    bids: web::Data<BidService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let freelancer_id = path.into_inner();
    require_self(&user.0, freelancer_id, "bids")?;

    let list = bids.get_freelancer_bids(freelancer_id).await?;
    Ok(HttpResponse::Ok().json(list))
}
