//! Bid store.
//!
//! Every function is generic over [`ConnectionTrait`] so the same queries run
//! against the pool or inside a [`DatabaseTransaction`] opened by the service.

use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::bids::{self, BidStatus, SubmitBid, UpdateBid};
use crate::models::projects;

/// Insert a new bid in `Submitted` status.
pub async fn insert_bid<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    freelancer_id: Uuid,
    input: SubmitBid,
) -> Result<bids::Model, DbErr> {
    let new_bid = bids::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        freelancer_id: Set(freelancer_id),
        amount: Set(input.amount),
        message: Set(input.message.trim().to_string()),
        estimated_days: Set(input.estimated_days),
        status: Set(BidStatus::Submitted),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_bid.insert(db).await
}

/// Fetch a single bid by ID.
pub async fn get_bid_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<bids::Model>, DbErr> {
    bids::Entity::find_by_id(id).one(db).await
}

/// Fetch a bid and hold a row lock on it until the surrounding transaction ends.
pub async fn get_bid_for_update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<bids::Model>, DbErr> {
    bids::Entity::find_by_id(id).lock_exclusive().one(db).await
}

/// All bids on a project in submission order.
pub async fn get_bids_by_project_id<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
) -> Result<Vec<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::ProjectId.eq(project_id))
        .order_by_asc(bids::Column::CreatedAt)
        .order_by_asc(bids::Column::Id)
        .all(db)
        .await
}

/// All bids placed by a freelancer, oldest first.
pub async fn get_bids_by_freelancer_id<C: ConnectionTrait>(
    db: &C,
    freelancer_id: Uuid,
) -> Result<Vec<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::FreelancerId.eq(freelancer_id))
        .order_by_asc(bids::Column::CreatedAt)
        .order_by_asc(bids::Column::Id)
        .all(db)
        .await
}

/// Whether the freelancer already holds a submitted bid on the project.
pub async fn open_bid_exists<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    freelancer_id: Uuid,
) -> Result<bool, DbErr> {
    let count = bids::Entity::find()
        .filter(bids::Column::ProjectId.eq(project_id))
        .filter(bids::Column::FreelancerId.eq(freelancer_id))
        .filter(bids::Column::Status.eq(BidStatus::Submitted))
        .count(db)
        .await?;

    Ok(count > 0)
}

/// Apply an edit to a bid's terms.
pub async fn update_bid_terms<C: ConnectionTrait>(
    db: &C,
    bid: bids::Model,
    input: UpdateBid,
) -> Result<bids::Model, DbErr> {
    let mut active: bids::ActiveModel = bid.into();

    if let Some(amount) = input.amount {
        active.amount = Set(amount);
    }
    if let Some(message) = input.message {
        active.message = Set(message.trim().to_string());
    }
    if let Some(days) = input.estimated_days {
        active.estimated_days = Set(Some(days));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Move a bid from `expected` to `next`, but only if it is still in `expected`.
///
/// Returns `None` when the row was missing or had already moved.
pub async fn update_status_if<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    expected: BidStatus,
    next: BidStatus,
) -> Result<Option<bids::Model>, DbErr> {
    let result = bids::Entity::update_many()
        .col_expr(bids::Column::Status, Expr::value(next))
        .col_expr(bids::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(bids::Column::Id.eq(id))
        .filter(bids::Column::Status.eq(expected))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Ok(None);
    }

    bids::Entity::find_by_id(id).one(db).await
}

/// Reject every submitted bid on the project, sparing `keep` if given.
/// Returns how many bids moved.
pub async fn reject_open_bids<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    keep: Option<Uuid>,
) -> Result<u64, DbErr> {
    let mut update = bids::Entity::update_many()
        .col_expr(bids::Column::Status, Expr::value(BidStatus::Rejected))
        .col_expr(bids::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(bids::Column::ProjectId.eq(project_id))
        .filter(bids::Column::Status.eq(BidStatus::Submitted));

    if let Some(keep) = keep {
        update = update.filter(bids::Column::Id.ne(keep));
    }

    let result = update.exec(db).await?;
    Ok(result.rows_affected)
}

pub async fn count_accepted_for_project<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
) -> Result<u64, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::ProjectId.eq(project_id))
        .filter(bids::Column::Status.eq(BidStatus::Accepted))
        .count(db)
        .await
}

/// Bids on any project owned by `client_id`, optionally narrowed to one status.
pub async fn count_bids_for_client<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
    status: Option<BidStatus>,
) -> Result<u64, DbErr> {
    let mut query = bids::Entity::find()
        .inner_join(projects::Entity)
        .filter(projects::Column::ClientId.eq(client_id));

    if let Some(status) = status {
        query = query.filter(bids::Column::Status.eq(status));
    }

    query.count(db).await
}
