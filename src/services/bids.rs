//! Bid lifecycle.
//!
//! A bid is born `Submitted` and leaves that state exactly once: the owning
//! client accepts or rejects it, or the freelancer withdraws it. Accepting a bid
//! rejects every other submitted bid on the same project.
//!
//! Each transition runs in its own transaction. The project row is locked
//! before the bid row, so all transitions on one project are serialised and
//! locks are always taken in the same order. Returning early drops the
//! transaction, which rolls it back and releases the locks.

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use uuid::Uuid;

use crate::db::bids as bid_db;
use crate::db::projects as project_db;
use crate::error::{ServiceError, ServiceResult};
use crate::models::bids::{self, BidResponse, BidStatus, SubmitBid, UpdateBid};
use crate::models::projects::{self, ProjectStatus};

const DUPLICATE_BID: &str = "You already have an open bid on this project";

#[derive(Clone)]
pub struct BidService {
    db: DatabaseConnection,
}

impl BidService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Place a new bid on an open project.
    pub async fn submit_bid(
        &self,
        project_id: Uuid,
        freelancer_id: Uuid,
        request: SubmitBid,
    ) -> ServiceResult<BidResponse> {
        request.validate().map_err(ServiceError::Validation)?;

        let txn = self.db.begin().await?;

        let project = project_db::get_project_for_update(&txn, project_id)
            .await?
            .ok_or_else(|| ServiceError::Validation(format!("Project {project_id} does not exist")))?;

        if project.status != ProjectStatus::Open {
            return Err(ServiceError::Validation(format!(
                "Project {project_id} is not open for bidding"
            )));
        }
        if project.client_id == freelancer_id {
            return Err(ServiceError::Validation(
                "You cannot bid on your own project".to_string(),
            ));
        }
        if bid_db::open_bid_exists(&txn, project_id, freelancer_id).await? {
            return Err(ServiceError::Conflict(DUPLICATE_BID.to_string()));
        }

        let bid = bid_db::insert_bid(&txn, project_id, freelancer_id, request)
            .await
            .map_err(|e| ServiceError::from_write(e, DUPLICATE_BID))?;

        txn.commit().await?;

        tracing::info!(
            bid_id = %bid.id,
            project_id = %project_id,
            freelancer_id = %freelancer_id,
            amount = bid.amount,
            "Bid submitted"
        );
        Ok(bid.into())
    }

    pub async fn get_bid(&self, bid_id: Uuid) -> ServiceResult<BidResponse> {
        bid_db::get_bid_by_id(&self.db, bid_id)
            .await?
            .map(BidResponse::from)
            .ok_or_else(|| ServiceError::not_found("Bid", bid_id))
    }

    /// Every bid on the project regardless of status, in submission order.
    pub async fn get_bids_for_project(&self, project_id: Uuid) -> ServiceResult<Vec<BidResponse>> {
        if project_db::get_project_by_id(&self.db, project_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Project", project_id));
        }

        let bids = bid_db::get_bids_by_project_id(&self.db, project_id).await?;
        Ok(bids.into_iter().map(BidResponse::from).collect())
    }

    pub async fn get_freelancer_bids(&self, freelancer_id: Uuid) -> ServiceResult<Vec<BidResponse>> {
        let bids = bid_db::get_bids_by_freelancer_id(&self.db, freelancer_id).await?;
        Ok(bids.into_iter().map(BidResponse::from).collect())
    }

    /// Change the terms of a bid the freelancer still has open.
    pub async fn update_bid(
        &self,
        bid_id: Uuid,
        freelancer_id: Uuid,
        changes: UpdateBid,
    ) -> ServiceResult<BidResponse> {
        changes.validate().map_err(ServiceError::Validation)?;

        let txn = self.db.begin().await?;
        let (bid, _) = lock_bid(&txn, bid_id).await?;

        if bid.freelancer_id != freelancer_id {
            return Err(ServiceError::Authorization(
                "You can only edit your own bids".to_string(),
            ));
        }
        if bid.status != BidStatus::Submitted {
            return Err(ServiceError::State(format!(
                "Bid {bid_id} is already {}; only submitted bids can be edited",
                bid.status.as_str()
            )));
        }

        let updated = bid_db::update_bid_terms(&txn, bid, changes).await?;
        txn.commit().await?;

        tracing::info!(bid_id = %bid_id, "Bid terms updated");
        Ok(updated.into())
    }

    /// Accept a bid and reject every other open bid on the project.
    pub async fn accept_bid(&self, bid_id: Uuid, client_id: Uuid) -> ServiceResult<BidResponse> {
        let txn = self.db.begin().await?;
        let (bid, project) = lock_bid(&txn, bid_id).await?;

        ensure_project_owner(&project, client_id, "accept")?;
        ensure_transition(&bid, BidStatus::Accepted)?;

        if project.status != ProjectStatus::Open {
            return Err(ServiceError::State(format!(
                "Project {} is {} and no longer accepting bids",
                project.id,
                project.status.as_str()
            )));
        }
        if bid_db::count_accepted_for_project(&txn, project.id).await? > 0 {
            return Err(ServiceError::State(format!(
                "Project {} already has an accepted bid",
                project.id
            )));
        }

        let accepted =
            bid_db::update_status_if(&txn, bid_id, BidStatus::Submitted, BidStatus::Accepted)
                .await?
                .ok_or_else(|| moved_underneath(bid_id))?;
        let rejected = bid_db::reject_open_bids(&txn, project.id, Some(bid_id)).await?;
        let project_id = project.id;
        project_db::set_project_status(&txn, project, ProjectStatus::InProgress).await?;

        txn.commit().await?;

        tracing::info!(
            bid_id = %bid_id,
            project_id = %project_id,
            rejected,
            "Bid accepted"
        );
        Ok(accepted.into())
    }

    pub async fn reject_bid(&self, bid_id: Uuid, client_id: Uuid) -> ServiceResult<BidResponse> {
        let txn = self.db.begin().await?;
        let (bid, project) = lock_bid(&txn, bid_id).await?;

        ensure_project_owner(&project, client_id, "reject")?;
        ensure_transition(&bid, BidStatus::Rejected)?;

        let rejected =
            bid_db::update_status_if(&txn, bid_id, BidStatus::Submitted, BidStatus::Rejected)
                .await?
                .ok_or_else(|| moved_underneath(bid_id))?;

        txn.commit().await?;

        tracing::info!(bid_id = %bid_id, project_id = %project.id, "Bid rejected");
        Ok(rejected.into())
    }

    /// Withdraw one of the caller's own bids. Other bids on the project stay as they are.
    pub async fn withdraw_bid(&self, bid_id: Uuid, freelancer_id: Uuid) -> ServiceResult<()> {
        let txn = self.db.begin().await?;
        let (bid, _) = lock_bid(&txn, bid_id).await?;

        if bid.freelancer_id != freelancer_id {
            return Err(ServiceError::Authorization(
                "You can only withdraw your own bids".to_string(),
            ));
        }
        ensure_transition(&bid, BidStatus::Withdrawn)?;

        bid_db::update_status_if(&txn, bid_id, BidStatus::Submitted, BidStatus::Withdrawn)
            .await?
            .ok_or_else(|| moved_underneath(bid_id))?;

        txn.commit().await?;

        tracing::info!(bid_id = %bid_id, freelancer_id = %freelancer_id, "Bid withdrawn");
        Ok(())
    }
}

/// Lock the bid's project and then the bid itself.
async fn lock_bid(
    txn: &DatabaseTransaction,
    bid_id: Uuid,
) -> ServiceResult<(bids::Model, projects::Model)> {
    let project_id = bid_db::get_bid_by_id(txn, bid_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Bid", bid_id))?
        .project_id;

    let project = project_db::get_project_for_update(txn, project_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Project", project_id))?;

    // Re-read under the project lock; a concurrent transition may have committed.
    let bid = bid_db::get_bid_for_update(txn, bid_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Bid", bid_id))?;

    Ok((bid, project))
}

fn ensure_project_owner(project: &projects::Model, client_id: Uuid, action: &str) -> ServiceResult<()> {
    if project.client_id != client_id {
        return Err(ServiceError::Authorization(format!(
            "Only the project owner can {action} bids on this project"
        )));
    }
    Ok(())
}

fn ensure_transition(bid: &bids::Model, next: BidStatus) -> ServiceResult<()> {
    if bid.status.can_transition_to(next) {
        return Ok(());
    }
    Err(ServiceError::State(format!(
        "Bid {} is already {}; only submitted bids can be {}",
        bid.id,
        bid.status.as_str(),
        next.as_str()
    )))
}

fn moved_underneath(bid_id: Uuid) -> ServiceError {
    ServiceError::State(format!("Bid {bid_id} is no longer submitted"))
}
