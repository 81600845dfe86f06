//! The migrated schema enforces the bid invariants on its own, and its
//! constraint errors surface as `Conflict`.
//!
//! Run with: `cargo test --test migration_schema_test`
mod common;

use common::{migrated_fixture, submit};
use marketplace_backend::db::bids as bid_db;
use marketplace_backend::db::users as user_db;
use marketplace_backend::error::ServiceError;
use marketplace_backend::handlers::users::ACCOUNT_IN_USE;
use marketplace_backend::models::bids::BidStatus;
use marketplace_backend::models::projects::ProjectStatus;

#[tokio::test]
async fn test_second_open_bid_hits_the_unique_index() {
    let fx = migrated_fixture().await;
    let client = fx.client().await;
    let freelancer = fx.freelancer().await;
    let project = fx.project(client).await;
    fx.bid(project, freelancer, 100).await;

    // Straight to the store, past the service's own duplicate check.
    let err = bid_db::insert_bid(&fx.db, project, freelancer, submit(120))
        .await
        .unwrap_err();
    let mapped = ServiceError::from_write(err, "duplicate bid");
    assert!(matches!(mapped, ServiceError::Conflict(ref m) if m == "duplicate bid"), "got {mapped:?}");

    let bids = fx.bids.get_bids_for_project(project).await.unwrap();
    assert_eq!(bids.len(), 1);
}

#[tokio::test]
async fn test_open_bid_index_ignores_closed_bids() {
    let fx = migrated_fixture().await;
    let client = fx.client().await;
    let freelancer = fx.freelancer().await;
    let project = fx.project(client).await;
    let first = fx.bid(project, freelancer, 100).await;
    fx.bids.withdraw_bid(first.id, freelancer).await.unwrap();

    let again = bid_db::insert_bid(&fx.db, project, freelancer, submit(90))
        .await
        .unwrap();
    assert_eq!(again.status, BidStatus::Submitted);
}

#[tokio::test]
async fn test_second_accepted_bid_hits_the_unique_index() {
    let fx = migrated_fixture().await;
    let client = fx.client().await;
    let f1 = fx.freelancer().await;
    let f2 = fx.freelancer().await;
    let project = fx.project(client).await;
    let b1 = fx.bid(project, f1, 100).await;
    let b2 = fx.bid(project, f2, 90).await;

    bid_db::update_status_if(&fx.db, b1.id, BidStatus::Submitted, BidStatus::Accepted)
        .await
        .unwrap()
        .expect("first accept applies");

    let err = bid_db::update_status_if(&fx.db, b2.id, BidStatus::Submitted, BidStatus::Accepted)
        .await
        .unwrap_err();
    let mapped = ServiceError::from_write(err, "already accepted");
    assert!(matches!(mapped, ServiceError::Conflict(_)), "got {mapped:?}");

    assert_eq!(fx.stored_bid(b2.id).await.status, BidStatus::Submitted);
}

#[tokio::test]
async fn test_account_with_bids_cannot_be_deleted() {
    let fx = migrated_fixture().await;
    let client = fx.client().await;
    let freelancer = fx.freelancer().await;
    let idle = fx.freelancer().await;
    let project = fx.project(client).await;
    fx.bid(project, freelancer, 100).await;

    let err = user_db::delete_user(&fx.db, freelancer).await.unwrap_err();
    let mapped = ServiceError::from_delete(err, ACCOUNT_IN_USE);
    assert!(matches!(mapped, ServiceError::Conflict(ref m) if m == ACCOUNT_IN_USE), "got {mapped:?}");
    assert!(user_db::get_user_by_id(&fx.db, freelancer).await.unwrap().is_some());

    // The project owner is blocked too: its project has received a bid.
    let err = user_db::delete_user(&fx.db, client).await.unwrap_err();
    assert!(matches!(
        ServiceError::from_delete(err, ACCOUNT_IN_USE),
        ServiceError::Conflict(_)
    ));

    let result = user_db::delete_user(&fx.db, idle).await.unwrap();
    assert_eq!(result.rows_affected, 1);
}

#[tokio::test]
async fn test_lifecycle_runs_on_the_migrated_schema() {
    let fx = migrated_fixture().await;
    let client = fx.client().await;
    let f1 = fx.freelancer().await;
    let f2 = fx.freelancer().await;
    let project = fx.project(client).await;
    let b1 = fx.bid(project, f1, 100).await;
    let b2 = fx.bid(project, f2, 90).await;

    fx.bids.accept_bid(b1.id, client).await.unwrap();

    assert_eq!(fx.stored_bid(b1.id).await.status, BidStatus::Accepted);
    assert_eq!(fx.stored_bid(b2.id).await.status, BidStatus::Rejected);
    assert_eq!(
        fx.stored_project(project).await.status,
        ProjectStatus::InProgress
    );

    let err = fx.bids.accept_bid(b2.id, client).await.unwrap_err();
    assert!(matches!(err, ServiceError::State(_)), "got {err:?}");
}
