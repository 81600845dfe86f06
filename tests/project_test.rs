//! Project posting and project status changes.
//!
//! Run with: `cargo test --test project_test`
mod common;

use common::fixture;
use marketplace_backend::error::ServiceError;
use marketplace_backend::models::projects::{CreateProject, ProjectStatus, UpdateProject};

#[tokio::test]
async fn test_create_project_validates_input() {
    let fx = fixture().await;
    let client = fx.client().await;

    let err = fx
        .projects
        .create_project(
            client,
            CreateProject {
                title: "  ".to_string(),
                description: "Something".to_string(),
                budget: 100,
                category: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)), "got {err:?}");

    let err = fx
        .projects
        .create_project(
            client,
            CreateProject {
                title: "Logo".to_string(),
                description: "A new logo".to_string(),
                budget: 0,
                category: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_open_listing_hides_taken_projects() {
    let fx = fixture().await;
    let client = fx.client().await;
    let freelancer = fx.freelancer().await;
    let open = fx.project(client).await;
    let taken = fx.project(client).await;
    let cancelled = fx.project(client).await;

    let bid = fx.bid(taken, freelancer, 100).await;
    fx.bids.accept_bid(bid.id, client).await.unwrap();
    fx.projects.cancel_project(cancelled, client).await.unwrap();

    let listed = fx.projects.list_open_projects(1, 20).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, open);

    let all = fx.projects.get_projects_by_client(client).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_update_project_owner_only_while_open() {
    let fx = fixture().await;
    let owner = fx.client().await;
    let stranger = fx.client().await;
    let freelancer = fx.freelancer().await;
    let project = fx.project(owner).await;

    let changes = UpdateProject {
        budget: Some(750),
        ..Default::default()
    };

    let err = fx
        .projects
        .update_project(project, stranger, changes.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)), "got {err:?}");

    let updated = fx
        .projects
        .update_project(project, owner, changes.clone())
        .await
        .unwrap();
    assert_eq!(updated.budget, 750);

    let bid = fx.bid(project, freelancer, 700).await;
    fx.bids.accept_bid(bid.id, owner).await.unwrap();

    let err = fx
        .projects
        .update_project(project, owner, changes)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::State(_)), "got {err:?}");
}

#[tokio::test]
async fn test_complete_requires_an_accepted_bid_first() {
    let fx = fixture().await;
    let client = fx.client().await;
    let freelancer = fx.freelancer().await;
    let project = fx.project(client).await;

    let err = fx
        .projects
        .complete_project(project, client)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::State(_)), "got {err:?}");

    let bid = fx.bid(project, freelancer, 100).await;
    fx.bids.accept_bid(bid.id, client).await.unwrap();

    let done = fx.projects.complete_project(project, client).await.unwrap();
    assert_eq!(done.status, ProjectStatus::Completed);

    let err = fx.projects.cancel_project(project, client).await.unwrap_err();
    assert!(matches!(err, ServiceError::State(_)), "got {err:?}");
}

#[tokio::test]
async fn test_missing_project_is_not_found() {
    let fx = fixture().await;
    let client = fx.client().await;
    let missing = uuid::Uuid::new_v4();

    let err = fx.projects.get_project(missing).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "got {err:?}");

    let err = fx
        .projects
        .cancel_project(missing, client)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "got {err:?}");
}
