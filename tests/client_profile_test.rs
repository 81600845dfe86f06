//! Client profiles and their derived stats.
//!
//! Run with: `cargo test --test client_profile_test`
mod common;

use common::fixture;
use marketplace_backend::error::ServiceError;
use marketplace_backend::models::clients::{ClientStats, CreateClientProfile, UpdateClientProfile};
use uuid::Uuid;

fn acme() -> CreateClientProfile {
    CreateClientProfile {
        company_name: Some("Acme Ltd".to_string()),
        bio: Some("We build rockets".to_string()),
        location: Some("Berlin".to_string()),
        website: Some("https://acme.example".to_string()),
    }
}

#[tokio::test]
async fn test_create_and_fetch_profile_by_email() {
    let fx = fixture().await;
    let client = fx.client().await;
    let email = fx.email_of(client).await;

    let created = fx.clients.create_profile(client, &email, acme()).await.unwrap();
    assert_eq!(created.id, client);
    assert_eq!(created.email, email);
    assert_eq!(created.company_name.as_deref(), Some("Acme Ltd"));

    // Lookups ignore case and surrounding whitespace.
    let fetched = fx
        .clients
        .get_profile(&format!("  {}  ", email.to_uppercase()))
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_second_profile_for_same_account_conflicts() {
    let fx = fixture().await;
    let client = fx.client().await;
    let email = fx.email_of(client).await;
    fx.clients.create_profile(client, &email, acme()).await.unwrap();

    let err = fx
        .clients
        .create_profile(client, &email, CreateClientProfile::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_invalid_website_is_rejected() {
    let fx = fixture().await;
    let client = fx.client().await;
    let email = fx.email_of(client).await;

    let mut request = acme();
    request.website = Some("acme.example".to_string());
    let err = fx.clients.create_profile(client, &email, request).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)), "got {err:?}");

    let err = fx.clients.get_profile(&email).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_only_owner_can_update_or_delete() {
    let fx = fixture().await;
    let owner = fx.client().await;
    let stranger = fx.client().await;
    let email = fx.email_of(owner).await;
    fx.clients.create_profile(owner, &email, acme()).await.unwrap();

    let changes = UpdateClientProfile {
        location: Some("Lisbon".to_string()),
        ..Default::default()
    };

    let err = fx
        .clients
        .update_profile(&email, stranger, changes.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)), "got {err:?}");

    let err = fx.clients.delete_profile(&email, stranger).await.unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)), "got {err:?}");

    let updated = fx.clients.update_profile(&email, owner, changes).await.unwrap();
    assert_eq!(updated.location.as_deref(), Some("Lisbon"));
    assert_eq!(updated.company_name.as_deref(), Some("Acme Ltd"));
    assert!(updated.updated_at.is_some());

    fx.clients.delete_profile(&email, owner).await.unwrap();
    let err = fx.clients.get_profile(&email).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unknown_email_is_not_found() {
    let fx = fixture().await;

    let err = fx
        .clients
        .get_stats("nobody@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "got {err:?}");

    let err = fx
        .clients
        .delete_profile("nobody@example.com", Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_stats_follow_projects_and_bids() {
    let fx = fixture().await;
    let client = fx.client().await;
    let email = fx.email_of(client).await;
    fx.clients.create_profile(client, &email, acme()).await.unwrap();

    assert_eq!(fx.clients.get_stats(&email).await.unwrap(), ClientStats::default());

    let hired = fx.project(client).await;
    let still_open = fx.project(client).await;
    let f1 = fx.freelancer().await;
    let f2 = fx.freelancer().await;

    let winner = fx.bid(hired, f1, 100).await;
    fx.bid(hired, f2, 90).await;
    fx.bid(still_open, f1, 200).await;
    fx.bids.accept_bid(winner.id, client).await.unwrap();

    // Another client's activity does not leak in.
    let other = fx.client().await;
    let foreign = fx.project(other).await;
    fx.bid(foreign, f2, 50).await;

    let stats = fx.clients.get_stats(&email).await.unwrap();
    assert_eq!(
        stats,
        ClientStats {
            projects_posted: 2,
            open_projects: 1,
            bids_received: 3,
            hires_made: 1,
        }
    );

    let combined = fx.clients.get_profile_with_stats(&email).await.unwrap();
    assert_eq!(combined.stats, stats);
    assert_eq!(combined.profile.id, client);
}

#[tokio::test]
async fn test_list_profiles_paginates() {
    let fx = fixture().await;
    for _ in 0..3 {
        let client = fx.client().await;
        let email = fx.email_of(client).await;
        fx.clients
            .create_profile(client, &email, CreateClientProfile::default())
            .await
            .unwrap();
    }

    assert_eq!(fx.clients.list_profiles(1, 2).await.unwrap().len(), 2);
    assert_eq!(fx.clients.list_profiles(2, 2).await.unwrap().len(), 1);
    assert!(fx.clients.list_profiles(3, 2).await.unwrap().is_empty());
}
