//! Bearer token checks for projects that sign with a shared HS256 secret.
//!
//! Run with: `cargo test --test auth_test`
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use marketplace_backend::auth::jwt::{
    Claims, TokenError, TokenVerifier, UserMetadata, validate_token_with_secret,
};

const SECRET: &str = "hs256-secret-for-tests-0123456789abcdef";

fn now() -> usize {
    Utc::now().timestamp() as usize
}

/// Claims for `sub`, valid for an hour, with nothing optional filled in.
fn bare_claims(sub: &str) -> Claims {
    Claims {
        sub: sub.to_string(),
        exp: now() + 3600,
        iat: Some(now()),
        iss: None,
        email: None,
        role: Some("authenticated".to_string()),
        user_metadata: None,
    }
}

fn metadata(name: Option<&str>, picture: Option<&str>, email: Option<&str>) -> UserMetadata {
    UserMetadata {
        full_name: None,
        name: name.map(str::to_string),
        avatar_url: None,
        picture: picture.map(str::to_string),
        email: email.map(str::to_string),
        email_verified: Some(true),
    }
}

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("signing test token")
}

#[test]
fn test_signed_token_round_trips_identity() {
    let freelancer = Uuid::new_v4();
    let mut claims = bare_claims(&freelancer.to_string());
    claims.email = Some("freelancer@example.com".to_string());
    claims.user_metadata = Some(UserMetadata {
        full_name: Some("Fran Lancer".to_string()),
        avatar_url: Some("https://example.com/fran.png".to_string()),
        ..metadata(None, None, None)
    });

    let decoded = validate_token_with_secret(&sign(&claims, SECRET), SECRET).unwrap();

    assert_eq!(decoded.user_id().unwrap(), freelancer);
    assert_eq!(decoded.user_email().as_deref(), Some("freelancer@example.com"));
    assert_eq!(decoded.display_name().as_deref(), Some("Fran Lancer"));
    assert_eq!(decoded.avatar_url().as_deref(), Some("https://example.com/fran.png"));
}

#[test]
fn test_expiry_beyond_leeway_is_refused() {
    let mut claims = bare_claims(&Uuid::new_v4().to_string());
    claims.exp = now() - 120;

    let result = validate_token_with_secret(&sign(&claims, SECRET), SECRET);
    assert!(matches!(result, Err(TokenError::Expired)));
}

#[test]
fn test_token_from_another_project_is_refused() {
    let claims = bare_claims(&Uuid::new_v4().to_string());
    let foreign = sign(&claims, "some-other-projects-secret-fedcba9876543210");

    let result = validate_token_with_secret(&foreign, SECRET);
    assert!(matches!(result, Err(TokenError::BadSignature)));
}

#[test]
fn test_non_jwt_input_is_malformed() {
    for input in ["", "bearer", "a.b", "not.a.valid.jwt"] {
        let result = validate_token_with_secret(input, SECRET);
        assert!(
            matches!(result, Err(TokenError::Malformed(_))),
            "{input:?} gave {result:?}"
        );
    }
}

#[tokio::test]
async fn test_secret_verifier_checks_its_own_secret() {
    let client = Uuid::new_v4();
    let token = sign(&bare_claims(&client.to_string()), SECRET);

    let ours = TokenVerifier::Secret(SECRET.to_string());
    assert_eq!(ours.verify(&token).await.unwrap().user_id().unwrap(), client);

    let theirs = TokenVerifier::Secret("some-other-projects-secret-fedcba9876543210".to_string());
    assert!(matches!(
        theirs.verify(&token).await,
        Err(TokenError::BadSignature)
    ));
}

#[test]
fn test_identity_falls_back_to_provider_metadata() {
    let mut claims = bare_claims("not-a-uuid");
    claims.user_metadata = Some(metadata(
        Some("dana"),
        Some("https://example.com/dana.png"),
        Some("dana@example.com"),
    ));

    assert_eq!(claims.user_email().as_deref(), Some("dana@example.com"));
    assert_eq!(claims.display_name().as_deref(), Some("dana"));
    assert_eq!(claims.avatar_url().as_deref(), Some("https://example.com/dana.png"));
    assert!(matches!(claims.user_id(), Err(TokenError::BadSubject(_))));
}

#[test]
fn test_top_level_email_wins_and_absent_metadata_gives_none() {
    let mut claims = bare_claims(&Uuid::new_v4().to_string());
    assert!(claims.user_email().is_none());
    assert!(claims.display_name().is_none());
    assert!(claims.avatar_url().is_none());

    claims.email = Some("top@example.com".to_string());
    claims.user_metadata = Some(metadata(None, None, Some("provider@example.com")));
    assert_eq!(claims.user_email().as_deref(), Some("top@example.com"));
}
