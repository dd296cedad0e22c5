use reqwest::StatusCode;
use serde_json::{Value, json};
use warden::auth::Role;
use warden::identity::CredentialStore;
use warden::service::types::{ErrorBody, HealthResponse, ValidationResponse};

use crate::helpers::{
    AuthorityFixture, PASSWORD, add_identity, login, register, spawn_authority,
    spawn_authority_with,
};

async fn get_with_token(
    client: &reqwest::Client,
    fixture: &AuthorityFixture,
    path: &str,
    token: &str,
) -> reqwest::Response {
    client
        .get(fixture.url(path))
        .bearer_auth(token)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn register_login_and_admin_gate() {
    let store = CredentialStore::in_memory();
    add_identity(&store, "admin@x.com", Role::Admin).await;
    let fixture = spawn_authority_with(store).await;
    let client = reqwest::Client::new();

    assert_eq!(
        register(&client, &fixture, "a@x.com", "User").await,
        StatusCode::CREATED
    );
    assert_eq!(
        register(&client, &fixture, "a@x.com", "User").await,
        StatusCode::CONFLICT
    );

    let login = login(&client, &fixture, "a@x.com").await;
    assert_eq!(login.role, Role::User);
    let claims = fixture.state.authority.verify(&login.token).unwrap();
    assert_eq!(claims.role, Role::User);
    assert_eq!(claims.subject, "a@x.com");

    let response = get_with_token(&client, &fixture, "/user/list", &login.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code.as_deref(), Some("insufficient_permissions"));

    let admin = crate::helpers::login(&client, &fixture, "admin@x.com").await;
    let response = get_with_token(&client, &fixture, "/user/list", &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing: Value = response.json().await.unwrap();
    assert_eq!(listing["a@x.com"]["role"], "User");
    assert_eq!(listing["a@x.com"]["name"], "A");
    assert_eq!(listing["admin@x.com"]["role"], "Admin");
    assert!(listing["a@x.com"].get("password_hash").is_none());
}

#[tokio::test]
async fn registration_validation() {
    let fixture = spawn_authority().await;
    let client = reqwest::Client::new();

    assert_eq!(
        register(&client, &fixture, "a@x.com", "Superuser").await,
        StatusCode::BAD_REQUEST
    );

    let response = client
        .post(fixture.url("/user/register"))
        .json(&json!({ "email": "b@x.com", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code.as_deref(), Some("missing_fields"));

    assert!(fixture.state.store.is_empty().await);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let store = CredentialStore::in_memory();
    add_identity(&store, "a@x.com", Role::User).await;
    let fixture = spawn_authority_with(store).await;
    let client = reqwest::Client::new();

    let mut bodies = Vec::new();
    for (email, password) in [("a@x.com", "wrong"), ("nobody@x.com", PASSWORD)] {
        let response = client
            .post(fixture.url("/user/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(response.json::<ErrorBody>().await.unwrap());
    }
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn profile_and_validate() {
    let store = CredentialStore::in_memory();
    add_identity(&store, "a@x.com", Role::User).await;
    let fixture = spawn_authority_with(store).await;
    let client = reqwest::Client::new();
    let token = login(&client, &fixture, "a@x.com").await.token;

    let response = get_with_token(&client, &fixture, "/user/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile, json!({ "email": "a@x.com", "name": "Test", "role": "User" }));

    let response = get_with_token(&client, &fixture, "/auth/validate", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let validated: ValidationResponse = response.json().await.unwrap();
    assert_eq!(validated.email, "a@x.com");
    assert_eq!(validated.role, Role::User);

    // A valid token for an identity the store no longer holds.
    let ghost = fixture.token_for("ghost@x.com", Role::User);
    let response = get_with_token(&client, &fixture, "/user/profile", &ghost).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let fixture = spawn_authority().await;
    let client = reqwest::Client::new();

    let response = client.get(fixture.url("/user/list")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code.as_deref(), Some("missing_token"));

    let response = client
        .get(fixture.url("/auth/validate"))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code.as_deref(), Some("malformed_header"));
}

#[tokio::test]
async fn expired_token_is_rejected_with_expired_code() {
    let fixture = spawn_authority().await;
    let client = reqwest::Client::new();
    let token = fixture.token_for("a@x.com", Role::Admin);
    fixture.clock.advance_secs(24 * 60 * 60);

    let response = get_with_token(&client, &fixture, "/auth/validate", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code.as_deref(), Some("expired"));
}

#[tokio::test]
async fn validate_token_in_body() {
    let fixture = spawn_authority().await;
    let client = reqwest::Client::new();
    let token = fixture.token_for("a@x.com", Role::User);

    let response = client
        .post(fixture.url("/auth/validate-token"))
        .json(&json!({ "token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Token is valid");

    let response = client
        .post(fixture.url("/auth/validate-token"))
        .json(&json!({ "token": "forged" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(fixture.url("/auth/validate-token"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registrations_persist_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("identities.json");
    let client = reqwest::Client::new();

    let fixture = spawn_authority_with(CredentialStore::open(&path).await).await;
    assert_eq!(
        register(&client, &fixture, "a@x.com", "Admin").await,
        StatusCode::CREATED
    );
    fixture.server.stop().await.unwrap();

    let fixture = spawn_authority_with(CredentialStore::open(&path).await).await;
    let login = login(&client, &fixture, "a@x.com").await;
    assert_eq!(login.role, Role::Admin);
}

#[tokio::test]
async fn health() {
    let fixture = spawn_authority().await;
    let health: HealthResponse = reqwest::get(fixture.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.service, "authority");
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let fixture = spawn_authority().await;
    let client = reqwest::Client::new();

    let response = client
        .post(fixture.url("/user/register"))
        .json(&json!({ "email": 5, "password": PASSWORD, "name": "A", "role": "User" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code.as_deref(), Some("invalid_body"));

    let response = client
        .post(fixture.url("/user/login"))
        .body(r#"{"email":"a@x.com","password":"#)
        .header("Content-Type", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code.as_deref(), Some("invalid_body"));

    let response = client
        .post(fixture.url("/user/login"))
        .body(r#"{"email":"a@x.com","password":"x"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code.as_deref(), Some("unsupported_media_type"));

    assert!(fixture.state.store.is_empty().await);
}
