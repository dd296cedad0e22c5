use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use warden::auth::{AccessGate, Role};
use warden::catalog::Destination;
use warden::remote::RemoteTrustDelegate;
use warden::service::types::ErrorBody;

use crate::helpers::{AuthorityFixture, closed_port_url, spawn_authority, spawn_destinations};

/// A destination service delegating to `fixture`.
async fn delegated(
    fixture: &AuthorityFixture,
) -> (warden::service::RunningServer, Arc<warden::catalog::DestinationCatalog>) {
    let delegate = RemoteTrustDelegate::new(&fixture.server.base_url()).unwrap();
    spawn_destinations(AccessGate::new(Arc::new(delegate))).await
}

#[tokio::test]
async fn reads_are_public_and_ordered() {
    let fixture = spawn_authority().await;
    let (server, _) = delegated(&fixture).await;

    let list: Vec<Destination> = reqwest::get(format!("{}/destinations", server.base_url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = list.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
    assert_eq!(list[0].name, "Maldives Resort");

    let one: Destination = reqwest::get(format!("{}/destinations/2", server.base_url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(one.price_per_night, 250.0);

    let response = reqwest::get(format!("{}/destinations/99", server.base_url()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_through_live_authority() {
    let fixture = spawn_authority().await;
    let (server, catalog) = delegated(&fixture).await;
    let client = reqwest::Client::new();
    let url = |id: &str| format!("{}/destinations/{id}", server.base_url());

    let user = fixture.token_for("u@x.com", Role::User);
    let response = client.delete(url("1")).bearer_auth(&user).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(catalog.get("1").await.is_some());

    let response = client.delete(url("1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code.as_deref(), Some("missing_token"));

    let admin = fixture.token_for("a@x.com", Role::Admin);
    let response = client.delete(url("1")).bearer_auth(&admin).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Destination deleted");
    assert!(catalog.get("1").await.is_none());

    let response = client.delete(url("1")).bearer_auth(&admin).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_token_is_unauthorized_through_delegate() {
    let fixture = spawn_authority().await;
    let (server, catalog) = delegated(&fixture).await;
    let admin = fixture.token_for("a@x.com", Role::Admin);
    fixture.clock.advance_secs(24 * 60 * 60);

    let response = reqwest::Client::new()
        .delete(format!("{}/destinations/2", server.base_url()))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code.as_deref(), Some("expired"));
    assert_eq!(catalog.len().await, 2);
}

#[tokio::test]
async fn authority_down_denies_mutation() {
    let fixture = spawn_authority().await;
    let admin = fixture.token_for("a@x.com", Role::Admin);

    let delegate =
        RemoteTrustDelegate::with_timeout(&closed_port_url(), Duration::from_secs(2)).unwrap();
    let (server, catalog) = spawn_destinations(AccessGate::new(Arc::new(delegate))).await;

    let response = reqwest::Client::new()
        .delete(format!("{}/destinations/1", server.base_url()))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(catalog.len().await, 2);
}

#[tokio::test]
async fn create_and_replace() {
    let fixture = spawn_authority().await;
    let (server, catalog) = delegated(&fixture).await;
    let client = reqwest::Client::new();
    let admin = fixture.token_for("a@x.com", Role::Admin);
    let base = server.base_url();

    let reykjavik = json!({
        "id": "3",
        "name": "Reykjavik Lodge",
        "description": "Northern lights",
        "location": "Iceland",
        "price_per_night": 320.0,
    });

    let response = client
        .post(format!("{base}/destinations"))
        .bearer_auth(&admin)
        .json(&reykjavik)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{base}/destinations"))
        .bearer_auth(&admin)
        .json(&reykjavik)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .post(format!("{base}/destinations"))
        .bearer_auth(&admin)
        .json(&json!({
            "id": "4",
            "name": "Free lunch",
            "description": "",
            "location": "Nowhere",
            "price_per_night": -5.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Path id wins over the body.
    let response = client
        .put(format!("{base}/destinations/3"))
        .bearer_auth(&admin)
        .json(&json!({
            "id": "something-else",
            "name": "Reykjavik Lodge",
            "description": "Northern lights",
            "location": "Iceland",
            "price_per_night": 280.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stored: Destination = response.json().await.unwrap();
    assert_eq!(stored.id, "3");
    assert_eq!(catalog.get("3").await.unwrap().price_per_night, 280.0);
    assert!(catalog.get("something-else").await.is_none());

    let user = fixture.token_for("u@x.com", Role::User);
    let response = client
        .post(format!("{base}/destinations"))
        .bearer_auth(&user)
        .json(&reykjavik)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn local_verification_with_shared_secret() {
    let fixture = spawn_authority().await;
    let admin = fixture.token_for("a@x.com", Role::Admin);
    let gate = AccessGate::new(fixture.state.authority.clone());
    // The authority is not consulted.
    fixture.server.stop().await.unwrap();

    let (server, catalog) = spawn_destinations(gate).await;
    let response = reqwest::Client::new()
        .delete(format!("{}/destinations/2", server.base_url()))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(catalog.get("2").await.is_none());
}

#[tokio::test]
async fn malformed_destination_bodies_get_json_errors() {
    let fixture = spawn_authority().await;
    let (server, catalog) = delegated(&fixture).await;
    let client = reqwest::Client::new();
    let admin = fixture.token_for("a@x.com", Role::Admin);
    let base = server.base_url();

    let response = client
        .post(format!("{base}/destinations"))
        .bearer_auth(&admin)
        .json(&json!({
            "id": "5",
            "description": "No name",
            "location": "Somewhere",
            "price_per_night": 10.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code.as_deref(), Some("missing_fields"));
    assert!(body.message.contains("name"));

    let response = client
        .put(format!("{base}/destinations/1"))
        .bearer_auth(&admin)
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code.as_deref(), Some("unsupported_media_type"));

    assert_eq!(catalog.len().await, 2);
    assert_eq!(catalog.get("1").await.unwrap().name, "Maldives Resort");
}
