//! Black-box tests for the `/api/users` surface.

#![allow(clippy::unwrap_used)]

use guava_market_integration_tests::{StaticIdentity, TestServer, body_json, claim};
use reqwest::StatusCode;
use serde_json::json;

async fn server() -> TestServer {
    let server =
        TestServer::spawn(StaticIdentity::new().with_token("tok-admin", claim("admin-uid"))).await;

    // Seed two profiles the way the profile store writes them.
    server
        .documents
        .insert(
            "users",
            "maya-uid",
            json!({
                "phoneNumber": "+15551234567",
                "displayName": "Maya",
                "createdAt": "2026-01-10T09:00:00.000Z",
                "updatedAt": "2026-01-10T09:00:00.000Z"
            }),
        )
        .await;
    server
        .documents
        .insert(
            "users",
            "ravi-uid",
            json!({"phoneNumber": "+15557654321", "displayName": "Ravi"}),
        )
        .await;

    server
}

#[tokio::test]
async fn every_route_requires_a_token() {
    let server = server().await;

    for resp in [
        server.get("/api/users").send().await.unwrap(),
        server.get("/api/users/maya-uid").send().await.unwrap(),
        server.put("/api/users/maya-uid").json(&json!({})).send().await.unwrap(),
        server.delete("/api/users/maya-uid").send().await.unwrap(),
    ] {
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["error"], "No token provided");
    }
}

#[tokio::test]
async fn list_returns_a_bare_array_of_profiles() {
    let server = server().await;

    let resp = server
        .get("/api/users")
        .bearer_auth("tok-admin")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().any(|u| u["id"] == "maya-uid"));
    assert!(users.iter().any(|u| u["id"] == "ravi-uid"));
}

#[tokio::test]
async fn get_returns_the_profile() {
    let server = server().await;

    let resp = server
        .get("/api/users/maya-uid")
        .bearer_auth("tok-admin")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["id"], "maya-uid");
    assert_eq!(body["displayName"], "Maya");
    assert_eq!(body["createdAt"], "2026-01-10T09:00:00.000Z");
}

#[tokio::test]
async fn get_missing_user_is_404() {
    let server = server().await;

    let resp = server
        .get("/api/users/ghost")
        .bearer_auth("tok-admin")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"], "User not found");
}

#[tokio::test]
async fn update_applies_the_allow_list() {
    let server = server().await;

    let resp = server
        .put("/api/users/maya-uid")
        .bearer_auth("tok-admin")
        .json(&json!({"displayName": "Maya L."}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["message"], "User updated successfully");

    let user = body_json(
        server
            .get("/api/users/maya-uid")
            .bearer_auth("tok-admin")
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(user["displayName"], "Maya L.");
    // Untouched and server-managed fields survive.
    assert_eq!(user["phoneNumber"], "+15551234567");
    assert_eq!(user["createdAt"], "2026-01-10T09:00:00.000Z");
}

#[tokio::test]
async fn update_rejects_unknown_fields() {
    let server = server().await;

    let resp = server
        .put("/api/users/maya-uid")
        .bearer_auth("tok-admin")
        .json(&json!({"isAdmin": true}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "Unknown field: isAdmin");
}

#[tokio::test]
async fn update_missing_user_is_404() {
    let server = server().await;

    let resp = server
        .put("/api/users/ghost")
        .bearer_auth("tok-admin")
        .json(&json!({"displayName": "Ghost"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"], "User not found");
}

#[tokio::test]
async fn delete_is_idempotent() {
    let server = server().await;

    for _ in 0..2 {
        let resp = server
            .delete("/api/users/maya-uid")
            .bearer_auth("tok-admin")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["message"], "User deleted successfully");
    }

    let resp = server
        .get("/api/users/maya-uid")
        .bearer_auth("tok-admin")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
