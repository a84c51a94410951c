//! Black-box tests for the `/api/orders` surface.

#![allow(clippy::unwrap_used)]

use guava_market_integration_tests::{StaticIdentity, TestServer, body_json, claim};
use reqwest::StatusCode;
use serde_json::json;

async fn server() -> TestServer {
    TestServer::spawn(StaticIdentity::new().with_token("tok-maya", claim("maya-uid"))).await
}

/// Create an order and return its generated ID.
async fn create_order(server: &TestServer, fields: serde_json::Value) -> String {
    let resp = server
        .post("/api/orders")
        .bearer_auth("tok-maya")
        .json(&fields)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["message"], "Order created successfully");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_then_get_roundtrip() {
    let server = server().await;
    let id = create_order(&server, json!({"item": "widget"})).await;

    let resp = server
        .get(&format!("/api/orders/{id}"))
        .bearer_auth("tok-maya")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["item"], "widget");
    assert!(body["createdAt"].is_string());
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[tokio::test]
async fn every_route_requires_a_token() {
    let server = server().await;

    for resp in [
        server.get("/api/orders").send().await.unwrap(),
        server.post("/api/orders").json(&json!({})).send().await.unwrap(),
        server.get("/api/orders/any").send().await.unwrap(),
        server.put("/api/orders/any").json(&json!({})).send().await.unwrap(),
        server.delete("/api/orders/any").send().await.unwrap(),
    ] {
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "No token provided");
    }
}

#[tokio::test]
async fn list_returns_a_bare_array() {
    let server = server().await;
    create_order(&server, json!({"item": "widget"})).await;
    create_order(&server, json!({"item": "gadget"})).await;

    let resp = server
        .get("/api/orders")
        .bearer_auth("tok-maya")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o["id"].is_string()));
}

#[tokio::test]
async fn get_missing_order_is_404() {
    let server = server().await;

    let resp = server
        .get("/api/orders/ghost")
        .bearer_auth("tok-maya")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Order not found");
}

#[tokio::test]
async fn update_merges_fields_and_bumps_updated_at() {
    let server = server().await;
    let id = create_order(&server, json!({"item": "widget", "status": "pending"})).await;

    server.clock.advance(chrono::Duration::minutes(10));
    let resp = server
        .put(&format!("/api/orders/{id}"))
        .bearer_auth("tok-maya")
        .json(&json!({"status": "shipped"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["message"], "Order updated successfully");

    let order = body_json(
        server
            .get(&format!("/api/orders/{id}"))
            .bearer_auth("tok-maya")
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(order["item"], "widget");
    assert_eq!(order["status"], "shipped");
    assert_ne!(order["createdAt"], order["updatedAt"]);
}

#[tokio::test]
async fn update_missing_order_is_404() {
    let server = server().await;

    let resp = server
        .put("/api/orders/ghost")
        .bearer_auth("tok-maya")
        .json(&json!({"status": "lost"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let server = server().await;
    let id = create_order(&server, json!({"item": "widget"})).await;

    for _ in 0..2 {
        let resp = server
            .delete(&format!("/api/orders/{id}"))
            .bearer_auth("tok-maya")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["message"], "Order deleted successfully");
    }

    let resp = server
        .get(&format!("/api/orders/{id}"))
        .bearer_auth("tok-maya")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_strips_reserved_fields() {
    let server = server().await;
    let id = create_order(
        &server,
        json!({
            "id": "evil",
            "createdAt": "1970-01-01T00:00:00.000Z",
            "item": "widget"
        }),
    )
    .await;
    assert_ne!(id, "evil");

    let order = body_json(
        server
            .get(&format!("/api/orders/{id}"))
            .bearer_auth("tok-maya")
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(order["id"], id.as_str());
    assert_ne!(order["createdAt"], "1970-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn malformed_body_is_400_with_envelope() {
    let server = server().await;

    let resp = server
        .post("/api/orders")
        .bearer_auth("tok-maya")
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid JSON request body");
}
