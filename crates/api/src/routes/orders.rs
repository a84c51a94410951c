//! Order routes: CRUD over the `orders` collection.
//!
//! All routes require a verified bearer token. Orders are not scoped to the
//! caller: any authenticated account may read or modify any order. The
//! response shapes here predate this service and are kept for the mobile
//! clients: listing returns a bare array, mutations return `{message}`.

use axum::{
    Json,
    extract::{Path, State},
};
use guava_market_core::OrderId;
use serde::Serialize;

use super::MessageResponse;
use crate::error::{ApiError, Result};
use crate::extract::ApiJson;
use crate::firebase::JsonMap;
use crate::middleware::RequireUser;
use crate::models::{Order, OrderFields};
use crate::state::AppState;

/// Response from creating an order.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub id: OrderId,
    pub message: &'static str,
}

/// List every order.
///
/// GET /api/orders
///
/// # Errors
///
/// Returns 500 if the store is unreachable.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
) -> Result<Json<Vec<Order>>> {
    let orders = state.orders().list().await?;
    Ok(Json(orders))
}

/// Create an order from arbitrary caller fields.
///
/// POST /api/orders
///
/// # Errors
///
/// Returns 400 for a malformed body, 500 if the write fails.
pub async fn create(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    ApiJson(payload): ApiJson<JsonMap>,
) -> Result<Json<CreateOrderResponse>> {
    let fields = OrderFields::parse(&payload);
    let id = state.orders().create(fields.into_map()).await?;

    Ok(Json(CreateOrderResponse {
        id,
        message: "Order created successfully",
    }))
}

/// Fetch a single order.
///
/// GET /api/orders/{id}
///
/// # Errors
///
/// Returns 404 if the order does not exist.
pub async fn show(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let id = order_id(&id)?;
    let order = state
        .orders()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Ok(Json(order))
}

/// Merge caller fields into an existing order.
///
/// PUT /api/orders/{id}
///
/// # Errors
///
/// Returns 404 if the order does not exist.
pub async fn update(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<JsonMap>,
) -> Result<Json<MessageResponse>> {
    let id = order_id(&id)?;
    let fields = OrderFields::parse(&payload);
    state.orders().update(&id, fields.into_map()).await?;

    Ok(Json(MessageResponse {
        message: "Order updated successfully",
    }))
}

/// Delete an order. Deleting an absent order succeeds.
///
/// DELETE /api/orders/{id}
///
/// # Errors
///
/// Returns 500 if the store is unreachable.
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = order_id(&id)?;
    state.orders().delete(&id).await?;

    Ok(Json(MessageResponse {
        message: "Order deleted successfully",
    }))
}

fn order_id(raw: &str) -> Result<OrderId> {
    OrderId::parse(raw).map_err(|e| ApiError::BadRequest(format!("Invalid order id: {e}")))
}
