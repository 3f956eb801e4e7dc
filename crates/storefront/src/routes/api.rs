//! JSON cart API.
//!
//! Same operations as the HTML forms, but failures come back as structured
//! errors (`{"error": code, "message": ...}`) with a matching status instead
//! of a flash notification.

use axum::{
    Json,
    extract::{Path, State},
};
use rocket_shoes_core::{Cart, ProductId, UpdateProductAmount};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Body of `POST /api/cart/items`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
}

/// Body of `PATCH /api/cart/items/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub amount: i64,
}

/// Current cart, in its persisted representation.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<Cart> {
    Json(state.store().cart())
}

/// Add one unit of a product.
#[instrument(skip(state))]
pub async fn add_item(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<Cart>> {
    Ok(Json(state.store().add_product(request.product_id).await?))
}

/// Set a product's amount. Non-positive amounts return the cart unchanged.
#[instrument(skip(state))]
pub async fn update_item(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<Cart>> {
    let cart = state
        .store()
        .update_product_amount(UpdateProductAmount {
            product_id,
            amount: request.amount,
        })
        .await?;
    Ok(Json(cart))
}

/// Remove a product.
#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Cart>> {
    Ok(Json(state.store().remove_product(product_id).await?))
}
