//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                      - Product listing with cart badges
//! GET    /health                - Health check
//!
//! # Cart (HTML forms, redirect back with a toast)
//! GET    /cart                  - Cart page
//! POST   /cart/add              - Add one unit (product_id)
//! POST   /cart/update           - Set amount (product_id, amount)
//! POST   /cart/remove           - Remove product (product_id)
//! GET    /cart/count            - Cart count badge (fragment)
//!
//! # Cart JSON API (structured errors)
//! GET    /api/cart              - Current cart
//! POST   /api/cart/items        - Add one unit ({"productId": 1})
//! PATCH  /api/cart/items/{id}   - Set amount ({"amount": 3})
//! DELETE /api/cart/items/{id}   - Remove product
//! ```

pub mod api;
pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(api::show))
        .route("/cart/items", post(api::add_item))
        .route(
            "/cart/items/{id}",
            patch(api::update_item).delete(api::remove_item),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        .route("/health", get(health))
        // Cart routes
        .nest("/cart", cart_routes())
        // JSON API
        .nest("/api", api_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}
