//! Rocket Shoes Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Modules
//!
//! - [`cart`] - Stock-checked, write-through cart store
//! - [`catalog`] - Product listing merged with cart amounts
//! - [`api`] - Product and stock backend clients
//! - [`storage`] - Local key-value persistence for the cart
//! - [`notify`] - Toast notifications for cart outcomes
//! - [`routes`] - HTML pages and the JSON cart API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod routes;
pub mod state;
pub mod storage;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the storefront router with static assets and request tracing.
pub fn app(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", static_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
