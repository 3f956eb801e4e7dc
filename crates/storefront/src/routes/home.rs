//! Home page route handler: the product listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::catalog::{CatalogLoad, ListingEntry, ProductListView};
use crate::notify::Notification;
use crate::routes::cart::cart_label;
use crate::state::AppState;

/// What the listing area shows.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    Products,
    Empty,
    Unavailable,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub entries: Vec<ListingEntry>,
    pub listing: ListingState,
    pub cart_label: String,
    pub notifications: Vec<Notification>,
}

/// Display the product listing with per-product cart amounts.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let view = ProductListView::mount(state.store().clone(), state.products()).await;

    let listing = match view.catalog() {
        CatalogLoad::Loaded(_) => ListingState::Products,
        CatalogLoad::Empty => ListingState::Empty,
        CatalogLoad::Failed(_) => ListingState::Unavailable,
    };

    HomeTemplate {
        entries: view.entries(),
        listing,
        cart_label: cart_label(state.store().cart().len()),
        notifications: state.flash().drain(),
    }
}
