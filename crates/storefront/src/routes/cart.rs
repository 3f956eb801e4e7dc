//! Cart route handlers.
//!
//! Cart changes are plain form posts that redirect back (303) to the page
//! they came from. The outcome is queued as a flash notification and shown
//! as a toast on the next render.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use rocket_shoes_core::{Cart, CartItem, ProductId, UpdateProductAmount};
use serde::Deserialize;
use tracing::instrument;

use crate::cart::{CartError, CartOperation};
use crate::notify::{Notification, NotificationSink};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub price: String,
    pub amount: u32,
    pub subtotal: String,
    /// Amount submitted by the "-" button (an ignored 0 when already at 1)
    pub decrement_to: u32,
    /// Amount submitted by the "+" button
    pub increment_to: u32,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: usize,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.as_i32(),
            title: item.title.clone(),
            image: item.image.clone(),
            price: item.price.display(),
            amount: item.amount,
            subtotal: item.subtotal().display(),
            decrement_to: item.amount.saturating_sub(1),
            increment_to: item.amount.saturating_add(1),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: cart.total().display(),
            item_count: cart.len(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update amount form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_label: String,
    pub notifications: Vec<Notification>,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart_label: String,
}

/// Header badge text for a cart with `count` distinct products.
#[must_use]
pub fn cart_label(count: usize) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{count} items")
    }
}

/// Queue the notification for an operation's outcome, if it has one.
fn report(state: &AppState, operation: CartOperation, outcome: &Result<Cart, CartError>) {
    if let Err(e) = outcome {
        tracing::debug!(?operation, code = e.code(), "Cart operation refused");
    }
    if let Some(notification) = Notification::for_outcome(operation, outcome) {
        state.flash().notify(notification);
    }
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let cart = state.store().cart();

    CartShowTemplate {
        cart_label: cart_label(cart.len()),
        cart: CartView::from(&cart),
        notifications: state.flash().drain(),
    }
}

/// Add one unit of a product, then return to the listing.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Redirect {
    let outcome = state.store().add_product(form.product_id).await;
    report(&state, CartOperation::Add, &outcome);
    Redirect::to("/")
}

/// Set a product's amount, then return to the cart.
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Redirect {
    let request = UpdateProductAmount {
        product_id: form.product_id,
        amount: form.amount,
    };
    let outcome = state.store().update_product_amount(request).await;
    report(&state, CartOperation::Update, &outcome);
    Redirect::to("/cart")
}

/// Remove a product, then return to the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Redirect {
    let outcome = state.store().remove_product(form.product_id).await;
    report(&state, CartOperation::Remove, &outcome);
    Redirect::to("/cart")
}

/// Get cart count badge (number of distinct products).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    CartCountTemplate {
        cart_label: cart_label(state.store().cart().len()),
    }
}
