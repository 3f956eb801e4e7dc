//! Product listing view model.
//!
//! Loads the catalog once per mount and merges it with live cart amounts for
//! the "in cart" badges. A failed load is kept distinct from an empty
//! catalog so the page can say which one happened.

use std::sync::Arc;

use rocket_shoes_core::{Cart, Product, ProductId};
use serde::Serialize;
use tracing::{error, instrument};

use crate::api::ProductService;
use crate::cart::{CartError, CartStore};

/// Result of loading the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLoad {
    Loaded(Vec<Product>),
    Empty,
    Failed(String),
}

impl CatalogLoad {
    /// Fetch the catalog once. No retry.
    #[instrument(skip(products))]
    pub async fn fetch(products: &dyn ProductService) -> Self {
        match products.products().await {
            Ok(items) if items.is_empty() => Self::Empty,
            Ok(items) => Self::Loaded(items),
            Err(e) => {
                error!(error = %e, "Failed to load product catalog");
                Self::Failed(e.to_string())
            }
        }
    }

    /// Products to display; empty unless the load succeeded.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        match self {
            Self::Loaded(items) => items,
            Self::Empty | Self::Failed(_) => &[],
        }
    }
}

/// One product tile on the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price_formatted: String,
    /// Amount of this product already in the cart (0 if absent).
    pub cart_amount: u32,
}

/// Merge catalog products with the amounts currently in `cart`.
#[must_use]
pub fn listing_entries(products: &[Product], cart: &Cart) -> Vec<ListingEntry> {
    let amounts = cart.item_amounts();
    products
        .iter()
        .map(|product| ListingEntry {
            id: product.id,
            title: product.title.clone(),
            image: product.image.clone(),
            price_formatted: product.price.display(),
            cart_amount: amounts.get(&product.id).copied().unwrap_or(0),
        })
        .collect()
}

/// A mounted product listing bound to a cart store.
pub struct ProductListView {
    store: Arc<CartStore>,
    catalog: CatalogLoad,
}

impl ProductListView {
    /// Load the catalog and bind the view to `store`.
    pub async fn mount(store: Arc<CartStore>, products: &dyn ProductService) -> Self {
        let catalog = CatalogLoad::fetch(products).await;
        Self { store, catalog }
    }

    /// How the catalog load went.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogLoad {
        &self.catalog
    }

    /// Tiles for the current cart. Reflects cart changes without refetching.
    #[must_use]
    pub fn entries(&self) -> Vec<ListingEntry> {
        listing_entries(self.catalog.products(), &self.store.cart())
    }

    /// Add one unit of a listed product to the cart.
    ///
    /// # Errors
    ///
    /// Propagates the cart store's error unchanged.
    pub async fn add_to_cart(&self, product_id: ProductId) -> Result<Cart, CartError> {
        self.store.add_product(product_id).await
    }
}
