//! The cart store.
//!
//! Holds the shopper's cart in memory, checks every quantity change against
//! live stock, and writes the full cart through to local storage after each
//! successful change.
//!
//! # Consistency
//!
//! Mutations are serialized by an async lock held for the whole
//! read, fetch, decide, write sequence, so concurrent requests observe the
//! same ordering a single-threaded caller would. The in-memory cart is only
//! replaced after the write to storage succeeds; on any failure both stay
//! untouched.

use std::sync::Arc;

use rocket_shoes_core::{Cart, CartRejection, ProductId, UpdateProductAmount};
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, ProductService, StockService};
use crate::storage::{CartPersistence, StorageError};

/// Why a cart operation left the cart unchanged.
#[derive(Debug, Error)]
pub enum CartError {
    /// The change was refused (missing product or insufficient stock).
    #[error(transparent)]
    Rejected(#[from] CartRejection),

    /// Stock or product lookup failed.
    #[error("Backend lookup failed: {0}")]
    Fetch(#[from] ApiError),

    /// The new cart could not be written to storage.
    #[error("Failed to persist cart: {0}")]
    Persistence(#[from] StorageError),
}

impl CartError {
    /// Stable machine-readable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Rejected(CartRejection::NotFound(_)) => "not_found",
            Self::Rejected(CartRejection::OutOfStock { .. }) => "out_of_stock",
            Self::Fetch(_) => "fetch_failed",
            Self::Persistence(_) => "persistence_failed",
        }
    }
}

/// The three cart operations, for logging and notification wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    Update,
}

/// Stock-checked, write-through cart state.
pub struct CartStore {
    stock: Arc<dyn StockService>,
    products: Arc<dyn ProductService>,
    persistence: CartPersistence,
    state: watch::Sender<Cart>,
    mutation: Mutex<()>,
}

impl CartStore {
    /// Create the store from the persisted snapshot, or an empty cart if
    /// none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or the snapshot is corrupt.
    pub fn init(
        stock: Arc<dyn StockService>,
        products: Arc<dyn ProductService>,
        persistence: CartPersistence,
    ) -> Result<Self, StorageError> {
        let cart = persistence.load()?;
        info!(key = persistence.key(), items = cart.len(), "Cart store initialized");

        Ok(Self {
            stock,
            products,
            persistence,
            state: watch::Sender::new(cart),
            mutation: Mutex::new(()),
        })
    }

    /// Current cart contents.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Subscribe to cart changes. The receiver sees every committed cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Add one unit of a product.
    ///
    /// Fetches stock and product details, then appends the product with
    /// amount 1 or increments its existing amount. Every successful call
    /// increments again.
    ///
    /// # Errors
    ///
    /// - [`CartError::Rejected`] with `OutOfStock` if stock cannot cover one
    ///   more unit
    /// - [`CartError::Fetch`] if either lookup fails
    /// - [`CartError::Persistence`] if the new cart cannot be stored
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let _guard = self.mutation.lock().await;

        let (stock, product) = tokio::try_join!(
            self.stock.stock(product_id),
            self.products.product(product_id)
        )
        .inspect_err(|e| warn!(error = %e, "Lookup failed while adding product"))?;

        let next = self.cart().with_product(product, stock)?;
        self.commit(next)
    }

    /// Remove a product from the cart. Never touches the network.
    ///
    /// # Errors
    ///
    /// - [`CartError::Rejected`] with `NotFound` if the product is not in
    ///   the cart
    /// - [`CartError::Persistence`] if the new cart cannot be stored
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let _guard = self.mutation.lock().await;

        let next = self.cart().without_product(product_id)?;
        self.commit(next)
    }

    /// Set a product's amount exactly.
    ///
    /// Requests with an amount of zero or below are ignored: the current
    /// cart is returned unchanged and nothing is fetched or written.
    ///
    /// # Errors
    ///
    /// - [`CartError::Rejected`] with `NotFound` if the product is not in
    ///   the cart, or `OutOfStock` if stock is below the requested amount
    /// - [`CartError::Fetch`] if the stock lookup fails
    /// - [`CartError::Persistence`] if the new cart cannot be stored
    #[instrument(skip(self), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<Cart, CartError> {
        let Some(amount) = request.requested() else {
            debug!("Ignoring non-positive amount");
            return Ok(self.cart());
        };

        let _guard = self.mutation.lock().await;
        let current = self.cart();
        current.ensure_contains(request.product_id)?;

        let stock = self
            .stock
            .stock(request.product_id)
            .await
            .inspect_err(|e| warn!(error = %e, "Stock lookup failed while updating amount"))?;

        let next = current.with_amount(request.product_id, amount, stock)?;
        self.commit(next)
    }

    /// Write `next` through to storage, then publish it.
    fn commit(&self, next: Cart) -> Result<Cart, CartError> {
        self.persistence.save(&next).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to persist cart; keeping previous state");
        })?;
        self.state.send_replace(next.clone());
        debug!(items = next.len(), "Cart committed");
        Ok(next)
    }
}
