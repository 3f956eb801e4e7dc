//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiClient, ApiError, ProductService, StockService};
use crate::cart::CartStore;
use crate::config::StorefrontConfig;
use crate::notify::FlashSink;
use crate::storage::{CartPersistence, FileStore, StorageError};

/// Error building application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("backend client: {0}")]
    Api(#[from] ApiError),
    #[error("cart storage: {0}")]
    Storage(#[from] StorageError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// cart store, the catalog backend, and pending notifications.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<CartStore>,
    products: Arc<dyn ProductService>,
    flash: FlashSink,
}

impl AppState {
    /// Create application state from already-built parts.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        store: Arc<CartStore>,
        products: Arc<dyn ProductService>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                products,
                flash: FlashSink::new(),
            }),
        }
    }

    /// Build the REST client and file-backed cart store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the persisted
    /// cart cannot be read.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let client = ApiClient::new(&config.api)?;
        let stock: Arc<dyn StockService> = Arc::new(client.clone());
        let products: Arc<dyn ProductService> = Arc::new(client);

        let persistence = CartPersistence::new(
            Arc::new(FileStore::new(&config.storage.path)),
            config.storage.cart_key.clone(),
        );
        let store = CartStore::init(stock, products.clone(), persistence)?;

        Ok(Self::new(config, Arc::new(store), products))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the shared cart store.
    #[must_use]
    pub fn store(&self) -> &Arc<CartStore> {
        &self.inner.store
    }

    /// Get the catalog backend.
    #[must_use]
    pub fn products(&self) -> &dyn ProductService {
        self.inner.products.as_ref()
    }

    /// Get the notification queue rendered on the next page.
    #[must_use]
    pub fn flash(&self) -> &FlashSink {
        &self.inner.flash
    }
}
