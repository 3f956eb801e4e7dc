//! Local persistent storage for the cart.
//!
//! Storage is a plain string key-value store (the same model as browser
//! local storage). The cart is kept under a single namespaced key as the
//! full serialized item sequence; every write replaces the whole value.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use rocket_shoes_core::Cart;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded.
    #[error("Corrupt data under '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// The cart snapshot slot inside a key-value store.
#[derive(Clone)]
pub struct CartPersistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CartPersistence {
    /// Address the cart under `key` in `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The key the cart is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted cart, or an empty cart if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or the snapshot is corrupt.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Result<Cart, StorageError> {
        let Some(snapshot) = self.store.get(&self.key)? else {
            debug!("No persisted cart, starting empty");
            return Ok(Cart::new());
        };

        let cart = Cart::from_snapshot(&snapshot).map_err(|source| StorageError::Corrupt {
            key: self.key.clone(),
            source,
        })?;
        debug!(items = cart.len(), "Restored persisted cart");
        Ok(cart)
    }

    /// Persist the full cart, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized or written.
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let snapshot = cart.to_snapshot().map_err(|source| StorageError::Corrupt {
            key: self.key.clone(),
            source,
        })?;
        self.store.set(&self.key, snapshot)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocket_shoes_core::{Price, Product, ProductId, Stock};

    use super::*;

    fn sample_cart() -> Cart {
        let product = Product {
            id: ProductId::new(1),
            title: "Tênis de Caminhada".to_string(),
            price: Price::from_cents(17990),
            image: "https://cdn.example.com/1.jpg".to_string(),
        };
        Cart::new()
            .with_product(product, Stock::new(ProductId::new(1), 3))
            .unwrap()
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let persistence = CartPersistence::new(Arc::new(MemoryStore::new()), "@test:cart");
        assert!(persistence.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = Arc::new(MemoryStore::new());
        let persistence = CartPersistence::new(store.clone(), "@test:cart");
        let cart = sample_cart();

        persistence.save(&cart).unwrap();
        assert_eq!(persistence.load().unwrap(), cart);

        let raw = store.get("@test:cart").unwrap().unwrap();
        assert!(raw.contains("\"amount\":1"));
    }

    #[test]
    fn test_corrupt_snapshot_is_reported() {
        let store = Arc::new(MemoryStore::new());
        store.set("@test:cart", "{not json".to_string()).unwrap();
        let persistence = CartPersistence::new(store, "@test:cart");

        let err = persistence.load().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref key, .. } if key == "@test:cart"));
    }
}
