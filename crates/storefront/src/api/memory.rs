//! In-memory backend serving a fixed catalog.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rocket_shoes_core::{Product, ProductId, Stock};

use super::{ApiError, ProductService, StockService};

/// Backend that keeps products and stock levels in memory.
///
/// Stock can be changed while the backend is shared, and either side can be
/// switched into a failing mode to exercise fetch-failure paths.
#[derive(Default)]
pub struct InMemoryBackend {
    products: Vec<Product>,
    stock: Mutex<HashMap<ProductId, u32>>,
    fail_stock: AtomicBool,
    fail_products: AtomicBool,
    stock_requests: AtomicUsize,
}

impl InMemoryBackend {
    /// Create a backend from `(product, stock amount)` pairs.
    #[must_use]
    pub fn new(catalog: impl IntoIterator<Item = (Product, u32)>) -> Self {
        let (products, stock): (Vec<_>, HashMap<_, _>) = catalog
            .into_iter()
            .map(|(product, amount)| {
                let id = product.id;
                (product, (id, amount))
            })
            .unzip();

        Self {
            products,
            stock: Mutex::new(stock),
            ..Self::default()
        }
    }

    /// Overwrite the stock level of a product.
    pub fn set_stock(&self, product_id: ProductId, amount: u32) {
        self.stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product_id, amount);
    }

    /// Make every stock lookup fail.
    pub fn fail_stock(&self, fail: bool) {
        self.fail_stock.store(fail, Ordering::SeqCst);
    }

    /// Make every product lookup fail.
    pub fn fail_products(&self, fail: bool) {
        self.fail_products.store(fail, Ordering::SeqCst);
    }

    /// Number of stock lookups served so far, including failed ones.
    #[must_use]
    pub fn stock_requests(&self) -> usize {
        self.stock_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StockService for InMemoryBackend {
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ApiError> {
        self.stock_requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_stock.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("stock service offline".to_string()));
        }

        self.stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&product_id)
            .map(|&amount| Stock::new(product_id, amount))
            .ok_or_else(|| ApiError::NotFound(format!("stock/{product_id}")))
    }
}

#[async_trait]
impl ProductService for InMemoryBackend {
    async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        if self.fail_products.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("product service offline".to_string()));
        }

        self.products
            .iter()
            .find(|product| product.id == product_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("products/{product_id}")))
    }

    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        if self.fail_products.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("product service offline".to_string()));
        }
        Ok(self.products.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocket_shoes_core::Price;

    use super::*;

    fn sneaker() -> Product {
        Product {
            id: ProductId::new(1),
            title: "Tênis de Caminhada".to_string(),
            price: Price::from_cents(17990),
            image: "https://cdn.example.com/1.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_serves_and_updates_stock() {
        let backend = InMemoryBackend::new([(sneaker(), 2)]);
        let id = ProductId::new(1);

        assert_eq!(backend.stock(id).await.unwrap().amount, 2);
        backend.set_stock(id, 0);
        assert_eq!(backend.stock(id).await.unwrap().amount, 0);
        assert_eq!(backend.stock_requests(), 2);
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let backend = InMemoryBackend::new([(sneaker(), 2)]);
        backend.fail_stock(true);
        backend.fail_products(true);

        assert!(backend.stock(ProductId::new(1)).await.is_err());
        assert!(backend.product(ProductId::new(1)).await.is_err());
        assert!(backend.products().await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let backend = InMemoryBackend::new([(sneaker(), 2)]);
        let err = backend.product(ProductId::new(5)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
