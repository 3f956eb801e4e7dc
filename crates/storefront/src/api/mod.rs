//! Clients for the product and stock backend.
//!
//! # Architecture
//!
//! - The cart and the product listing only see the [`StockService`] and
//!   [`ProductService`] traits, so they can be driven by any backend
//! - [`ApiClient`] talks to the REST backend over `reqwest`
//! - [`InMemoryBackend`] serves a fixed catalog from memory (tests, demos)
//! - Stock is never cached: every call hits the backend
//!
//! # Endpoints
//!
//! ```text
//! GET /products        - Full catalog
//! GET /products/{id}   - Single product
//! GET /stock/{id}      - Stock snapshot for a product
//! ```

mod client;
mod memory;

pub use client::ApiClient;
pub use memory::InMemoryBackend;

use async_trait::async_trait;
use rocket_shoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend unreachable or deliberately failing (in-memory backend).
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to live stock levels.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch the current stock snapshot for a product.
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ApiError>;
}

/// Read-only access to the product catalog.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Fetch a single product.
    async fn product(&self, product_id: ProductId) -> Result<Product, ApiError>;

    /// Fetch the full catalog.
    async fn products(&self) -> Result<Vec<Product>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("stock/9".to_string());
        assert_eq!(err.to_string(), "Not found: stock/9");

        let err = ApiError::Status {
            status: 503,
            url: "http://localhost:3333/products".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected status 503 from http://localhost:3333/products"
        );
    }
}
