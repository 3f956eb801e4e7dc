//! Catalog products and stock snapshots.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as served by the catalog backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Absolute URL of the product image.
    pub image: String,
}

/// Available quantity of a product at the time it was fetched.
///
/// Stock is never cached: every cart decision fetches a fresh snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(rename = "id", alias = "productId")]
    pub product_id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Create a stock snapshot.
    #[must_use]
    pub const fn new(product_id: ProductId, amount: u32) -> Self {
        Self { product_id, amount }
    }

    /// Whether at least `amount` units are available.
    #[must_use]
    pub const fn covers(&self, amount: u32) -> bool {
        self.amount >= amount
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_accepts_backend_shape() {
        let stock: Stock = serde_json::from_str(r#"{"id": 3, "amount": 2}"#).unwrap();
        assert_eq!(stock, Stock::new(ProductId::new(3), 2));

        let stock: Stock = serde_json::from_str(r#"{"productId": 4, "amount": 0}"#).unwrap();
        assert_eq!(stock.product_id, ProductId::new(4));
        assert!(!stock.covers(1));
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let result = serde_json::from_str::<Stock>(r#"{"id": 1, "amount": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_product_from_backend_json() {
        let product: Product = serde_json::from_str(
            r#"{"id": 1, "title": "Tênis de Caminhada", "price": 179.9, "image": "https://cdn.example.com/1.jpg"}"#,
        )
        .unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(17990));
    }
}
