//! Cart contents and the pure rules that govern changes to them.
//!
//! Every mutation is expressed as a function from the current cart (plus a
//! fresh stock snapshot where needed) to either a new cart or a
//! [`CartRejection`]. Nothing here performs I/O; applying and persisting the
//! result is the caller's job.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;
use super::product::{Product, Stock};

/// Reason a cart change was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartRejection {
    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotFound(ProductId),

    /// Stock cannot cover the requested quantity.
    #[error("product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
}

/// A persisted cart that breaks a cart invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidCart {
    #[error("product {0} has a zero amount")]
    ZeroAmount(ProductId),
    #[error("product {0} appears more than once")]
    Duplicate(ProductId),
}

/// A product in the cart together with the selected quantity.
///
/// Product fields are captured when the product is first added and are not
/// refreshed on later increments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    /// Always at least 1.
    pub amount: u32,
}

impl CartItem {
    fn from_product(product: Product, amount: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount,
        }
    }

    /// Price of this line (unit price times amount).
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.amount)
    }
}

/// Request to set a cart item to an exact quantity.
///
/// `amount` is signed because it usually comes straight from user input;
/// values of zero or below are ignored rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

impl UpdateProductAmount {
    /// The requested quantity, or `None` when the request is a no-op.
    #[must_use]
    pub fn requested(&self) -> Option<u32> {
        if self.amount <= 0 {
            return None;
        }
        Some(u32::try_from(self.amount).unwrap_or(u32::MAX))
    }
}

/// Ordered sequence of cart items, at most one per product.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up the item for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == product_id)
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items
            .iter()
            .map(CartItem::subtotal)
            .fold(Price::ZERO, |acc, line| acc + line)
    }

    /// Quantity per product, for listing badges.
    #[must_use]
    pub fn item_amounts(&self) -> HashMap<ProductId, u32> {
        self.items.iter().map(|item| (item.id, item.amount)).collect()
    }

    /// Add one unit of `product`.
    ///
    /// A product not yet in the cart is appended with amount 1 if any stock
    /// is available. A product already in the cart is incremented only while
    /// stock exceeds the current amount.
    ///
    /// # Errors
    ///
    /// Returns [`CartRejection::OutOfStock`] when stock cannot cover one more
    /// unit.
    pub fn with_product(&self, product: Product, stock: Stock) -> Result<Self, CartRejection> {
        let product_id = product.id;
        let requested = self.get(product_id).map_or(1, |item| item.amount.saturating_add(1));

        if !stock.covers(requested) {
            return Err(CartRejection::OutOfStock {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        let mut next = self.clone();
        match next.items.iter_mut().find(|item| item.id == product_id) {
            Some(item) => item.amount = requested,
            None => next.items.push(CartItem::from_product(product, 1)),
        }
        Ok(next)
    }

    /// Remove a product entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartRejection::NotFound`] if the product is not in the cart.
    pub fn without_product(&self, product_id: ProductId) -> Result<Self, CartRejection> {
        if self.get(product_id).is_none() {
            return Err(CartRejection::NotFound(product_id));
        }

        Ok(Self {
            items: self
                .items
                .iter()
                .filter(|item| item.id != product_id)
                .cloned()
                .collect(),
        })
    }

    /// Set a product's amount to exactly `amount`.
    ///
    /// `amount` must be at least 1; callers filter out non-positive requests
    /// with [`UpdateProductAmount::requested`].
    ///
    /// # Errors
    ///
    /// Returns [`CartRejection::NotFound`] if the product is not in the cart,
    /// or [`CartRejection::OutOfStock`] if `stock` cannot cover `amount`.
    pub fn with_amount(
        &self,
        product_id: ProductId,
        amount: u32,
        stock: Stock,
    ) -> Result<Self, CartRejection> {
        self.ensure_contains(product_id)?;

        if !stock.covers(amount) {
            return Err(CartRejection::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let mut next = self.clone();
        for item in &mut next.items {
            if item.id == product_id {
                item.amount = amount;
            }
        }
        Ok(next)
    }

    /// Fail with [`CartRejection::NotFound`] unless the product is present.
    ///
    /// # Errors
    ///
    /// Returns [`CartRejection::NotFound`] if the product is not in the cart.
    pub fn ensure_contains(&self, product_id: ProductId) -> Result<(), CartRejection> {
        self.get(product_id)
            .map(|_| ())
            .ok_or(CartRejection::NotFound(product_id))
    }

    /// Serialize to the persisted snapshot format (a JSON array of items).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a cart from its persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is not valid JSON or violates a cart
    /// invariant.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(snapshot)
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = InvalidCart;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.amount == 0 {
                return Err(InvalidCart::ZeroAmount(item.id));
            }
            if !seen.insert(item.id) {
                return Err(InvalidCart::Duplicate(item.id));
            }
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Sneaker {id}"),
            price: Price::from_cents(10_000 + i64::from(id)),
            image: format!("https://cdn.example.com/{id}.jpg"),
        }
    }

    fn stock(id: i32, amount: u32) -> Stock {
        Stock::new(ProductId::new(id), amount)
    }

    fn cart_of(lines: &[(i32, u32)]) -> Cart {
        let items = lines
            .iter()
            .map(|&(id, amount)| CartItem::from_product(product(id), amount))
            .collect::<Vec<_>>();
        Cart::try_from(items).unwrap()
    }

    #[test]
    fn test_add_to_empty_cart() {
        let cart = Cart::new().with_product(product(1), stock(1, 5)).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].id, ProductId::new(1));
        assert_eq!(cart.items()[0].amount, 1);
    }

    #[test]
    fn test_add_without_stock_is_rejected() {
        let cart = cart_of(&[(2, 1)]);
        let err = cart.with_product(product(1), stock(1, 0)).unwrap_err();
        assert_eq!(
            err,
            CartRejection::OutOfStock {
                product_id: ProductId::new(1),
                requested: 1,
                available: 0,
            }
        );
    }

    #[test]
    fn test_add_increments_existing_item() {
        let cart = cart_of(&[(1, 1), (2, 1)]);
        let next = cart.with_product(product(2), stock(2, 3)).unwrap();
        assert_eq!(next, cart_of(&[(1, 1), (2, 2)]));
    }

    #[test]
    fn test_add_blocked_at_exact_stock_boundary() {
        let cart = cart_of(&[(1, 2)]);
        let err = cart.with_product(product(1), stock(1, 2)).unwrap_err();
        assert!(matches!(err, CartRejection::OutOfStock { requested: 3, .. }));
    }

    #[test]
    fn test_add_keeps_original_product_fields() {
        let cart = cart_of(&[(1, 1)]);
        let mut renamed = product(1);
        renamed.title = "Renamed".to_string();
        let next = cart.with_product(renamed, stock(1, 9)).unwrap();
        assert_eq!(next.items()[0].title, "Sneaker 1");
        assert_eq!(next.items()[0].amount, 2);
    }

    #[test]
    fn test_remove_present_item() {
        let cart = cart_of(&[(1, 1), (2, 1)]);
        let next = cart.without_product(ProductId::new(1)).unwrap();
        assert_eq!(next, cart_of(&[(2, 1)]));
    }

    #[test]
    fn test_remove_missing_item() {
        let cart = cart_of(&[(1, 1)]);
        assert_eq!(
            cart.without_product(ProductId::new(5)),
            Err(CartRejection::NotFound(ProductId::new(5)))
        );
    }

    #[test]
    fn test_update_within_stock_preserves_other_lines() {
        let cart = cart_of(&[(1, 1), (2, 4), (3, 1)]);
        let next = cart.with_amount(ProductId::new(2), 2, stock(2, 2)).unwrap();
        assert_eq!(next, cart_of(&[(1, 1), (2, 2), (3, 1)]));
    }

    #[test]
    fn test_update_beyond_stock_is_rejected() {
        let cart = cart_of(&[(1, 2)]);
        let err = cart.with_amount(ProductId::new(1), 5, stock(1, 3)).unwrap_err();
        assert_eq!(
            err,
            CartRejection::OutOfStock {
                product_id: ProductId::new(1),
                requested: 5,
                available: 3,
            }
        );
    }

    #[test]
    fn test_update_missing_item_is_not_found() {
        let cart = cart_of(&[(1, 2)]);
        assert_eq!(
            cart.with_amount(ProductId::new(2), 1, stock(2, 10)),
            Err(CartRejection::NotFound(ProductId::new(2)))
        );
    }

    #[test]
    fn test_update_request_ignores_non_positive_amounts() {
        let id = ProductId::new(1);
        assert_eq!(UpdateProductAmount { product_id: id, amount: 0 }.requested(), None);
        assert_eq!(UpdateProductAmount { product_id: id, amount: -3 }.requested(), None);
        assert_eq!(UpdateProductAmount { product_id: id, amount: 4 }.requested(), Some(4));
        assert_eq!(
            UpdateProductAmount { product_id: id, amount: i64::MAX }.requested(),
            Some(u32::MAX)
        );
    }

    #[test]
    fn test_snapshot_round_trip() {
        let cart = cart_of(&[(3, 2), (1, 1), (2, 7)]);
        let snapshot = cart.to_snapshot().unwrap();
        assert!(snapshot.starts_with('['));
        assert_eq!(Cart::from_snapshot(&snapshot).unwrap(), cart);
    }

    #[test]
    fn test_snapshot_rejects_broken_invariants() {
        let zero = r#"[{"id":1,"title":"a","price":1.5,"image":"x","amount":0}]"#;
        assert!(Cart::from_snapshot(zero).is_err());

        let dup = r#"[
            {"id":1,"title":"a","price":1.5,"image":"x","amount":1},
            {"id":1,"title":"a","price":1.5,"image":"x","amount":2}
        ]"#;
        assert!(Cart::from_snapshot(dup).is_err());
    }

    #[test]
    fn test_totals_and_amounts() {
        let cart = cart_of(&[(1, 2), (2, 1)]);
        assert_eq!(cart.total(), Price::from_cents(2 * 10_001 + 10_002));
        let amounts = cart.item_amounts();
        assert_eq!(amounts.get(&ProductId::new(1)), Some(&2));
        assert_eq!(amounts.get(&ProductId::new(3)), None);
    }
}
