//! # Cart Module
//!
//! The transient pre-checkout cart. Owned by the current session only and
//! never persisted; checkout converts it into a [`Transaction`] and clears it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Cart State Operations                          │
//! │                                                                     │
//! │  Tap Product ──────────► add() ─────────► merge by name or append   │
//! │  Tap Remove ───────────► remove() ──────► drop line by id           │
//! │  Checkout succeeds ────► clear() ───────► items.clear()             │
//! │                                                                     │
//! │  Merging key is the PRODUCT NAME: tapping the same product twice    │
//! │  grows the quantity of one line instead of appending a second.      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::{LineItem, Product};
use crate::validation::validate_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// ## Price Freezing
/// The unit price is captured when the item is first added. If the catalog
/// price changes afterwards, the cart line keeps the original price; there is
/// no reconciliation on subsequent adds of the same product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Cart-line identifier (UUID v4), generated on first add.
    pub id: String,
    /// Product name (the merge key).
    pub product_name: String,
    /// Category the product was sold under.
    pub category: String,
    /// Unit price in cents at time of first add (frozen).
    pub unit_price_cents: i64,
    /// Quantity in cart.
    pub quantity: i64,
}

impl CartItem {
    /// Creates a cart line from a catalog product.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            id: Uuid::new_v4().to_string(),
            product_name: product.name.clone(),
            category: product.category.clone(),
            unit_price_cents: product.price_cents,
            quantity,
        }
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Converts this cart line into a transaction line item, keeping the id.
    pub fn into_line_item(self) -> LineItem {
        LineItem {
            id: self.id,
            product_name: self.product_name,
            category: self.category,
            unit_price_cents: self.unit_price_cents,
            quantity: self.quantity,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by product name (adding the same name sums quantities)
/// - Quantity per line never exceeds [`MAX_ITEM_QUANTITY`]
/// - At most [`MAX_CART_ITEMS`] distinct lines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in the cart.
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Lines currently in the cart, in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a product to the cart, merging by product name.
    ///
    /// ## Behavior
    /// - Same product name already in cart: quantities sum, the existing
    ///   line keeps its id and its original unit price
    /// - Otherwise: a new line is appended with a fresh id
    ///
    /// ## Errors
    /// - [`CoreError::Validation`] when the quantity is not positive or
    ///   exceeds the per-line maximum on its own
    /// - [`CoreError::QuantityTooLarge`] when the merged quantity would
    ///   exceed the per-line maximum
    /// - [`CoreError::CartTooLarge`] when a new line would exceed the
    ///   distinct-line maximum
    pub fn add(&mut self, product: &Product, quantity: i64) -> Result<&CartItem, CoreError> {
        validate_quantity(quantity)?;

        if let Some(idx) = self
            .items
            .iter()
            .position(|i| i.product_name == product.name)
        {
            let new_qty = self.items[idx].quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            self.items[idx].quantity = new_qty;
            return Ok(&self.items[idx]);
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem::from_product(product, quantity));
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    /// Removes a line by id. No-op when the id is absent.
    pub fn remove(&mut self, item_id: &str) {
        self.items.retain(|i| i.id != item_id);
    }

    /// Empties the cart. Called automatically after a successful checkout.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of line totals, excluding tip.
    pub fn subtotal_cents(&self) -> i64 {
        self.items.iter().map(CartItem::line_total_cents).sum()
    }

    /// Checkout total: subtotal plus tip.
    pub fn total_with_tip_cents(&self, tip_cents: i64) -> i64 {
        self.subtotal_cents() + tip_cents
    }

    /// Drains the cart into transaction line items.
    pub fn take_items(&mut self) -> Vec<LineItem> {
        self.items
            .drain(..)
            .map(CartItem::into_line_item)
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price_cents: i64) -> Product {
        Product::new(name, price_cents, "snacks")
    }

    #[test]
    fn test_add_merges_same_product_name() {
        let mut cart = Cart::new();
        cart.add(&product("Chips", 325), 2).unwrap();
        cart.add(&product("Chips", 325), 3).unwrap();

        // One entry with quantity q1+q2, not two entries
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_merge_keeps_first_price() {
        let mut cart = Cart::new();
        cart.add(&product("Chips", 325), 1).unwrap();
        // Catalog price changed after the first add; no reconciliation
        cart.add(&product("Chips", 400), 1).unwrap();

        assert_eq!(cart.items()[0].unit_price_cents, 325);
        assert_eq!(cart.subtotal_cents(), 650);
    }

    #[test]
    fn test_distinct_products_get_distinct_lines() {
        let mut cart = Cart::new();
        cart.add(&product("Chips", 325), 1).unwrap();
        cart.add(&product("Candy", 250), 1).unwrap();

        assert_eq!(cart.len(), 2);
        assert_ne!(cart.items()[0].id, cart.items()[1].id);
    }

    #[test]
    fn test_remove_by_id() {
        let mut cart = Cart::new();
        cart.add(&product("Chips", 325), 1).unwrap();
        let id = cart.add(&product("Candy", 250), 1).unwrap().id.clone();

        cart.remove(&id);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].product_name, "Chips");

        // Removing an absent id is a no-op
        cart.remove("no-such-id");
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_totals_with_tip() {
        // cart = [{Coke,$2,qty 1},{Chips,$3,qty 2}], tip $1.50 => $9.50
        let mut cart = Cart::new();
        cart.add(&product("Coke", 200), 1).unwrap();
        cart.add(&product("Chips", 300), 2).unwrap();

        assert_eq!(cart.subtotal_cents(), 800);
        assert_eq!(cart.total_with_tip_cents(150), 950);
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        cart.add(&product("Chips", 325), MAX_ITEM_QUANTITY).unwrap();
        let err = cart.add(&product("Chips", 325), 1).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(&product("Chips", 325), 0),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            cart.add(&product("Chips", 325), -5),
            Err(CoreError::Validation(_))
        ));

        // A negative add must not drive an existing line or the subtotal down
        cart.add(&product("Chips", 325), 2).unwrap();
        assert!(cart.add(&product("Chips", 325), -1).is_err());
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.subtotal_cents(), 650);
    }

    #[test]
    fn test_oversized_single_add_rejected() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(&product("Chips", 325), MAX_ITEM_QUANTITY + 1),
            Err(CoreError::Validation(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&product("Chips", 325), 1).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal_cents(), 0);
    }

    #[test]
    fn test_take_items_drains_cart() {
        let mut cart = Cart::new();
        cart.add(&product("Coke", 200), 1).unwrap();
        cart.add(&product("Chips", 300), 2).unwrap();

        let items = cart.take_items();
        assert_eq!(items.len(), 2);
        assert!(cart.is_empty());
        assert_eq!(items[1].line_total_cents(), 600);
    }
}
