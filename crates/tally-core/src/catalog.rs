//! # Product Catalog
//!
//! The set of sellable products grouped by category. Seeded from a static
//! default table; user edits extend or replace it and are persisted by the
//! `tally-db` product repository.
//!
//! ## Lifecycle
//! ```text
//! defaults() ──► stored catalog loaded ──► reconcile_defaults()
//!                      │                         │
//!                      │     stored products matching a default by
//!                      │     name+category take the current default
//!                      │     price (price corrections ship as code)
//!                      ▼                         ▼
//!                add_product / remove_product on user edits
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Product;
use crate::validation::{validate_category, validate_price, validate_product_name};

// =============================================================================
// Default Product Table
// =============================================================================

/// The seeded product table: (category, name, price in cents).
///
/// Category order and product order within a category are display order.
pub const DEFAULT_PRODUCTS: &[(&str, &str, i64)] = &[
    // Snacks
    ("snacks", "Coolers", 1200),
    ("snacks", "Cashews", 275),
    ("snacks", "Peanuts", 150),
    ("snacks", "Crackers", 275),
    ("snacks", "Candy", 250),
    ("snacks", "Trail Mix", 300),
    ("snacks", "Granola Bar", 250),
    ("snacks", "Protein Bar", 325),
    ("snacks", "Chips", 325),
    ("snacks", "Pistachios", 275),
    // Beverages
    ("beverages", "Juice", 425),
    ("beverages", "Soda", 350),
    ("beverages", "Water", 350),
    ("beverages", "Gatorade", 425),
    ("beverages", "Energy Drink", 350),
    // Beer
    ("beer", "Budweiser", 575),
    ("beer", "Bud Light", 575),
    ("beer", "Coor's Light", 575),
    ("beer", "Miller Lite", 575),
    ("beer", "Yuengling", 575),
    ("beer", "Mich Ultra", 575),
    ("beer", "Heineken", 650),
    ("beer", "Whiteclaw", 575),
    ("beer", "Arnold Palmer", 575),
    ("beer", "Stella", 650),
    ("beer", "Corona", 650),
    ("beer", "Guinness", 650),
    ("beer", "Flying Dog (Snake Dog)", 650),
    ("beer", "Mully's", 650),
    ("beer", "Terrapin", 650),
    ("beer", "Summer Shandy", 650),
    ("beer", "Domestic 6-pack", 2400),
    ("beer", "Imported 6-pack", 3000),
    ("beer", "Bluemoon", 650),
    ("beer", "Cutwater", 800),
    ("beer", "Dogfish (60 Minute)", 650),
    ("beer", "Dogfish (Cocktail)", 750),
    ("beer", "Highnoon", 800),
    ("beer", "Nutrl", 800),
    ("beer", "Orange Smash", 800),
    ("beer", "Testudo", 650),
    ("beer", "Truly", 575),
    // Spirits
    ("spirits", "Jack Daniels", 850),
    ("spirits", "Fireball Mini", 850),
    ("spirits", "Jameson", 850),
    ("spirits", "Bailey's", 850),
    ("spirits", "Liquor and Mixer", 1000),
    ("spirits", "Rum", 850),
    ("spirits", "Tequilla", 850),
    ("spirits", "Vodka", 850),
];

// =============================================================================
// Catalog
// =============================================================================

/// In-memory catalog: category → product list.
///
/// Uses a BTreeMap so category iteration order is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: BTreeMap<String, Vec<Product>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog {
            products: BTreeMap::new(),
        }
    }

    /// Creates a catalog seeded from [`DEFAULT_PRODUCTS`].
    ///
    /// Default ids are deterministic (`category-index`) so re-seeding does
    /// not mint new identities for unchanged products.
    pub fn defaults() -> Self {
        let mut catalog = Catalog::new();
        let mut index_in_category: BTreeMap<&str, usize> = BTreeMap::new();
        for (category, name, price_cents) in DEFAULT_PRODUCTS {
            let idx = index_in_category.entry(category).or_insert(0);
            catalog
                .products
                .entry((*category).to_string())
                .or_default()
                .push(Product {
                    id: format!("{category}-{idx}"),
                    name: (*name).to_string(),
                    price_cents: *price_cents,
                    category: (*category).to_string(),
                });
            *idx += 1;
        }
        catalog
    }

    /// Builds a catalog from an already-grouped product list.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Catalog::new();
        for product in products {
            catalog
                .products
                .entry(product.category.clone())
                .or_default()
                .push(product);
        }
        catalog
    }

    /// Category names in stable order.
    pub fn categories(&self) -> Vec<&str> {
        self.products.keys().map(String::as_str).collect()
    }

    /// Products in one category, or an empty slice.
    pub fn in_category(&self, category: &str) -> &[Product] {
        self.products.get(category).map_or(&[], Vec::as_slice)
    }

    /// All products across categories, in category order.
    pub fn all(&self) -> impl Iterator<Item = &Product> {
        self.products.values().flatten()
    }

    /// Total number of products.
    pub fn len(&self) -> usize {
        self.products.values().map(Vec::len).sum()
    }

    /// True when the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Looks up a product by id.
    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.all().find(|p| p.id == product_id)
    }

    /// Adds a product to its category.
    ///
    /// ## Errors
    /// - [`CoreError::DuplicateProduct`] when a product with the same name
    ///   (case-insensitive) already exists in the category. The caller is
    ///   expected to offer editing the existing record instead.
    /// - Validation errors for an empty name or category, or a negative price.
    pub fn add_product(&mut self, product: Product) -> Result<(), CoreError> {
        validate_product_name(&product.name)?;
        validate_category(&product.category)?;
        validate_price(product.price_cents)?;

        let existing = self.products.entry(product.category.clone()).or_default();
        if existing
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(&product.name))
        {
            return Err(CoreError::DuplicateProduct {
                name: product.name,
                category: product.category,
            });
        }

        existing.push(product);
        Ok(())
    }

    /// Removes a product by id from a category.
    ///
    /// Categories left empty disappear from the catalog.
    ///
    /// ## Errors
    /// [`CoreError::ProductNotFound`] when the id is not in the category.
    pub fn remove_product(&mut self, product_id: &str, category: &str) -> Result<(), CoreError> {
        let Some(items) = self.products.get_mut(category) else {
            return Err(CoreError::ProductNotFound(product_id.to_string()));
        };

        let before = items.len();
        items.retain(|p| p.id != product_id);
        if items.len() == before {
            return Err(CoreError::ProductNotFound(product_id.to_string()));
        }
        if items.is_empty() {
            self.products.remove(category);
        }
        Ok(())
    }

    /// Reconciles stored products against the current defaults.
    ///
    /// A stored product matching a default by name within the same category
    /// takes the default's current price. Products with no default match are
    /// left alone. Returns the number of prices changed; the caller persists
    /// when the count is non-zero.
    pub fn reconcile_defaults(&mut self) -> usize {
        let defaults = Catalog::defaults();
        let mut changed = 0;
        for (category, items) in &mut self.products {
            for item in items.iter_mut() {
                if let Some(default) = defaults
                    .in_category(category)
                    .iter()
                    .find(|d| d.name == item.name)
                {
                    if item.price_cents != default.price_cents {
                        item.price_cents = default.price_cents;
                        changed += 1;
                    }
                }
            }
        }
        changed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_seeded() {
        let catalog = Catalog::defaults();
        assert_eq!(
            catalog.categories(),
            vec!["beer", "beverages", "snacks", "spirits"]
        );
        assert_eq!(catalog.in_category("beverages").len(), 5);
        assert_eq!(catalog.len(), DEFAULT_PRODUCTS.len());

        let chips = catalog
            .in_category("snacks")
            .iter()
            .find(|p| p.name == "Chips")
            .unwrap();
        assert_eq!(chips.price_cents, 325);
    }

    #[test]
    fn test_default_ids_are_deterministic() {
        let a = Catalog::defaults();
        let b = Catalog::defaults();
        assert_eq!(a, b);
        assert_eq!(a.in_category("snacks")[0].id, "snacks-0");
    }

    #[test]
    fn test_add_product() {
        let mut catalog = Catalog::new();
        catalog
            .add_product(Product::new("Pretzels", 275, "snacks"))
            .unwrap();
        assert_eq!(catalog.in_category("snacks").len(), 1);
    }

    #[test]
    fn test_add_invalid_fields_rejected() {
        let mut catalog = Catalog::new();
        assert!(catalog.add_product(Product::new("", 275, "snacks")).is_err());
        assert!(catalog
            .add_product(Product::new("Pretzels", 275, "  "))
            .is_err());
        assert!(catalog
            .add_product(Product::new("Pretzels", -1, "snacks"))
            .is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_add_duplicate_name_rejected() {
        let mut catalog = Catalog::new();
        catalog
            .add_product(Product::new("Pretzels", 275, "snacks"))
            .unwrap();
        let err = catalog
            .add_product(Product::new("pretzels", 300, "snacks"))
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateProduct { .. }));

        // Same name in a different category is allowed
        catalog
            .add_product(Product::new("Pretzels", 275, "beverages"))
            .unwrap();
    }

    #[test]
    fn test_remove_product_drops_empty_category() {
        let mut catalog = Catalog::new();
        let product = Product::new("Pretzels", 275, "snacks");
        let id = product.id.clone();
        catalog.add_product(product).unwrap();

        catalog.remove_product(&id, "snacks").unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.remove_product(&id, "snacks").is_err());
    }

    #[test]
    fn test_reconcile_defaults_updates_price() {
        let mut catalog = Catalog::defaults();
        // Simulate a stored catalog with a stale price
        catalog.products.get_mut("snacks").unwrap()[0].price_cents = 999;

        let changed = catalog.reconcile_defaults();
        assert_eq!(changed, 1);
        assert_eq!(catalog.in_category("snacks")[0].price_cents, 1200);

        // Second pass is a no-op
        assert_eq!(catalog.reconcile_defaults(), 0);
    }

    #[test]
    fn test_reconcile_leaves_custom_products_alone() {
        let mut catalog = Catalog::defaults();
        catalog
            .add_product(Product::new("House Special", 1250, "snacks"))
            .unwrap();
        assert_eq!(catalog.reconcile_defaults(), 0);
        let special = catalog
            .in_category("snacks")
            .iter()
            .find(|p| p.name == "House Special")
            .unwrap();
        assert_eq!(special.price_cents, 1250);
    }
}
