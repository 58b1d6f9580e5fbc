//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │   Transaction   │   │    LineItem     │   │     Product     │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (UUID)      │──►│  product_name   │   │  id             │   │
//! │  │  date           │   │  category       │   │  name           │   │
//! │  │  timestamp      │   │  unit_price     │   │  price_cents    │   │
//! │  │  items[]        │   │  quantity       │   │  category       │   │
//! │  │  total_cents    │   └─────────────────┘   └─────────────────┘   │
//! │  │  payment_method │                                               │
//! │  │  tip_cents      │   ┌─────────────────┐                         │
//! │  │  legacy fields  │   │  PaymentMethod  │                         │
//! │  └─────────────────┘   │  Cash|Card|Upi  │                         │
//! │                        └─────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Legacy Compatibility
//! Early transaction records were single-item: one flat product name,
//! category, price, and quantity on the record itself. Newer records carry a
//! list of line items instead. Exactly one of the two forms is meaningful per
//! record; consumers branch on `items.is_empty()`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid for a sale.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// UPI transfer.
    Upi,
}

impl PaymentMethod {
    /// All enumerated methods, in display order.
    pub const ALL: [PaymentMethod; 3] =
        [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Upi];

    /// Uppercase label used in report tables.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Upi => "UPI",
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of a multi-item sale.
///
/// The product name, category, and unit price are snapshots taken when the
/// item entered the cart; later catalog edits do not rewrite sale history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Category at time of sale (frozen).
    pub category: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Quantity sold.
    pub quantity: i64,
}

impl LineItem {
    /// Line total before tip (unit price × quantity).
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// One recorded sale event, single- or multi-item.
///
/// ## Invariant
/// Exactly one of {non-empty `items`, legacy flat fields} is meaningful per
/// record. [`Transaction::revenue_cents`] and every aggregate pass branch on
/// `items.is_empty()`.
///
/// ## Total vs revenue
/// `total_cents` is what was stored at checkout: item subtotal plus tip.
/// `revenue_cents()` derives the subtotal from line items and excludes tip.
/// The two deliberately disagree by the tip amount; dashboards and reports
/// always use the derived revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Calendar day of the sale (serialized `YYYY-MM-DD`).
    pub date: NaiveDate,

    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Line items for multi-item orders. Empty for legacy records.
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Stored total: item subtotal plus tip at checkout time.
    pub total_cents: i64,

    /// How the customer paid.
    pub payment_method: PaymentMethod,

    /// Tip in cents (non-negative).
    #[serde(default)]
    pub tip_cents: i64,

    // Legacy single-item fields, present only on old records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_unit_price_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_quantity: Option<i64>,
}

impl Transaction {
    /// True when this is a legacy single-item record.
    #[inline]
    pub fn is_legacy(&self) -> bool {
        self.items.is_empty()
    }

    /// Revenue for this transaction, excluding tip.
    ///
    /// Multi-item records sum `price × quantity` over their line items;
    /// legacy records multiply the flat price and quantity, treating missing
    /// fields as zero.
    pub fn revenue_cents(&self) -> i64 {
        if !self.items.is_empty() {
            self.items.iter().map(LineItem::line_total_cents).sum()
        } else {
            self.legacy_unit_price_cents.unwrap_or(0) * self.legacy_quantity.unwrap_or(0)
        }
    }

    /// Revenue plus tip.
    #[inline]
    pub fn revenue_with_tip_cents(&self) -> i64 {
        self.revenue_cents() + self.tip_cents
    }

    /// Number of distinct line items (1 for legacy records).
    pub fn item_count(&self) -> usize {
        if self.items.is_empty() {
            1
        } else {
            self.items.len()
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A sellable product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier.
    pub id: String,
    /// Display name shown on the sell grid and receipts.
    pub name: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Category the product is grouped under.
    pub category: String,
}

impl Product {
    /// Creates a product with a freshly generated identifier.
    pub fn new(name: impl Into<String>, price_cents: i64, category: impl Into<String>) -> Self {
        Product {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            price_cents,
            category: category.into(),
        }
    }

    /// Returns the price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Theme
// =============================================================================

/// UI theme preference, persisted in settings.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn multi_item(items: Vec<(i64, i64)>, tip: i64) -> Transaction {
        Transaction {
            id: "t1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            timestamp: Utc::now(),
            items: items
                .into_iter()
                .enumerate()
                .map(|(i, (price, qty))| LineItem {
                    id: format!("i{i}"),
                    product_name: format!("Item {i}"),
                    category: "snacks".to_string(),
                    unit_price_cents: price,
                    quantity: qty,
                })
                .collect(),
            total_cents: 0,
            payment_method: PaymentMethod::Cash,
            tip_cents: tip,
            legacy_product_name: None,
            legacy_category: None,
            legacy_unit_price_cents: None,
            legacy_quantity: None,
        }
    }

    #[test]
    fn test_revenue_multi_item() {
        let t = multi_item(vec![(200, 1), (300, 2)], 150);
        assert_eq!(t.revenue_cents(), 800);
        assert_eq!(t.revenue_with_tip_cents(), 950);
        assert!(!t.is_legacy());
    }

    #[test]
    fn test_revenue_legacy() {
        let t = Transaction {
            items: Vec::new(),
            legacy_product_name: Some("Soda".to_string()),
            legacy_category: Some("beverages".to_string()),
            legacy_unit_price_cents: Some(350),
            legacy_quantity: Some(2),
            ..multi_item(vec![], 0)
        };
        assert!(t.is_legacy());
        assert_eq!(t.revenue_cents(), 700);
        assert_eq!(t.item_count(), 1);
    }

    #[test]
    fn test_revenue_legacy_missing_fields_is_zero() {
        let t = multi_item(vec![], 0);
        assert_eq!(t.revenue_cents(), 0);
    }

    #[test]
    fn test_date_serializes_as_iso() {
        let t = multi_item(vec![(100, 1)], 0);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["date"], "2026-08-30");
        assert_eq!(json["paymentMethod"], "cash");
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(PaymentMethod::Cash.label(), "CASH");
        assert_eq!(PaymentMethod::Upi.label(), "UPI");
    }
}
