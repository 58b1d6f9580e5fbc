//! # Sales Service
//!
//! The orchestration point for a sales session. Owns the in-memory cart,
//! turns it into persisted transactions at checkout, and fronts the
//! transaction history operations.
//!
//! ## Checkout Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Checkout Path                              │
//! │                                                                     │
//! │  1. tip must be non-negative            (validation error otherwise)│
//! │  2. cart must be non-empty              (EmptyCart otherwise)       │
//! │  3. build Transaction from cart + tip   (total includes tip,        │
//! │     sale day supplied by the caller)                                │
//! │  4. insert within 10 seconds            (CheckoutTimeout otherwise) │
//! │  5. on success ONLY: clear the cart                                 │
//! │  6. emit analytics: one transaction_added, one product_sold         │
//! │     per line item                                                   │
//! │                                                                     │
//! │  A failed or timed-out persist leaves the cart intact so the        │
//! │  operator can retry without re-ringing the sale.                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart lives behind a `tokio::sync::Mutex` and the lock is held for
//! the whole checkout, so a concurrent `add_to_cart` cannot slip between
//! the persist and the clear.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use tally_core::cart::{Cart, CartItem};
use tally_core::error::CoreError;
use tally_core::validation::validate_tip_cents;
use tally_core::{Catalog, PaymentMethod, Product, Transaction};
use tally_db::Database;

use crate::analytics::{Analytics, TracingAnalytics};
use crate::error::{ServiceError, ServiceResult};

/// How long a checkout persist may take before the sale is abandoned.
pub const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(10);

/// The sales session service.
pub struct SalesService {
    db: Database,
    cart: Mutex<Cart>,
    analytics: Arc<dyn Analytics>,
}

impl SalesService {
    /// Creates a service with the default tracing-backed analytics sink.
    pub fn new(db: Database) -> Self {
        Self::with_analytics(db, Arc::new(TracingAnalytics))
    }

    /// Creates a service with a caller-provided analytics sink.
    pub fn with_analytics(db: Database, analytics: Arc<dyn Analytics>) -> Self {
        SalesService {
            db,
            cart: Mutex::new(Cart::new()),
            analytics,
        }
    }

    /// The underlying database handle, for catalog and settings access.
    pub fn db(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds a product to the cart, merging by product name.
    ///
    /// Returns a snapshot of the affected cart line.
    pub async fn add_to_cart(&self, product: &Product, quantity: i64) -> ServiceResult<CartItem> {
        let mut cart = self.cart.lock().await;
        let line = cart.add(product, quantity)?;
        Ok(line.clone())
    }

    /// Removes a cart line by id. Absent ids are a no-op.
    pub async fn remove_from_cart(&self, item_id: &str) {
        self.cart.lock().await.remove(item_id);
    }

    /// Empties the cart without recording anything.
    pub async fn clear_cart(&self) {
        self.cart.lock().await.clear();
    }

    /// Snapshot of the current cart lines.
    pub async fn cart_items(&self) -> Vec<CartItem> {
        self.cart.lock().await.items().to_vec()
    }

    /// Current cart subtotal, excluding tip.
    pub async fn cart_subtotal_cents(&self) -> i64 {
        self.cart.lock().await.subtotal_cents()
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Converts the cart into a persisted transaction.
    ///
    /// `date` is the sale day as the operator's device sees it; the service
    /// never derives it from the clock, so a near-midnight sale in a non-UTC
    /// locale still files under the right calendar day.
    ///
    /// The stored total includes the tip. The cart is cleared only after
    /// the insert succeeds; on timeout or storage failure it is untouched.
    pub async fn checkout(
        &self,
        date: NaiveDate,
        payment_method: PaymentMethod,
        tip_cents: i64,
    ) -> ServiceResult<Transaction> {
        validate_tip_cents(tip_cents).map_err(CoreError::Validation)?;

        let mut cart = self.cart.lock().await;
        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            date,
            timestamp: Utc::now(),
            items: cart
                .items()
                .iter()
                .cloned()
                .map(CartItem::into_line_item)
                .collect(),
            total_cents: cart.total_with_tip_cents(tip_cents),
            payment_method,
            tip_cents,
            legacy_product_name: None,
            legacy_category: None,
            legacy_unit_price_cents: None,
            legacy_quantity: None,
        };

        match timeout(CHECKOUT_TIMEOUT, self.db.transactions().insert(&transaction)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    id = %transaction.id,
                    seconds = CHECKOUT_TIMEOUT.as_secs(),
                    "checkout persist timed out; cart kept for retry"
                );
                return Err(ServiceError::CheckoutTimeout {
                    seconds: CHECKOUT_TIMEOUT.as_secs(),
                });
            }
        }

        cart.clear();

        self.analytics
            .transaction_added(transaction.total_cents, payment_method);
        for item in &transaction.items {
            self.analytics
                .product_sold(&item.product_name, item.line_total_cents());
        }

        info!(
            id = %transaction.id,
            total_cents = transaction.total_cents,
            items = transaction.items.len(),
            payment = payment_method.label(),
            "sale recorded"
        );
        Ok(transaction)
    }

    // =========================================================================
    // Transaction History
    // =========================================================================

    /// All transactions, newest first.
    pub async fn transactions(&self) -> ServiceResult<Vec<Transaction>> {
        Ok(self.db.transactions().list_all().await?)
    }

    /// Transactions on one calendar day, newest first.
    pub async fn transactions_for_date(&self, date: NaiveDate) -> ServiceResult<Vec<Transaction>> {
        Ok(self.db.transactions().list_by_date(date).await?)
    }

    /// Persists a fully-built transaction record, bypassing the cart.
    pub async fn add_transaction(&self, transaction: &Transaction) -> ServiceResult<()> {
        self.db.transactions().insert(transaction).await?;
        Ok(())
    }

    /// Deletes one transaction by id.
    pub async fn delete_transaction(&self, id: &str) -> ServiceResult<()> {
        self.db.transactions().delete(id).await?;
        info!(id, "transaction deleted");
        Ok(())
    }

    /// Replaces a transaction record, items included.
    pub async fn update_transaction(&self, transaction: &Transaction) -> ServiceResult<()> {
        self.db.transactions().update(transaction).await?;
        info!(id = %transaction.id, "transaction updated");
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Loads the product catalog, seeding and reconciling defaults.
    pub async fn catalog(&self) -> ServiceResult<Catalog> {
        Ok(self.db.products().load_catalog().await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AnalyticsEvent, RecordingAnalytics};
    use tally_db::DbConfig;

    async fn service() -> (SalesService, Arc<RecordingAnalytics>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let analytics = Arc::new(RecordingAnalytics::new());
        (SalesService::with_analytics(db, analytics.clone()), analytics)
    }

    fn product(name: &str, price_cents: i64) -> Product {
        Product::new(name, price_cents, "snacks")
    }

    fn sale_day() -> NaiveDate {
        "2026-08-30".parse().unwrap()
    }

    #[tokio::test]
    async fn test_cart_operations_through_service() {
        let (svc, _) = service().await;

        svc.add_to_cart(&product("Chips", 300), 2).await.unwrap();
        let line = svc.add_to_cart(&product("Coke", 200), 1).await.unwrap();
        // Same name merges into one line
        svc.add_to_cart(&product("Chips", 300), 1).await.unwrap();

        let items = svc.cart_items().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(svc.cart_subtotal_cents().await, 1100);

        svc.remove_from_cart(&line.id).await;
        assert_eq!(svc.cart_items().await.len(), 1);

        svc.clear_cart().await;
        assert!(svc.cart_items().await.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_rejected() {
        let (svc, analytics) = service().await;
        let err = svc
            .checkout(sale_day(), PaymentMethod::Cash, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::EmptyCart)));
        assert!(analytics.events().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_negative_tip_is_rejected() {
        let (svc, _) = service().await;
        svc.add_to_cart(&product("Coke", 200), 1).await.unwrap();

        let err = svc
            .checkout(sale_day(), PaymentMethod::Cash, -50)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::Validation(_))));
        // Nothing recorded, cart intact for a corrected retry
        assert!(svc.transactions().await.unwrap().is_empty());
        assert_eq!(svc.cart_items().await.len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_persists_and_clears_cart() {
        let (svc, analytics) = service().await;
        svc.add_to_cart(&product("Coke", 200), 1).await.unwrap();
        svc.add_to_cart(&product("Chips", 300), 2).await.unwrap();

        let txn = svc
            .checkout(sale_day(), PaymentMethod::Card, 150)
            .await
            .unwrap();

        // total includes tip; revenue excludes it
        assert_eq!(txn.total_cents, 950);
        assert_eq!(txn.revenue_cents(), 800);
        assert_eq!(txn.items.len(), 2);
        // Sale files under the caller's calendar day, not the UTC clock's
        assert_eq!(txn.date, sale_day());
        assert!(svc.cart_items().await.is_empty());

        let stored = svc.transactions().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, txn.id);
        assert_eq!(stored[0].payment_method, PaymentMethod::Card);

        let events = analytics.events();
        assert_eq!(
            events[0],
            AnalyticsEvent::TransactionAdded {
                total_cents: 950,
                payment_method: PaymentMethod::Card,
            }
        );
        assert_eq!(
            events[1],
            AnalyticsEvent::ProductSold {
                product_name: "Coke".to_string(),
                amount_cents: 200,
            }
        );
        assert_eq!(
            events[2],
            AnalyticsEvent::ProductSold {
                product_name: "Chips".to_string(),
                amount_cents: 600,
            }
        );
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let (svc, _) = service().await;
        svc.add_to_cart(&product("Coke", 200), 1).await.unwrap();
        let first = svc
            .checkout(sale_day(), PaymentMethod::Cash, 0)
            .await
            .unwrap();
        svc.add_to_cart(&product("Chips", 300), 1).await.unwrap();
        let second = svc
            .checkout(sale_day(), PaymentMethod::Cash, 0)
            .await
            .unwrap();

        svc.delete_transaction(&first.id).await.unwrap();

        let remaining = svc.transactions().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let (svc, _) = service().await;
        let err = svc.delete_transaction("no-such-id").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Db(tally_db::DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_transaction_replaces_fields() {
        let (svc, _) = service().await;
        svc.add_to_cart(&product("Coke", 200), 1).await.unwrap();
        let mut txn = svc
            .checkout(sale_day(), PaymentMethod::Cash, 0)
            .await
            .unwrap();

        txn.payment_method = PaymentMethod::Upi;
        txn.tip_cents = 100;
        txn.total_cents = 300;
        svc.update_transaction(&txn).await.unwrap();

        let stored = svc.transactions().await.unwrap();
        assert_eq!(stored[0].payment_method, PaymentMethod::Upi);
        assert_eq!(stored[0].tip_cents, 100);
        assert_eq!(stored[0].total_cents, 300);
    }

    #[tokio::test]
    async fn test_catalog_is_seeded_on_first_load() {
        let (svc, _) = service().await;
        let catalog = svc.catalog().await.unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.categories().contains(&"snacks"));
    }
}
