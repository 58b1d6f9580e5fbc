//! # Analytics Events
//!
//! Business events emitted on successful checkout. The default sink writes
//! them to the `tracing` stream under the `analytics` target, so whatever
//! subscriber the binary installs decides where they end up.
//!
//! ## Events
//! - `transaction_added`: once per checkout, with total and tender type
//! - `product_sold`: once per line item, with name and line revenue
//!
//! Event emission must never fail a sale; the trait methods are infallible
//! and sinks swallow their own problems.

use std::sync::Mutex;

use tally_core::PaymentMethod;
use tracing::info;

/// Sink for checkout business events.
pub trait Analytics: Send + Sync {
    /// A sale was recorded. `total_cents` includes the tip.
    fn transaction_added(&self, total_cents: i64, payment_method: PaymentMethod);

    /// One line item of a sale. `amount_cents` is the line revenue.
    fn product_sold(&self, product_name: &str, amount_cents: i64);
}

// =============================================================================
// Tracing Sink (default)
// =============================================================================

/// Emits analytics events as structured `tracing` records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl Analytics for TracingAnalytics {
    fn transaction_added(&self, total_cents: i64, payment_method: PaymentMethod) {
        info!(
            target: "analytics",
            event = "transaction_added",
            value = total_cents,
            currency = "USD",
            payment_method = payment_method.label(),
        );
    }

    fn product_sold(&self, product_name: &str, amount_cents: i64) {
        info!(
            target: "analytics",
            event = "product_sold",
            product = product_name,
            value = amount_cents,
            currency = "USD",
        );
    }
}

// =============================================================================
// Recording Sink (tests)
// =============================================================================

/// One recorded event, for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsEvent {
    TransactionAdded {
        total_cents: i64,
        payment_method: PaymentMethod,
    },
    ProductSold {
        product_name: String,
        amount_cents: i64,
    },
}

/// In-memory sink that keeps every event, in order.
#[derive(Debug, Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl Analytics for RecordingAnalytics {
    fn transaction_added(&self, total_cents: i64, payment_method: PaymentMethod) {
        if let Ok(mut events) = self.events.lock() {
            events.push(AnalyticsEvent::TransactionAdded {
                total_cents,
                payment_method,
            });
        }
    }

    fn product_sold(&self, product_name: &str, amount_cents: i64) {
        if let Ok(mut events) = self.events.lock() {
            events.push(AnalyticsEvent::ProductSold {
                product_name: product_name.to_string(),
                amount_cents,
            });
        }
    }
}
