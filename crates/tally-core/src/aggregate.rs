//! # Aggregate Computations
//!
//! Derived revenue/tip/count figures over transaction subsets. Nothing here
//! is stored: dashboards and reports recompute from scratch on every pass,
//! which is acceptable at single-location daily-sales volume.
//!
//! ## Windows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Aggregation Windows                             │
//! │                                                                     │
//! │  today          date == current date        (dashboard header)      │
//! │  selected day   date == calendar selection  (calendar, day report)  │
//! │  selected month same calendar month         (month report)          │
//! │  last 7 days    rolling window, one bucket  (bar chart)             │
//! │                 per day, oldest → newest                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Revenue always derives from line items (legacy flat fields for old
//! records) and excludes tips; tips are summed separately.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::types::{PaymentMethod, Transaction};

// =============================================================================
// Reductions
// =============================================================================

/// Revenue over a subset, excluding tips.
pub fn revenue_cents<'a>(subset: impl IntoIterator<Item = &'a Transaction>) -> i64 {
    subset.into_iter().map(Transaction::revenue_cents).sum()
}

/// Tips over a subset.
pub fn tips_cents<'a>(subset: impl IntoIterator<Item = &'a Transaction>) -> i64 {
    subset.into_iter().map(|t| t.tip_cents).sum()
}

// =============================================================================
// Subsets
// =============================================================================

/// Transactions on one calendar day.
pub fn for_date<'a>(
    transactions: &'a [Transaction],
    date: NaiveDate,
) -> impl Iterator<Item = &'a Transaction> {
    transactions.iter().filter(move |t| t.date == date)
}

/// Transactions in the calendar month containing `selected`.
pub fn for_month<'a>(
    transactions: &'a [Transaction],
    selected: NaiveDate,
) -> impl Iterator<Item = &'a Transaction> {
    transactions
        .iter()
        .filter(move |t| t.date.year() == selected.year() && t.date.month() == selected.month())
}

/// Transactions paid with one of the given methods.
pub fn for_methods<'a>(
    transactions: &'a [Transaction],
    methods: &'a [PaymentMethod],
) -> impl Iterator<Item = &'a Transaction> {
    transactions
        .iter()
        .filter(move |t| methods.contains(&t.payment_method))
}

// =============================================================================
// Day Buckets (7-day chart)
// =============================================================================

/// One bar of the rolling revenue chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub revenue_cents: i64,
}

/// Revenue bucketed per day for the 7 days ending at `today`, oldest first.
///
/// Days with no sales produce a zero bucket so the chart always has 7 bars.
pub fn last_seven_days(transactions: &[Transaction], today: NaiveDate) -> Vec<DayBucket> {
    (0..7)
        .map(|i| {
            // 6 - i days back: index 0 is the oldest bar
            let date = today - Days::new(6 - i);
            DayBucket {
                date,
                revenue_cents: revenue_cents(for_date(transactions, date)),
            }
        })
        .collect()
}

// =============================================================================
// Daily Stats (month report)
// =============================================================================

/// Per-day figures inside a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyStats {
    pub revenue_cents: i64,
    pub tips_cents: i64,
    pub count: usize,
}

/// Groups a month's transactions by day.
///
/// Only days with at least one transaction appear; the BTreeMap keeps them
/// in ascending date order for the report table.
pub fn daily_stats(
    transactions: &[Transaction],
    selected: NaiveDate,
) -> BTreeMap<NaiveDate, DailyStats> {
    let mut stats: BTreeMap<NaiveDate, DailyStats> = BTreeMap::new();
    for t in for_month(transactions, selected) {
        let entry = stats.entry(t.date).or_default();
        entry.revenue_cents += t.revenue_cents();
        entry.tips_cents += t.tip_cents;
        entry.count += 1;
    }
    stats
}

// =============================================================================
// Payment Split (dashboard)
// =============================================================================

/// Revenue split by tender type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentSplit {
    /// Revenue from cash transactions.
    pub cash_cents: i64,
    /// Revenue from card and UPI transactions combined.
    pub card_or_upi_cents: i64,
}

/// Splits a subset's revenue into cash vs card-or-upi.
pub fn payment_split<'a>(subset: impl IntoIterator<Item = &'a Transaction>) -> PaymentSplit {
    let mut split = PaymentSplit::default();
    for t in subset {
        match t.payment_method {
            PaymentMethod::Cash => split.cash_cents += t.revenue_cents(),
            PaymentMethod::Card | PaymentMethod::Upi => {
                split.card_or_upi_cents += t.revenue_cents()
            }
        }
    }
    split
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineItem;
    use chrono::Utc;

    fn txn(date: &str, method: PaymentMethod, lines: &[(i64, i64)], tip: i64) -> Transaction {
        Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            date: date.parse().unwrap(),
            timestamp: Utc::now(),
            items: lines
                .iter()
                .enumerate()
                .map(|(i, (price, qty))| LineItem {
                    id: format!("l{i}"),
                    product_name: format!("P{i}"),
                    category: "snacks".to_string(),
                    unit_price_cents: *price,
                    quantity: *qty,
                })
                .collect(),
            total_cents: lines.iter().map(|(p, q)| p * q).sum::<i64>() + tip,
            payment_method: method,
            tip_cents: tip,
            legacy_product_name: None,
            legacy_category: None,
            legacy_unit_price_cents: None,
            legacy_quantity: None,
        }
    }

    fn legacy_txn(date: &str, method: PaymentMethod, price: i64, qty: i64) -> Transaction {
        Transaction {
            items: Vec::new(),
            legacy_product_name: Some("Soda".to_string()),
            legacy_category: Some("beverages".to_string()),
            legacy_unit_price_cents: Some(price),
            legacy_quantity: Some(qty),
            ..txn(date, method, &[], 0)
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn("2026-08-30", PaymentMethod::Cash, &[(200, 1), (300, 2)], 150),
            txn("2026-08-30", PaymentMethod::Card, &[(575, 2)], 0),
            txn("2026-08-29", PaymentMethod::Upi, &[(425, 1)], 100),
            legacy_txn("2026-08-01", PaymentMethod::Cash, 350, 2),
            txn("2026-07-31", PaymentMethod::Card, &[(1000, 1)], 0),
        ]
    }

    #[test]
    fn test_revenue_mixes_item_and_legacy_records() {
        let all = sample();
        // 800 + 1150 + 425 + 700 + 1000
        assert_eq!(revenue_cents(&all), 4075);
        assert_eq!(tips_cents(&all), 250);
    }

    #[test]
    fn test_revenue_partitions_by_payment_method() {
        // revenue(all) == revenue(cash) + revenue(card|upi) when every
        // payment method is one of the three enumerated values
        let all = sample();
        let cash = revenue_cents(for_methods(&all, &[PaymentMethod::Cash]));
        let card_or_upi =
            revenue_cents(for_methods(&all, &[PaymentMethod::Card, PaymentMethod::Upi]));
        assert_eq!(revenue_cents(&all), cash + card_or_upi);

        let split = payment_split(&all);
        assert_eq!(split.cash_cents, cash);
        assert_eq!(split.card_or_upi_cents, card_or_upi);
    }

    #[test]
    fn test_for_date_window() {
        let all = sample();
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        assert_eq!(for_date(&all, today).count(), 2);
        assert_eq!(revenue_cents(for_date(&all, today)), 1950);
        assert_eq!(tips_cents(for_date(&all, today)), 150);
    }

    #[test]
    fn test_for_month_window() {
        let all = sample();
        let selected: NaiveDate = "2026-08-15".parse().unwrap();
        assert_eq!(for_month(&all, selected).count(), 4);
        assert_eq!(revenue_cents(for_month(&all, selected)), 3075);
    }

    #[test]
    fn test_last_seven_days_buckets() {
        let all = sample();
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        let buckets = last_seven_days(&all, today);

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].date, "2026-08-24".parse().unwrap());
        assert_eq!(buckets[6].date, today);
        assert_eq!(buckets[6].revenue_cents, 1950);
        assert_eq!(buckets[5].revenue_cents, 425);
        // Quiet days still produce a bar
        assert_eq!(buckets[0].revenue_cents, 0);
    }

    #[test]
    fn test_daily_stats_orders_days_ascending() {
        let all = sample();
        let stats = daily_stats(&all, "2026-08-15".parse().unwrap());

        let days: Vec<NaiveDate> = stats.keys().copied().collect();
        assert_eq!(
            days,
            vec![
                "2026-08-01".parse().unwrap(),
                "2026-08-29".parse().unwrap(),
                "2026-08-30".parse().unwrap(),
            ]
        );

        let last_day = &stats[&"2026-08-30".parse().unwrap()];
        assert_eq!(last_day.count, 2);
        assert_eq!(last_day.revenue_cents, 1950);
        assert_eq!(last_day.tips_cents, 150);
    }

    #[test]
    fn test_empty_subset_is_zero() {
        let none: Vec<Transaction> = Vec::new();
        assert_eq!(revenue_cents(&none), 0);
        assert_eq!(tips_cents(&none), 0);
        assert!(daily_stats(&none, "2026-08-15".parse().unwrap()).is_empty());
    }
}
