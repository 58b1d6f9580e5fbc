//! # Transaction Repository
//!
//! Database operations for sale records and their line items.
//!
//! ## Record Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Two Record Shapes                              │
//! │                                                                     │
//! │  Multi-item record                 Legacy record                    │
//! │  ─────────────────                 ─────────────                    │
//! │  transactions row                  transactions row                 │
//! │    └── transaction_items rows        └── flat legacy_* columns      │
//! │        (ordered by position)             (no item rows)             │
//! │                                                                     │
//! │  Writes always produce multi-item records; legacy rows only enter   │
//! │  through updates to old data and through import.                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All queries are bound at runtime so the crate builds without a live
//! database or prepared-query cache.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use tally_core::{LineItem, PaymentMethod, Transaction};

// =============================================================================
// Row Types
// =============================================================================

/// A `transactions` table row: a [`Transaction`] without its item list.
#[derive(Debug, FromRow)]
struct TransactionRow {
    id: String,
    date: NaiveDate,
    timestamp: DateTime<Utc>,
    total_cents: i64,
    payment_method: PaymentMethod,
    tip_cents: i64,
    legacy_product_name: Option<String>,
    legacy_category: Option<String>,
    legacy_unit_price_cents: Option<i64>,
    legacy_quantity: Option<i64>,
}

impl TransactionRow {
    fn into_transaction(self, items: Vec<LineItem>) -> Transaction {
        Transaction {
            id: self.id,
            date: self.date,
            timestamp: self.timestamp,
            items,
            total_cents: self.total_cents,
            payment_method: self.payment_method,
            tip_cents: self.tip_cents,
            legacy_product_name: self.legacy_product_name,
            legacy_category: self.legacy_category,
            legacy_unit_price_cents: self.legacy_unit_price_cents,
            legacy_quantity: self.legacy_quantity,
        }
    }
}

/// A `transaction_items` table row.
#[derive(Debug, FromRow)]
struct ItemRow {
    id: String,
    transaction_id: String,
    product_name: String,
    category: String,
    unit_price_cents: i64,
    quantity: i64,
}

impl From<ItemRow> for LineItem {
    fn from(row: ItemRow) -> Self {
        LineItem {
            id: row.id,
            product_name: row.product_name,
            category: row.category,
            unit_price_cents: row.unit_price_cents,
            quantity: row.quantity,
        }
    }
}

const SELECT_COLUMNS: &str = "id, date, timestamp, total_cents, payment_method, tip_cents, \
     legacy_product_name, legacy_category, legacy_unit_price_cents, legacy_quantity";

// =============================================================================
// Repository
// =============================================================================

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Inserts a transaction and its line items in one SQL transaction.
    ///
    /// Either the header and every item land together, or nothing does.
    pub async fn insert(&self, transaction: &Transaction) -> DbResult<()> {
        debug!(id = %transaction.id, total = transaction.total_cents, "Inserting transaction");

        let mut tx = self.pool.begin().await?;
        Self::insert_in(&mut tx, transaction).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Inserts the header and items using an open SQL transaction.
    async fn insert_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        transaction: &Transaction,
    ) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO transactions \
             (id, date, timestamp, total_cents, payment_method, tip_cents, \
              legacy_product_name, legacy_category, legacy_unit_price_cents, legacy_quantity) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&transaction.id)
        .bind(transaction.date)
        .bind(transaction.timestamp)
        .bind(transaction.total_cents)
        .bind(transaction.payment_method)
        .bind(transaction.tip_cents)
        .bind(&transaction.legacy_product_name)
        .bind(&transaction.legacy_category)
        .bind(transaction.legacy_unit_price_cents)
        .bind(transaction.legacy_quantity)
        .execute(&mut **tx)
        .await?;

        Self::insert_items_in(tx, &transaction.id, &transaction.items).await
    }

    async fn insert_items_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        transaction_id: &str,
        items: &[LineItem],
    ) -> DbResult<()> {
        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO transaction_items \
                 (id, transaction_id, product_name, category, unit_price_cents, quantity, position) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .bind(&item.id)
            .bind(transaction_id)
            .bind(&item.product_name)
            .bind(&item.category)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(position as i64)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Gets a transaction by id, with its line items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM transactions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.items_for(id).await?;
                Ok(Some(row.into_transaction(items)))
            }
            None => Ok(None),
        }
    }

    /// Lists all transactions, newest first.
    ///
    /// Ordering matches the source feed the UI subscribes to: creation
    /// timestamp descending.
    pub async fn list_all(&self) -> DbResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM transactions ORDER BY timestamp DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.assemble(rows).await
    }

    /// Lists transactions on one calendar day, newest first.
    pub async fn list_by_date(&self, date: NaiveDate) -> DbResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM transactions WHERE date = ?1 ORDER BY timestamp DESC"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        self.assemble(rows).await
    }

    /// Deletes a transaction by id. Line items cascade.
    ///
    /// ## Errors
    /// [`DbError::NotFound`] when no row has the id, so a double delete
    /// surfaces instead of silently succeeding.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting transaction");

        let result = sqlx::query("DELETE FROM transactions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }
        Ok(())
    }

    /// Overwrites a stored transaction by id with the full new payload.
    ///
    /// Line items are replaced wholesale: the old set is deleted and the
    /// new set inserted, all inside one SQL transaction.
    pub async fn update(&self, transaction: &Transaction) -> DbResult<()> {
        debug!(id = %transaction.id, "Updating transaction");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE transactions SET \
             date = ?2, timestamp = ?3, total_cents = ?4, payment_method = ?5, tip_cents = ?6, \
             legacy_product_name = ?7, legacy_category = ?8, \
             legacy_unit_price_cents = ?9, legacy_quantity = ?10 \
             WHERE id = ?1",
        )
        .bind(&transaction.id)
        .bind(transaction.date)
        .bind(transaction.timestamp)
        .bind(transaction.total_cents)
        .bind(transaction.payment_method)
        .bind(transaction.tip_cents)
        .bind(&transaction.legacy_product_name)
        .bind(&transaction.legacy_category)
        .bind(transaction.legacy_unit_price_cents)
        .bind(transaction.legacy_quantity)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", &transaction.id));
        }

        sqlx::query("DELETE FROM transaction_items WHERE transaction_id = ?1")
            .bind(&transaction.id)
            .execute(&mut *tx)
            .await?;
        Self::insert_items_in(&mut tx, &transaction.id, &transaction.items).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Total number of stored transactions.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Inserts transactions whose ids are not already stored.
    ///
    /// Used by merge-import: a shared identifier is never double-counted.
    /// Returns (inserted, skipped).
    pub async fn insert_missing(&self, transactions: &[Transaction]) -> DbResult<(usize, usize)> {
        let mut inserted = 0;
        let mut skipped = 0;

        let mut tx = self.pool.begin().await?;
        for transaction in transactions {
            let exists: Option<String> =
                sqlx::query_scalar("SELECT id FROM transactions WHERE id = ?1")
                    .bind(&transaction.id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if exists.is_some() {
                skipped += 1;
                continue;
            }
            Self::insert_in(&mut tx, transaction).await?;
            inserted += 1;
        }
        tx.commit().await?;

        debug!(inserted, skipped, "Merged imported transactions");
        Ok((inserted, skipped))
    }

    /// Replaces the whole transaction store with the given records.
    ///
    /// Used by overwrite-import.
    pub async fn replace_all(&self, transactions: &[Transaction]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM transaction_items")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM transactions")
            .execute(&mut *tx)
            .await?;
        for transaction in transactions {
            Self::insert_in(&mut tx, transaction).await?;
        }

        tx.commit().await?;
        debug!(count = transactions.len(), "Replaced transaction store");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    async fn items_for(&self, transaction_id: &str) -> DbResult<Vec<LineItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, transaction_id, product_name, category, unit_price_cents, quantity \
             FROM transaction_items WHERE transaction_id = ?1 ORDER BY position",
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LineItem::from).collect())
    }

    /// Attaches line items to header rows with one combined items query.
    async fn assemble(&self, rows: Vec<TransactionRow>) -> DbResult<Vec<Transaction>> {
        let all_items: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, transaction_id, product_name, category, unit_price_cents, quantity \
             FROM transaction_items ORDER BY transaction_id, position",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_transaction: HashMap<String, Vec<LineItem>> = HashMap::new();
        for item in all_items {
            by_transaction
                .entry(item.transaction_id.clone())
                .or_default()
                .push(item.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = by_transaction.remove(&row.id).unwrap_or_default();
                row.into_transaction(items)
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
