//! # Export / Import
//!
//! Manual data portability: export writes the full dataset as pretty JSON
//! to a stamped file, import reads such a file back into the database.
//!
//! ## Import Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Import Semantics                            │
//! │                                                                     │
//! │  Merge:      keep existing history, insert only records whose id   │
//! │              is not already present                                │
//! │              result count = existing ∪ imported (dedup by id)      │
//! │                                                                     │
//! │  Overwrite:  drop existing history, keep only the imported records │
//! │                                                                     │
//! │  Either way only TRANSACTIONS are applied; the products section of │
//! │  the file is carried for completeness but never imported.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The envelope matches the auto-backup format, so a backup file imports
//! cleanly too.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use tally_core::{Catalog, Transaction};
use tally_db::Database;

use crate::backup::BACKUP_VERSION;
use crate::error::{ServiceError, ServiceResult};

// =============================================================================
// Export
// =============================================================================

/// The export envelope. Same shape as [`crate::backup::BackupData`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    pub version: u32,
    /// Epoch milliseconds of the export.
    pub timestamp: i64,
    pub products: Catalog,
    pub transactions: Vec<Transaction>,
}

/// Stamped export file name: `backup-2026-08-30-1430.json`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("backup-{}.json", now.format("%Y-%m-%d-%H%M"))
}

/// Gathers the full dataset into an export envelope, stamped now.
pub async fn export_data(db: &Database) -> ServiceResult<ExportData> {
    Ok(ExportData {
        version: BACKUP_VERSION,
        timestamp: Utc::now().timestamp_millis(),
        products: db.products().load_catalog().await?,
        transactions: db.transactions().list_all().await?,
    })
}

/// Writes an export envelope as pretty JSON. Returns the file path.
pub async fn write_export(dir: &Path, data: &ExportData) -> ServiceResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(export_filename(Utc::now()));
    let json = serde_json::to_string_pretty(data)?;
    tokio::fs::write(&path, json).await?;
    info!(
        path = %path.display(),
        transactions = data.transactions.len(),
        "data exported"
    );
    Ok(path)
}

// =============================================================================
// Import
// =============================================================================

/// How imported transactions combine with existing history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Keep existing records, add imported ones with unseen ids.
    Merge,
    /// Replace the whole history with the imported records.
    Overwrite,
}

/// What an import did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub mode: ImportMode,
    /// Records written to the database.
    pub inserted: usize,
    /// Records skipped because their id already existed (merge only).
    pub skipped: usize,
}

/// Loose envelope for parsing: fields may be absent in hand-edited files.
#[derive(Debug, Deserialize)]
struct ImportFile {
    #[serde(default)]
    transactions: Option<Vec<Transaction>>,
}

/// Parses an import file's content, requiring a transactions section.
pub fn parse_import(content: &str) -> ServiceResult<Vec<Transaction>> {
    let file: ImportFile = serde_json::from_str(content)?;
    file.transactions
        .ok_or_else(|| ServiceError::InvalidImport("no transactions section".to_string()))
}

/// Applies parsed transactions to the database.
pub async fn apply_import(
    db: &Database,
    transactions: &[Transaction],
    mode: ImportMode,
) -> ServiceResult<ImportOutcome> {
    let outcome = match mode {
        ImportMode::Merge => {
            let (inserted, skipped) = db.transactions().insert_missing(transactions).await?;
            ImportOutcome {
                mode,
                inserted,
                skipped,
            }
        }
        ImportMode::Overwrite => {
            db.transactions().replace_all(transactions).await?;
            ImportOutcome {
                mode,
                inserted: transactions.len(),
                skipped: 0,
            }
        }
    };
    info!(
        ?mode,
        inserted = outcome.inserted,
        skipped = outcome.skipped,
        "import applied"
    );
    Ok(outcome)
}

/// Reads, parses, and applies an import file in one step.
pub async fn import_file(
    db: &Database,
    path: &Path,
    mode: ImportMode,
) -> ServiceResult<ImportOutcome> {
    let content = tokio::fs::read_to_string(path).await?;
    let transactions = parse_import(&content)?;
    apply_import(db, &transactions, mode).await
}

// =============================================================================
// Unit Tests
// =============================================================================
