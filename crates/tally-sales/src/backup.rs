//! # Auto-Backup
//!
//! A single rolling snapshot of the whole dataset, written on demand to
//! `auto_backup.json` in the data directory (the `backup` command captures
//! it). Restore reads it back for disaster recovery when the database is
//! lost.
//!
//! The file is one JSON object:
//! ```json
//! { "version": 1, "timestamp": 1756540800000,
//!   "products": { "snacks": [ ... ] }, "transactions": [ ... ] }
//! ```
//! `timestamp` is epoch milliseconds of when the snapshot was taken.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tally_core::{Catalog, Transaction};

use crate::error::ServiceResult;

/// File name of the rolling snapshot inside the data directory.
pub const BACKUP_FILE: &str = "auto_backup.json";

/// Current snapshot format version.
pub const BACKUP_VERSION: u32 = 1;

/// The snapshot envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupData {
    pub version: u32,
    /// Epoch milliseconds of the snapshot.
    pub timestamp: i64,
    pub products: Catalog,
    pub transactions: Vec<Transaction>,
}

impl BackupData {
    /// Captures a snapshot of the current dataset, stamped now.
    pub fn capture(products: Catalog, transactions: Vec<Transaction>) -> Self {
        BackupData {
            version: BACKUP_VERSION,
            timestamp: Utc::now().timestamp_millis(),
            products,
            transactions,
        }
    }
}

fn backup_path(dir: &Path) -> PathBuf {
    dir.join(BACKUP_FILE)
}

/// Writes the snapshot, replacing any previous one.
pub async fn save_backup(dir: &Path, data: &BackupData) -> ServiceResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = backup_path(dir);
    let json = serde_json::to_string(data)?;
    tokio::fs::write(&path, json).await?;
    debug!(path = %path.display(), transactions = data.transactions.len(), "backup saved");
    Ok(path)
}

/// True when a snapshot file exists in `dir`.
pub async fn backup_exists(dir: &Path) -> bool {
    tokio::fs::try_exists(backup_path(dir)).await.unwrap_or(false)
}

/// Reads the snapshot back. `Ok(None)` when no snapshot exists.
pub async fn restore_backup(dir: &Path) -> ServiceResult<Option<BackupData>> {
    let path = backup_path(dir);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let data: BackupData = serde_json::from_str(&content)?;
    info!(
        path = %path.display(),
        version = data.version,
        transactions = data.transactions.len(),
        "backup restored"
    );
    Ok(Some(data))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_backup_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!backup_exists(dir.path()).await);

        let data = BackupData::capture(Catalog::defaults(), Vec::new());
        save_backup(dir.path(), &data).await.unwrap();
        assert!(backup_exists(dir.path()).await);

        let restored = restore_backup(dir.path()).await.unwrap().unwrap();
        assert_eq!(restored.version, BACKUP_VERSION);
        assert_eq!(restored.timestamp, data.timestamp);
        assert_eq!(restored.products, data.products);
        assert!(restored.transactions.is_empty());
    }

    #[tokio::test]
    async fn test_restore_without_backup_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(restore_backup(dir.path()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let first = BackupData {
            version: BACKUP_VERSION,
            timestamp: 1,
            products: Catalog::new(),
            transactions: Vec::new(),
        };
        save_backup(dir.path(), &first).await.unwrap();

        let second = BackupData {
            timestamp: 2,
            ..first
        };
        save_backup(dir.path(), &second).await.unwrap();

        let restored = restore_backup(dir.path()).await.unwrap().unwrap();
        assert_eq!(restored.timestamp, 2);
    }

    #[tokio::test]
    async fn test_malformed_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(BACKUP_FILE), "not json")
            .await
            .unwrap();
        assert!(restore_backup(dir.path()).await.is_err());
    }
}
