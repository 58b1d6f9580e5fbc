//! # Report File Writer
//!
//! Places a rendered report on disk without ever exposing a half-written
//! file: any stale copy is removed first, the new document goes to a
//! temporary sibling, and a rename swaps it into place. Readers either see
//! the previous report or the complete new one.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ReportError, ReportResult};

/// Writes `html` to `dir/file_name`, replacing any previous report.
///
/// Creates `dir` if missing. Returns the final path.
pub async fn write_report(dir: &Path, file_name: &str, html: &str) -> ReportResult<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ReportError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

    let target = dir.join(file_name);
    let temp = dir.join(format!("{file_name}.tmp"));

    // Stale report from a previous run; absent is fine.
    match tokio::fs::remove_file(&target).await {
        Ok(()) => debug!(path = %target.display(), "removed stale report"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ReportError::Write {
                path: target,
                source,
            })
        }
    }

    tokio::fs::write(&temp, html)
        .await
        .map_err(|source| ReportError::Write {
            path: temp.clone(),
            source,
        })?;

    tokio::fs::rename(&temp, &target)
        .await
        .map_err(|source| ReportError::Write {
            path: target.clone(),
            source,
        })?;

    info!(path = %target.display(), bytes = html.len(), "report written");
    Ok(target)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_report_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "2026-08-30.html", "<html></html>")
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("2026-08-30.html"));
        let body = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(body, "<html></html>");
        // No temp file left behind
        assert!(!dir.path().join("2026-08-30.html.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_report_replaces_stale_copy() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "report.html", "old").await.unwrap();
        let path = write_report(dir.path(), "report.html", "new").await.unwrap();

        let body = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(body, "new");
    }

    #[tokio::test]
    async fn test_write_report_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("2026");
        let path = write_report(&nested, "report.html", "body").await.unwrap();
        assert!(path.exists());
    }
}
