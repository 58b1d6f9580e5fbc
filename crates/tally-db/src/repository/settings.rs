//! # Settings Repository
//!
//! Key-value storage for small preference blobs: theme, the onboarding
//! flag, and any future setting that doesn't deserve its own table.
//!
//! ## Keys
//! ```text
//! theme                 "light" | "dark"
//! onboarding_completed  "true" | "false"
//! ```
//!
//! Values are stored as strings; typed accessors do the conversion and
//! fall back to a default when the key is absent.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tally_core::Theme;

/// Well-known settings keys.
pub mod keys {
    pub const THEME: &str = "theme";
    pub const ONBOARDING_COMPLETED: &str = "onboarding_completed";
}

/// Repository for key-value settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Gets a raw value, or None when the key is absent.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    /// Sets a raw value, inserting or overwriting.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, "Writing setting");
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?1, ?2) \
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Removes a key. No-op when absent.
    pub async fn remove(&self, key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM settings WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Typed accessors
    // -------------------------------------------------------------------------

    /// The stored theme preference, defaulting to light.
    pub async fn theme(&self) -> DbResult<Theme> {
        match self.get(keys::THEME).await?.as_deref() {
            None => Ok(Theme::default()),
            Some("light") => Ok(Theme::Light),
            Some("dark") => Ok(Theme::Dark),
            Some(other) => Err(DbError::corrupt(
                "settings.theme",
                format!("unexpected value '{other}'"),
            )),
        }
    }

    /// Persists the theme preference.
    pub async fn set_theme(&self, theme: Theme) -> DbResult<()> {
        let value = match theme {
            Theme::Light => "light",
            Theme::Dark => "dark",
        };
        self.set(keys::THEME, value).await
    }

    /// Whether onboarding has been completed. Defaults to false.
    pub async fn onboarding_completed(&self) -> DbResult<bool> {
        Ok(matches!(
            self.get(keys::ONBOARDING_COMPLETED).await?.as_deref(),
            Some("true")
        ))
    }

    /// Marks onboarding as completed (or resets it).
    pub async fn set_onboarding_completed(&self, completed: bool) -> DbResult<()> {
        self.set(
            keys::ONBOARDING_COMPLETED,
            if completed { "true" } else { "false" },
        )
        .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_set_remove() {
        let settings = test_db().await.settings();

        assert_eq!(settings.get("missing").await.unwrap(), None);

        settings.set("k", "v1").await.unwrap();
        assert_eq!(settings.get("k").await.unwrap().as_deref(), Some("v1"));

        // Overwrite
        settings.set("k", "v2").await.unwrap();
        assert_eq!(settings.get("k").await.unwrap().as_deref(), Some("v2"));

        settings.remove("k").await.unwrap();
        assert_eq!(settings.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_theme_defaults_to_light() {
        let settings = test_db().await.settings();
        assert_eq!(settings.theme().await.unwrap(), Theme::Light);

        settings.set_theme(Theme::Dark).await.unwrap();
        assert_eq!(settings.theme().await.unwrap(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_corrupt_theme_surfaces() {
        let settings = test_db().await.settings();
        settings.set(keys::THEME, "sepia").await.unwrap();
        assert!(matches!(
            settings.theme().await,
            Err(DbError::CorruptValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_onboarding_flag() {
        let settings = test_db().await.settings();
        assert!(!settings.onboarding_completed().await.unwrap());

        settings.set_onboarding_completed(true).await.unwrap();
        assert!(settings.onboarding_completed().await.unwrap());

        settings.set_onboarding_completed(false).await.unwrap();
        assert!(!settings.onboarding_completed().await.unwrap());
    }
}
