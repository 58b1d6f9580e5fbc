//! # tally-db: Database Layer for Tally POS
//!
//! SQLite persistence for transactions, the product catalog, and settings.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Tally POS Data Flow                           │
//! │                                                                     │
//! │  SalesService (tally-sales)                                        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                    tally-db (THIS CRATE)                      │ │
//! │  │                                                               │ │
//! │  │   ┌─────────────┐   ┌────────────────┐   ┌──────────────┐   │ │
//! │  │   │  Database   │   │  Repositories  │   │  Migrations  │   │ │
//! │  │   │  (pool.rs)  │◄──│ transaction.rs │   │  (embedded)  │   │ │
//! │  │   │             │   │ product.rs     │   │  001_init    │   │ │
//! │  │   │ SqlitePool  │   │ settings.rs    │   │              │   │ │
//! │  │   └─────────────┘   └────────────────┘   └──────────────┘   │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (or :memory: in tests)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("tally.db")).await?;
//! let transactions = db.transactions().list_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::product::ProductRepository;
pub use repository::settings::SettingsRepository;
pub use repository::transaction::TransactionRepository;
