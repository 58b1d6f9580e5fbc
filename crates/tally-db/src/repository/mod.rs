//! # Repository Module
//!
//! Database repository implementations for Tally POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Repository Pattern Explained                      │
//! │                                                                     │
//! │  SalesService                                                       │
//! │       │                                                             │
//! │       │  db.transactions().list_all()                               │
//! │       ▼                                                             │
//! │  TransactionRepository                                              │
//! │  ├── insert(&self, transaction)                                     │
//! │  ├── list_all(&self)                                                │
//! │  ├── delete(&self, id)                                              │
//! │  └── update(&self, transaction)                                     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite Database                                                    │
//! │                                                                     │
//! │  Benefits: SQL isolated in one place, easy to test against an       │
//! │  in-memory database, clean separation of concerns.                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`transaction::TransactionRepository`] - Sale records and their line items
//! - [`product::ProductRepository`] - Product catalog persistence
//! - [`settings::SettingsRepository`] - Key-value settings (theme, onboarding)

pub mod product;
pub mod settings;
pub mod transaction;
