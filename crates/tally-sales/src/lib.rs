//! # Tally Sales
//!
//! The service layer of the POS: everything between a tap on a product
//! button and a row in the database.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Sales Service Layer                          │
//! │                                                                     │
//! │   add_to_cart ──► Cart (in-memory, Mutex)                           │
//! │   checkout ─────► build Transaction ──► insert (10s timeout)        │
//! │                        │                     │                      │
//! │                        │                     ├─ ok: clear cart,     │
//! │                        │                     │      emit analytics  │
//! │                        │                     └─ late: Timeout error,│
//! │                        ▼                            cart intact     │
//! │   history ops ──► TransactionRepository                             │
//! │   backup ───────► auto_backup.json (full snapshot)                  │
//! │   export/import ► backup-<stamp>.json, merge or overwrite           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod analytics;
pub mod backup;
pub mod error;
pub mod export;
pub mod service;

pub use analytics::{Analytics, AnalyticsEvent, RecordingAnalytics, TracingAnalytics};
pub use backup::{BackupData, BACKUP_FILE, BACKUP_VERSION};
pub use error::{ServiceError, ServiceResult};
pub use export::{ExportData, ImportMode, ImportOutcome};
pub use service::{SalesService, CHECKOUT_TIMEOUT};
