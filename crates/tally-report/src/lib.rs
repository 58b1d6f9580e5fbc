//! # Tally Report
//!
//! Daily and monthly sales reports rendered as self-contained HTML
//! documents, plus an atomic file writer for handing the document to
//! whatever turns it into a PDF or puts it on screen.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Report Pipeline                          │
//! │                                                                 │
//! │  transactions ──► aggregate windows ──► html::day_report        │
//! │                   (tally-core)          html::month_report      │
//! │                                              │                  │
//! │                                              ▼                  │
//! │                                   writer::write_report          │
//! │                                   (delete stale → temp → rename)│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rendered HTML carries its own `<style>` block so it needs no
//! external assets wherever it lands.

pub mod error;
pub mod html;
pub mod writer;

pub use error::{ReportError, ReportResult};
