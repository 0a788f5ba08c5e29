//! SQLite persistence for scorecard output, the record provider that feeds
//! the batch driver from collector tables, and flat CSV/JSON report export.

pub mod error;
pub mod export;
pub mod provider;
pub mod rows;
pub mod store;

pub use error::StoreError;
pub use export::{ReportPaths, ReportWriter};
pub use provider::SqliteRecordProvider;
pub use rows::{flatten, DetailRow, ResultRow};
pub use store::{ResultStore, SummaryCounts};
