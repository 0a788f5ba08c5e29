use async_trait::async_trait;

use crate::{FinancialRecord, ScoreError, StatusRecord};

/// Seam between the scoring core and whatever materialized the input tables.
/// Implementations read already-collected rows; the core never talks to
/// external APIs itself.
#[async_trait]
pub trait RecordProvider: Send + Sync {
    /// Trailing window of fiscal-year records for one stock, latest first.
    /// Empty means the collector has nothing for the code.
    async fn financials(&self, stock_code: &str) -> Result<Vec<FinancialRecord>, ScoreError>;

    /// Listing/warning snapshot for one stock. Providers return an
    /// assumed-listed snapshot when the status feed has no row.
    async fn status(&self, stock_code: &str) -> Result<StatusRecord, ScoreError>;

    /// Every stock code the provider has financials for.
    async fn universe(&self) -> Result<Vec<String>, ScoreError>;
}
