//! Batch driver: iterates a stock universe, runs the scorecard engine and the
//! investability filter per stock, and isolates per-stock failures so one bad
//! record never aborts the run.

use std::sync::Arc;

use chrono::NaiveDate;
use investability_filter::FilterInputs;
use scorecard_core::{InvestabilityResult, RecordProvider, ScoreError, ScorecardResult};
use scorecard_engine::ScorecardEngine;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Fixed smoke-test subset: large, liquid KOSPI names.
pub const TEST_SUBSET: &[&str] = &[
    "005930", // Samsung Electronics
    "000660", // SK hynix
    "373220", // LG Energy Solution
    "005380", // Hyundai Motor
    "035420", // NAVER
    "051910", // LG Chem
    "006400", // Samsung SDI
    "068270", // Celltrion
    "105560", // KB Financial Group
    "035720", // Kakao
];

/// Which slice of the universe a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniverseMode {
    Full,
    Limit(usize),
    TestSubset,
}

/// Per-run counters reported to the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped_missing: usize,
    pub failed: usize,
}

/// Everything a run produced.
pub struct BatchRun {
    pub results: Vec<(ScorecardResult, InvestabilityResult)>,
    pub summary: BatchSummary,
}

pub struct BatchDriver {
    provider: Arc<dyn RecordProvider>,
    engine: Arc<ScorecardEngine>,
}

impl BatchDriver {
    pub fn new(provider: Arc<dyn RecordProvider>, engine: Arc<ScorecardEngine>) -> Self {
        Self { provider, engine }
    }

    /// Score the selected universe. Fan-out is bounded by `concurrency` and
    /// exists only to overlap provider I/O; the scorers are pure and share
    /// nothing, so no ordering between stocks is required. Results come back
    /// highest total first.
    pub async fn run(
        &self,
        mode: UniverseMode,
        analysis_date: NaiveDate,
        concurrency: usize,
    ) -> Result<BatchRun, ScoreError> {
        let universe = self.resolve_universe(mode).await?;
        tracing::info!("batch run over {} stocks", universe.len());

        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for stock_code in universe {
            let provider = Arc::clone(&self.provider);
            let engine = Arc::clone(&self.engine);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("batch semaphore closed");
                let outcome = score_one(provider.as_ref(), engine.as_ref(), &stock_code, analysis_date).await;
                (stock_code, outcome)
            });
        }

        let mut results = Vec::new();
        let mut summary = BatchSummary::default();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(pair))) => {
                    summary.processed += 1;
                    results.push(pair);
                }
                Ok((stock_code, Err(ScoreError::InsufficientData(reason)))) => {
                    summary.skipped_missing += 1;
                    tracing::warn!(stock_code = %stock_code, "skipped: {}", reason);
                }
                Ok((stock_code, Err(err))) => {
                    summary.failed += 1;
                    tracing::warn!(stock_code = %stock_code, "failed: {}", err);
                }
                Err(join_err) => {
                    summary.failed += 1;
                    tracing::error!("scoring task panicked: {}", join_err);
                }
            }
        }

        results.sort_by(|a, b| {
            b.0.total_score
                .partial_cmp(&a.0.total_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        tracing::info!(
            "batch complete: {} processed, {} skipped (missing data), {} failed",
            summary.processed,
            summary.skipped_missing,
            summary.failed
        );

        Ok(BatchRun { results, summary })
    }

    async fn resolve_universe(&self, mode: UniverseMode) -> Result<Vec<String>, ScoreError> {
        match mode {
            UniverseMode::TestSubset => {
                Ok(TEST_SUBSET.iter().map(|s| s.to_string()).collect())
            }
            UniverseMode::Full => self.provider.universe().await,
            UniverseMode::Limit(n) => {
                let mut universe = self.provider.universe().await?;
                universe.truncate(n);
                Ok(universe)
            }
        }
    }
}

async fn score_one(
    provider: &dyn RecordProvider,
    engine: &ScorecardEngine,
    stock_code: &str,
    analysis_date: NaiveDate,
) -> Result<(ScorecardResult, InvestabilityResult), ScoreError> {
    let history = provider.financials(stock_code).await?;
    if history.is_empty() {
        return Err(ScoreError::InsufficientData(format!(
            "{}: no financial records",
            stock_code
        )));
    }
    let status = provider.status(stock_code).await?;

    let scorecard = engine.evaluate(&history, analysis_date)?;
    let inputs = FilterInputs::from_scorecard(&scorecard)?;
    let investability = investability_filter::evaluate(&status, &inputs, engine.config());

    Ok((scorecard, investability))
}
