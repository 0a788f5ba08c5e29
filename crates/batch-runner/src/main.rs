//! batch-runner: score the collected stock universe and persist/export the
//! results.
//!
//! Usage:
//!   cargo run -p batch-runner -- --all
//!   cargo run -p batch-runner -- --limit 200
//!   cargo run -p batch-runner -- --test --skip-status-update
//!
//! Exit status is 1 when the run produced zero results; individual per-stock
//! failures are logged and do not affect the exit status.

use std::sync::Arc;

use batch_runner::{BatchDriver, UniverseMode};
use result_store::{flatten, ReportWriter, ResultRow, ResultStore, SqliteRecordProvider};
use scorecard_core::ScoringConfig;
use scorecard_engine::ScorecardEngine;

const DEFAULT_CONCURRENCY: usize = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "batch_runner=info,result_store=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let skip_status_update = args.iter().any(|a| a == "--skip-status-update");

    let concurrency: usize = args
        .iter()
        .position(|a| a == "--concurrency")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CONCURRENCY);

    let db_path = args
        .iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
        .unwrap_or("scorecard.db");

    let out_dir = args
        .iter()
        .position(|a| a == "--out")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
        .unwrap_or("results");

    let mode = if args.iter().any(|a| a == "--test") {
        UniverseMode::TestSubset
    } else if let Some(idx) = args.iter().position(|a| a == "--limit") {
        let n: usize = args
            .get(idx + 1)
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| {
                eprintln!("--limit requires a number");
                std::process::exit(1);
            });
        UniverseMode::Limit(n)
    } else if args.iter().any(|a| a == "--all") {
        UniverseMode::Full
    } else {
        eprintln!("Usage:");
        eprintln!("  batch-runner --all                  Score the full collected universe");
        eprintln!("  batch-runner --limit N              Score at most N stocks");
        eprintln!("  batch-runner --test                 Score the fixed smoke-test subset");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --skip-status-update   Do not write filter outcomes back to investment_status");
        eprintln!("  --db PATH              SQLite DB path (default: scorecard.db)");
        eprintln!("  --out DIR              Report output directory (default: results)");
        eprintln!("  --concurrency N        Max parallel stocks (default: {})", DEFAULT_CONCURRENCY);
        std::process::exit(1);
    };

    // Configuration problems are fatal before any scoring runs.
    let config = ScoringConfig::load()?;
    let engine = Arc::new(ScorecardEngine::new(config)?);

    let store = ResultStore::open(db_path).await?;
    let provider = Arc::new(SqliteRecordProvider::new(store.pool().clone()));
    let driver = BatchDriver::new(provider, engine);

    let analysis_date = chrono::Utc::now().date_naive();
    let run = driver.run(mode, analysis_date, concurrency).await?;

    // A write failure aborts the run; computed results are not dropped.
    for (result, investability) in &run.results {
        store.save_result(result, investability).await?;
    }

    if skip_status_update {
        tracing::info!("skipping investment_status write-back");
    } else {
        store.update_status_flags(&run.results).await?;
    }

    let rows: Vec<ResultRow> = run
        .results
        .iter()
        .map(|(result, investability)| flatten(result, investability))
        .collect();
    let reports = ReportWriter::new(out_dir).write_all(&rows)?;
    tracing::info!(
        "reports written: {} / {} / {} / {} / {}",
        reports.recommendations.display(),
        reports.investable.display(),
        reports.non_investable.display(),
        reports.combined.display(),
        reports.top50.display()
    );

    println!(
        "batch summary: {} processed, {} skipped (missing data), {} failed",
        run.summary.processed, run.summary.skipped_missing, run.summary.failed
    );

    if run.results.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
