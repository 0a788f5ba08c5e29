use scorecard_core::{InvestabilityResult, ScorecardResult, StatusRecord};
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::error::StoreError;
use crate::rows::{detail_rows, flatten, DetailRow, ResultRow};

/// Persists scorecard results and per-indicator detail to SQLite. One writer
/// at a time; inserts are keyed by (stock_code, analysis_date) so a re-run of
/// the same date replaces its rows and a later date supersedes them.
pub struct ResultStore {
    pool: SqlitePool,
}

/// Aggregate counts for the dashboard summary endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryCounts {
    pub total: i64,
    pub investable: i64,
    pub by_grade: Vec<(String, i64)>,
    pub by_tier: Vec<(String, i64)>,
}

impl ResultStore {
    pub async fn open(db_path: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path)).await?;
        // WAL lets the dashboard read while a batch writes.
        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
        let store = Self { pool };
        store.init_tables().await?;
        Ok(store)
    }

    /// Single-connection in-memory store for tests. More than one connection
    /// would each get their own empty :memory: database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.init_tables().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_tables(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS scorecard_results (
                stock_code TEXT NOT NULL,
                company_name TEXT NOT NULL,
                analysis_date TEXT NOT NULL,
                profitability_score REAL NOT NULL,
                growth_score REAL NOT NULL,
                stability_score REAL NOT NULL,
                efficiency_score REAL NOT NULL,
                valuation_score REAL NOT NULL,
                quality_score REAL NOT NULL,
                total_score REAL NOT NULL,
                percentage REAL NOT NULL,
                grade TEXT NOT NULL,
                tier TEXT NOT NULL,
                strengths TEXT NOT NULL,
                weaknesses TEXT NOT NULL,
                thesis TEXT NOT NULL,
                is_investable INTEGER NOT NULL,
                investment_warning TEXT NOT NULL,
                listing_status TEXT NOT NULL,
                filter_rule TEXT NOT NULL,
                PRIMARY KEY (stock_code, analysis_date)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS scorecard_details (
                stock_code TEXT NOT NULL,
                analysis_date TEXT NOT NULL,
                category TEXT NOT NULL,
                indicator TEXT NOT NULL,
                points REAL NOT NULL,
                max_points REAL NOT NULL,
                note TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS investment_status (
                stock_code TEXT PRIMARY KEY,
                company_name TEXT,
                listing_status TEXT NOT NULL DEFAULT 'LISTED',
                investment_warning TEXT NOT NULL DEFAULT 'NONE',
                is_investable INTEGER NOT NULL DEFAULT 1,
                last_updated TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS financial_snapshots (
                stock_code TEXT NOT NULL,
                company_name TEXT NOT NULL,
                fiscal_year INTEGER NOT NULL,
                roe REAL, roa REAL, operating_margin REAL, net_margin REAL,
                ebitda_margin REAL, roic REAL,
                revenue_growth_3y REAL, net_income_growth_3y REAL,
                eps_growth_3y REAL, equity_growth_3y REAL, dividend_growth_3y REAL,
                debt_ratio REAL, current_ratio REAL, interest_coverage REAL,
                quick_ratio REAL, altman_z REAL,
                asset_turnover REAL, inventory_turnover REAL, receivables_turnover REAL,
                per REAL, pbr REAL, peg REAL, dividend_yield REAL, ev_ebitda REAL,
                net_income REAL, shareholders_equity REAL,
                PRIMARY KEY (stock_code, fiscal_year)
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist one result pair: the flat row plus its per-indicator detail.
    pub async fn save_result(
        &self,
        result: &ScorecardResult,
        investability: &InvestabilityResult,
    ) -> Result<(), StoreError> {
        let row = flatten(result, investability);

        sqlx::query(
            "INSERT OR REPLACE INTO scorecard_results (
                stock_code, company_name, analysis_date,
                profitability_score, growth_score, stability_score,
                efficiency_score, valuation_score, quality_score,
                total_score, percentage, grade, tier,
                strengths, weaknesses, thesis,
                is_investable, investment_warning, listing_status, filter_rule
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.stock_code)
        .bind(&row.company_name)
        .bind(row.analysis_date)
        .bind(row.profitability_score)
        .bind(row.growth_score)
        .bind(row.stability_score)
        .bind(row.efficiency_score)
        .bind(row.valuation_score)
        .bind(row.quality_score)
        .bind(row.total_score)
        .bind(row.percentage)
        .bind(&row.grade)
        .bind(&row.tier)
        .bind(&row.strengths)
        .bind(&row.weaknesses)
        .bind(&row.thesis)
        .bind(row.is_investable)
        .bind(&row.investment_warning)
        .bind(&row.listing_status)
        .bind(&row.filter_rule)
        .execute(&self.pool)
        .await?;

        sqlx::query("DELETE FROM scorecard_details WHERE stock_code = ? AND analysis_date = ?")
            .bind(&result.stock_code)
            .bind(result.analysis_date)
            .execute(&self.pool)
            .await?;

        for detail in detail_rows(result) {
            sqlx::query(
                "INSERT INTO scorecard_details (
                    stock_code, analysis_date, category, indicator, points, max_points, note
                ) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&detail.stock_code)
            .bind(detail.analysis_date)
            .bind(&detail.category)
            .bind(&detail.indicator)
            .bind(detail.points)
            .bind(detail.max_points)
            .bind(&detail.note)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Latest result per stock, highest total first.
    pub async fn latest_results(&self, limit: i64) -> Result<Vec<ResultRow>, StoreError> {
        let rows = sqlx::query_as::<_, ResultRow>(
            "SELECT * FROM scorecard_results
             WHERE (stock_code, analysis_date) IN (
                 SELECT stock_code, MAX(analysis_date)
                 FROM scorecard_results GROUP BY stock_code
             )
             ORDER BY total_score DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Latest result and its per-indicator detail for one stock.
    pub async fn result_detail(
        &self,
        stock_code: &str,
    ) -> Result<Option<(ResultRow, Vec<DetailRow>)>, StoreError> {
        let row = sqlx::query_as::<_, ResultRow>(
            "SELECT * FROM scorecard_results
             WHERE stock_code = ?
             ORDER BY analysis_date DESC
             LIMIT 1",
        )
        .bind(stock_code)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let details = sqlx::query_as::<_, DetailRow>(
            "SELECT * FROM scorecard_details
             WHERE stock_code = ? AND analysis_date = ?
             ORDER BY category, indicator",
        )
        .bind(&row.stock_code)
        .bind(row.analysis_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some((row, details)))
    }

    /// Latest investable results, highest total first.
    pub async fn investable_results(&self, limit: i64) -> Result<Vec<ResultRow>, StoreError> {
        let rows = sqlx::query_as::<_, ResultRow>(
            "SELECT * FROM scorecard_results
             WHERE is_investable = 1
             AND (stock_code, analysis_date) IN (
                 SELECT stock_code, MAX(analysis_date)
                 FROM scorecard_results GROUP BY stock_code
             )
             ORDER BY total_score DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn summary(&self) -> Result<SummaryCounts, StoreError> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM scorecard_results")
                .fetch_one(&self.pool)
                .await?;
        let (investable,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM scorecard_results WHERE is_investable = 1")
                .fetch_one(&self.pool)
                .await?;
        let by_grade: Vec<(String, i64)> = sqlx::query_as(
            "SELECT grade, COUNT(*) FROM scorecard_results GROUP BY grade ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        let by_tier: Vec<(String, i64)> = sqlx::query_as(
            "SELECT tier, COUNT(*) FROM scorecard_results GROUP BY tier ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(SummaryCounts {
            total,
            investable,
            by_grade,
            by_tier,
        })
    }

    /// Upsert one status row as the external status feed would.
    pub async fn upsert_status(&self, status: &StatusRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT OR REPLACE INTO investment_status (
                stock_code, listing_status, investment_warning, is_investable, last_updated
            ) VALUES (?, ?, ?, ?, datetime('now'))",
        )
        .bind(&status.stock_code)
        .bind(status.listing_status.as_str())
        .bind(status.investment_warning.as_str())
        .bind(status.listing_status == scorecard_core::ListingStatus::Listed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Write the filter's outcomes back into the status table so the stored
    /// snapshot reflects score-derived warnings. The batch skips this step
    /// under `--skip-status-update`.
    pub async fn update_status_flags(
        &self,
        results: &[(ScorecardResult, InvestabilityResult)],
    ) -> Result<(), StoreError> {
        for (result, investability) in results {
            sqlx::query(
                "INSERT OR REPLACE INTO investment_status (
                    stock_code, company_name, listing_status, investment_warning,
                    is_investable, last_updated
                ) VALUES (?, ?, ?, ?, ?, datetime('now'))",
            )
            .bind(&result.stock_code)
            .bind(&result.company_name)
            .bind(investability.listing_status.as_str())
            .bind(investability.warning.as_str())
            .bind(investability.is_investable)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use scorecard_core::{
        Category, CategoryScore, FilterRule, IndicatorScore, ListingStatus, RecommendationTier,
        RecordProvider, WarningLevel,
    };

    use crate::provider::SqliteRecordProvider;

    fn sample_result(stock_code: &str, total: f64) -> ScorecardResult {
        let categories = Category::ALL
            .iter()
            .map(|category| CategoryScore {
                category: *category,
                max_points: 20.0,
                actual: total / 6.0,
                details: vec![IndicatorScore {
                    indicator: "roe".to_string(),
                    points: total / 6.0,
                    max_points: 20.0,
                    note: "test".to_string(),
                }],
            })
            .collect();
        ScorecardResult {
            stock_code: stock_code.to_string(),
            company_name: "Test Co".to_string(),
            analysis_date: NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
            categories,
            total_score: total,
            percentage: total / 110.0 * 100.0,
            grade: "B".to_string(),
            tier: RecommendationTier::Hold,
            strengths: vec!["stability 88.4%".to_string()],
            weaknesses: Vec::new(),
            thesis: "test thesis".to_string(),
        }
    }

    fn sample_investability(stock_code: &str) -> InvestabilityResult {
        InvestabilityResult {
            stock_code: stock_code.to_string(),
            is_investable: true,
            warning: WarningLevel::Alert,
            listing_status: ListingStatus::Listed,
            rule: FilterRule::CategoryFloor,
        }
    }

    #[tokio::test]
    async fn save_and_read_back_round_trip() {
        let store = ResultStore::in_memory().await.unwrap();
        let result = sample_result("005930", 72.0);
        let investability = sample_investability("005930");

        store.save_result(&result, &investability).await.unwrap();

        let rows = store.latest_results(100).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stock_code, "005930");
        assert_eq!(rows[0].tier, "Hold");
        assert_eq!(rows[0].investment_warning, "ALERT");
        assert!(rows[0].is_investable);

        let (row, details) = store.result_detail("005930").await.unwrap().unwrap();
        assert_eq!(row.grade, "B");
        assert_eq!(details.len(), 6);
    }

    #[tokio::test]
    async fn rerun_replaces_same_date_row() {
        let store = ResultStore::in_memory().await.unwrap();
        let investability = sample_investability("005930");

        store
            .save_result(&sample_result("005930", 60.0), &investability)
            .await
            .unwrap();
        store
            .save_result(&sample_result("005930", 72.0), &investability)
            .await
            .unwrap();

        let rows = store.latest_results(100).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!((rows[0].total_score - 72.0).abs() < 1e-9);

        let summary = store.summary().await.unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.investable, 1);
    }

    #[tokio::test]
    async fn status_write_back_is_read_by_provider() {
        let store = ResultStore::in_memory().await.unwrap();
        let pair = (sample_result("005930", 42.0), sample_investability("005930"));
        store.update_status_flags(std::slice::from_ref(&pair)).await.unwrap();

        let provider = SqliteRecordProvider::new(store.pool().clone());
        let status = provider.status("005930").await.unwrap();
        assert_eq!(status.listing_status, ListingStatus::Listed);
        assert_eq!(status.investment_warning, WarningLevel::Alert);

        // Unknown stocks fall back to an assumed-listed snapshot.
        let missing = provider.status("000001").await.unwrap();
        assert_eq!(missing.investment_warning, WarningLevel::None);
    }
}
