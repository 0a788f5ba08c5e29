use async_trait::async_trait;
use scorecard_core::{
    FinancialRecord, ListingStatus, RecordProvider, ScoreError, StatusRecord, WarningLevel,
};
use sqlx::SqlitePool;

use crate::error::StoreError;

/// How many trailing fiscal years the provider hands to the engine.
const HISTORY_WINDOW_YEARS: i64 = 3;

/// Reads collector-materialized `financial_snapshots` and `investment_status`
/// rows. The collector itself lives outside this repository.
pub struct SqliteRecordProvider {
    pool: SqlitePool,
}

impl SqliteRecordProvider {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SnapshotRow {
    stock_code: String,
    company_name: String,
    fiscal_year: i32,
    roe: Option<f64>,
    roa: Option<f64>,
    operating_margin: Option<f64>,
    net_margin: Option<f64>,
    ebitda_margin: Option<f64>,
    roic: Option<f64>,
    revenue_growth_3y: Option<f64>,
    net_income_growth_3y: Option<f64>,
    eps_growth_3y: Option<f64>,
    equity_growth_3y: Option<f64>,
    dividend_growth_3y: Option<f64>,
    debt_ratio: Option<f64>,
    current_ratio: Option<f64>,
    interest_coverage: Option<f64>,
    quick_ratio: Option<f64>,
    altman_z: Option<f64>,
    asset_turnover: Option<f64>,
    inventory_turnover: Option<f64>,
    receivables_turnover: Option<f64>,
    per: Option<f64>,
    pbr: Option<f64>,
    peg: Option<f64>,
    dividend_yield: Option<f64>,
    ev_ebitda: Option<f64>,
    net_income: Option<f64>,
    shareholders_equity: Option<f64>,
}

impl From<SnapshotRow> for FinancialRecord {
    fn from(row: SnapshotRow) -> Self {
        FinancialRecord {
            stock_code: row.stock_code,
            company_name: row.company_name,
            fiscal_year: row.fiscal_year,
            roe: row.roe,
            roa: row.roa,
            operating_margin: row.operating_margin,
            net_margin: row.net_margin,
            ebitda_margin: row.ebitda_margin,
            roic: row.roic,
            revenue_growth_3y: row.revenue_growth_3y,
            net_income_growth_3y: row.net_income_growth_3y,
            eps_growth_3y: row.eps_growth_3y,
            equity_growth_3y: row.equity_growth_3y,
            dividend_growth_3y: row.dividend_growth_3y,
            debt_ratio: row.debt_ratio,
            current_ratio: row.current_ratio,
            interest_coverage: row.interest_coverage,
            quick_ratio: row.quick_ratio,
            altman_z: row.altman_z,
            asset_turnover: row.asset_turnover,
            inventory_turnover: row.inventory_turnover,
            receivables_turnover: row.receivables_turnover,
            per: row.per,
            pbr: row.pbr,
            peg: row.peg,
            dividend_yield: row.dividend_yield,
            ev_ebitda: row.ev_ebitda,
            net_income: row.net_income,
            shareholders_equity: row.shareholders_equity,
        }
    }
}

#[async_trait]
impl RecordProvider for SqliteRecordProvider {
    async fn financials(&self, stock_code: &str) -> Result<Vec<FinancialRecord>, ScoreError> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            "SELECT * FROM financial_snapshots
             WHERE stock_code = ?
             ORDER BY fiscal_year DESC
             LIMIT ?",
        )
        .bind(stock_code)
        .bind(HISTORY_WINDOW_YEARS)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(rows.into_iter().map(FinancialRecord::from).collect())
    }

    async fn status(&self, stock_code: &str) -> Result<StatusRecord, ScoreError> {
        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT listing_status, investment_warning
             FROM investment_status WHERE stock_code = ?",
        )
        .bind(stock_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from)?;

        let Some((listing, warning)) = row else {
            return Ok(StatusRecord::assumed_listed(stock_code));
        };

        let listing_status = ListingStatus::parse(&listing).ok_or_else(|| {
            ScoreError::InvalidRecord(format!(
                "{}: unknown listing status '{}'",
                stock_code, listing
            ))
        })?;
        let investment_warning = WarningLevel::parse(&warning).ok_or_else(|| {
            ScoreError::InvalidRecord(format!(
                "{}: unknown warning level '{}'",
                stock_code, warning
            ))
        })?;

        Ok(StatusRecord {
            stock_code: stock_code.to_string(),
            listing_status,
            investment_warning,
        })
    }

    async fn universe(&self) -> Result<Vec<String>, ScoreError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT stock_code FROM financial_snapshots ORDER BY stock_code",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(rows.into_iter().map(|(code,)| code).collect())
    }
}
