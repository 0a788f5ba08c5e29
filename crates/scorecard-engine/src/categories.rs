//! The five snapshot category scorers. Each reads its configured
//! sub-indicators off the latest financial record and runs them through the
//! shared tier machinery; the history-aware sixth category lives in
//! [`crate::quality`].

use scorecard_core::{Category, CategoryScore, FinancialRecord, ScoringConfig};

use crate::indicator::score_category;

fn snapshot_category(
    category: Category,
    record: &FinancialRecord,
    config: &ScoringConfig,
) -> CategoryScore {
    let spec = config.category(category);
    let values: Vec<Option<f64>> = spec
        .indicators
        .iter()
        .map(|indicator| record.field(&indicator.name).flatten())
        .collect();
    score_category(category, spec, &values)
}

/// Profitability (ROE, ROA, margins, ROIC).
pub fn profitability(record: &FinancialRecord, config: &ScoringConfig) -> CategoryScore {
    snapshot_category(Category::Profitability, record, config)
}

/// Growth (3-year CAGRs for revenue, net income, EPS, equity, dividend).
pub fn growth(record: &FinancialRecord, config: &ScoringConfig) -> CategoryScore {
    snapshot_category(Category::Growth, record, config)
}

/// Stability (leverage, liquidity, coverage, Altman Z).
pub fn stability(record: &FinancialRecord, config: &ScoringConfig) -> CategoryScore {
    snapshot_category(Category::Stability, record, config)
}

/// Efficiency (turnover multiples).
pub fn efficiency(record: &FinancialRecord, config: &ScoringConfig) -> CategoryScore {
    snapshot_category(Category::Efficiency, record, config)
}

/// Valuation (market multiples; every input may be absent when no price data
/// was collected, and each absence scores zero on its own).
pub fn valuation(record: &FinancialRecord, config: &ScoringConfig) -> CategoryScore {
    snapshot_category(Category::Valuation, record, config)
}
