//! Quality premium scorer. Unlike the snapshot categories this one measures
//! temporal consistency, so it reads a bounded trailing window of records
//! (latest first) instead of a single period.

use scorecard_core::{Category, CategoryScore, FinancialRecord, ScoringConfig};

use crate::indicator::score_category;

/// Derived indicator names the quality category may configure.
pub const DERIVED_INDICATORS: [&str; 3] =
    ["earnings_consistency", "margin_stability", "equity_accretion"];

/// Score the quality category over a trailing record window. With fewer than
/// two periods every consistency measure is undefined and scores zero.
pub fn score(history: &[FinancialRecord], config: &ScoringConfig) -> CategoryScore {
    let spec = config.category(Category::Quality);
    let values: Vec<Option<f64>> = spec
        .indicators
        .iter()
        .map(|indicator| derived_value(history, &indicator.name))
        .collect();
    score_category(Category::Quality, spec, &values)
}

fn derived_value(history: &[FinancialRecord], name: &str) -> Option<f64> {
    if history.len() < 2 {
        return None;
    }
    match name {
        "earnings_consistency" => earnings_consistency(history),
        "margin_stability" => margin_stability(history),
        "equity_accretion" => equity_accretion(history),
        _ => None,
    }
}

/// Share of periods with positive net income, in percent.
fn earnings_consistency(history: &[FinancialRecord]) -> Option<f64> {
    let incomes: Vec<f64> = history.iter().filter_map(|r| r.net_income).collect();
    if incomes.len() < 2 {
        return None;
    }
    let profitable = incomes.iter().filter(|v| **v > 0.0).count();
    Some(profitable as f64 / incomes.len() as f64 * 100.0)
}

/// Largest swing in operating margin between consecutive periods, in
/// percentage points. Smaller is steadier.
fn margin_stability(history: &[FinancialRecord]) -> Option<f64> {
    let margins: Vec<f64> = history.iter().filter_map(|r| r.operating_margin).collect();
    if margins.len() < 2 {
        return None;
    }
    margins
        .windows(2)
        .map(|pair| (pair[0] - pair[1]).abs())
        .fold(None, |acc: Option<f64>, swing| {
            Some(acc.map_or(swing, |m| m.max(swing)))
        })
}

/// Share of year-over-year transitions where shareholders' equity grew, in
/// percent. History is latest-first, so `pair[0]` is the newer period.
fn equity_accretion(history: &[FinancialRecord]) -> Option<f64> {
    let equity: Vec<f64> = history.iter().filter_map(|r| r.shareholders_equity).collect();
    if equity.len() < 2 {
        return None;
    }
    let increases = equity.windows(2).filter(|pair| pair[0] > pair[1]).count();
    Some(increases as f64 / (equity.len() - 1) as f64 * 100.0)
}
