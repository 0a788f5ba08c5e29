use chrono::NaiveDate;
use scorecard_core::{Category, InvestabilityResult, ScorecardResult};
use serde::{Deserialize, Serialize};

/// One flattened scorecard ⊕ investability row, as persisted and as exported
/// to the CSV reports.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ResultRow {
    pub stock_code: String,
    pub company_name: String,
    pub analysis_date: NaiveDate,

    pub profitability_score: f64,
    pub growth_score: f64,
    pub stability_score: f64,
    pub efficiency_score: f64,
    pub valuation_score: f64,
    pub quality_score: f64,

    pub total_score: f64,
    pub percentage: f64,
    pub grade: String,
    pub tier: String,
    pub strengths: String,
    pub weaknesses: String,
    pub thesis: String,

    pub is_investable: bool,
    pub investment_warning: String,
    pub listing_status: String,
    pub filter_rule: String,
}

/// One per-indicator explanation row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DetailRow {
    pub stock_code: String,
    pub analysis_date: NaiveDate,
    pub category: String,
    pub indicator: String,
    pub points: f64,
    pub max_points: f64,
    pub note: String,
}

/// Flatten a result pair into its persisted/exported shape.
pub fn flatten(result: &ScorecardResult, investability: &InvestabilityResult) -> ResultRow {
    let points = |category: Category| {
        result
            .category(category)
            .map(|c| c.actual)
            .unwrap_or(0.0)
    };

    ResultRow {
        stock_code: result.stock_code.clone(),
        company_name: result.company_name.clone(),
        analysis_date: result.analysis_date,
        profitability_score: points(Category::Profitability),
        growth_score: points(Category::Growth),
        stability_score: points(Category::Stability),
        efficiency_score: points(Category::Efficiency),
        valuation_score: points(Category::Valuation),
        quality_score: points(Category::Quality),
        total_score: result.total_score,
        percentage: result.percentage,
        grade: result.grade.clone(),
        tier: result.tier.label().to_string(),
        strengths: result.strengths.join("; "),
        weaknesses: result.weaknesses.join("; "),
        thesis: result.thesis.clone(),
        is_investable: investability.is_investable,
        investment_warning: investability.warning.as_str().to_string(),
        listing_status: investability.listing_status.as_str().to_string(),
        filter_rule: investability.rule.as_str().to_string(),
    }
}

/// Per-indicator detail rows for one result.
pub fn detail_rows(result: &ScorecardResult) -> Vec<DetailRow> {
    result
        .categories
        .iter()
        .flat_map(|category| {
            category.details.iter().map(|detail| DetailRow {
                stock_code: result.stock_code.clone(),
                analysis_date: result.analysis_date,
                category: category.category.as_str().to_string(),
                indicator: detail.indicator.clone(),
                points: detail.points,
                max_points: detail.max_points,
                note: detail.note.clone(),
            })
        })
        .collect()
}
