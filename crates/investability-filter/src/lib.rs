//! Investability gate: a pure decision function over the exchange status
//! snapshot and the scorecard totals. Evaluated fresh per stock; no state.
//!
//! The one invariant callers rely on: the exchange-provided warning flag is
//! never downgraded. The filter's own computed warning and the exchange flag
//! are merged by severity, most severe wins.

use scorecard_core::{
    Category, FilterRule, InvestabilityResult, ListingStatus, ScoreError, ScorecardResult,
    ScoringConfig, StatusRecord, WarningLevel,
};

/// The score figures the filter reads; extractable from a full
/// [`ScorecardResult`] or built directly when recomputing from stored rows.
#[derive(Debug, Clone, Copy)]
pub struct FilterInputs {
    pub total_score: f64,
    /// Raw stability points on the category's own scale.
    pub stability_points: f64,
    /// Raw profitability points on the category's own scale.
    pub profitability_points: f64,
}

impl FilterInputs {
    pub fn from_scorecard(result: &ScorecardResult) -> Result<Self, ScoreError> {
        let points = |category: Category| {
            result
                .category(category)
                .map(|c| c.actual)
                .ok_or_else(|| {
                    ScoreError::InvalidRecord(format!(
                        "{}: scorecard missing {} category",
                        result.stock_code,
                        category.as_str()
                    ))
                })
        };
        Ok(Self {
            total_score: result.total_score,
            stability_points: points(Category::Stability)?,
            profitability_points: points(Category::Profitability)?,
        })
    }
}

/// Decide investability for one stock.
///
/// Non-listed issues and sub-floor totals are not investable and carry a
/// DESIGNATED-level warning. Listed issues whose stability or profitability
/// points fall under the category floor stay investable but are flagged
/// ALERT. The exchange flag is then merged in, most severe wins; when the
/// exchange flag alone determined the final warning the rule records the
/// passthrough.
pub fn evaluate(
    status: &StatusRecord,
    inputs: &FilterInputs,
    config: &ScoringConfig,
) -> InvestabilityResult {
    let (is_investable, computed, rule) = if status.listing_status != ListingStatus::Listed {
        (false, WarningLevel::Designated, FilterRule::NotListed)
    } else if inputs.total_score < config.designated_floor {
        (false, WarningLevel::Designated, FilterRule::ScoreFloor)
    } else if inputs.stability_points < config.category_alert_floor
        || inputs.profitability_points < config.category_alert_floor
    {
        (true, WarningLevel::Alert, FilterRule::CategoryFloor)
    } else {
        (true, WarningLevel::None, FilterRule::Clean)
    };

    let warning = computed.max(status.investment_warning);
    let rule = if status.investment_warning > computed {
        FilterRule::ExchangePassthrough
    } else {
        rule
    };

    InvestabilityResult {
        stock_code: status.stock_code.clone(),
        is_investable,
        warning,
        listing_status: status.listing_status,
        rule,
    }
}
