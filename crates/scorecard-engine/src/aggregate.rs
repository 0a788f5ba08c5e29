//! Aggregation of category scores into the final scorecard: total,
//! percentage, letter grade, recommendation tier, strength/weakness lists and
//! the narrative thesis.

use chrono::NaiveDate;
use scorecard_core::{
    CategoryScore, FinancialRecord, RecommendationTier, ScorecardResult, ScoringConfig,
    TOTAL_MAX_SCORE,
};

/// Combine the six category scores for one stock. Boundary ties resolve to
/// the higher band in both lookup tables.
pub fn aggregate(
    record: &FinancialRecord,
    analysis_date: NaiveDate,
    categories: Vec<CategoryScore>,
    config: &ScoringConfig,
) -> ScorecardResult {
    let total_score: f64 = categories.iter().map(|c| c.actual).sum();
    let percentage = total_score / TOTAL_MAX_SCORE * 100.0;

    let grade = grade_for(percentage, config);
    let tier = tier_for(percentage, config);
    let (strengths, weaknesses) = strengths_weaknesses(&categories, config);
    let thesis = build_thesis(
        &record.company_name,
        total_score,
        percentage,
        &grade,
        tier,
        &strengths,
        &weaknesses,
    );

    ScorecardResult {
        stock_code: record.stock_code.clone(),
        company_name: record.company_name.clone(),
        analysis_date,
        categories,
        total_score,
        percentage,
        grade,
        tier,
        strengths,
        weaknesses,
        thesis,
    }
}

/// Letter grade for a percentage score; an exact boundary earns the higher
/// grade.
pub fn grade_for(percentage: f64, config: &ScoringConfig) -> String {
    config
        .grade_bands
        .iter()
        .find(|band| percentage >= band.min_pct)
        .or_else(|| config.grade_bands.last())
        .map(|band| band.grade.clone())
        .unwrap_or_else(|| "F".to_string())
}

/// Recommendation tier for a percentage score, from the independent tier
/// boundary table.
pub fn tier_for(percentage: f64, config: &ScoringConfig) -> RecommendationTier {
    config
        .tier_bands
        .iter()
        .find(|band| percentage >= band.min_pct)
        .or_else(|| config.tier_bands.last())
        .map(|band| band.tier)
        .unwrap_or(RecommendationTier::StrongSell)
}

/// Categories strictly above the strength cutoff and strictly below the
/// weakness cutoff; exact ties land in neither list.
fn strengths_weaknesses(
    categories: &[CategoryScore],
    config: &ScoringConfig,
) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    for score in categories {
        let pct = score.percentage();
        let label = format!("{} {:.1}%", score.category.as_str(), pct);
        if pct > config.strength_cutoff_pct {
            strengths.push(label);
        } else if pct < config.weakness_cutoff_pct {
            weaknesses.push(label);
        }
    }

    (strengths, weaknesses)
}

fn build_thesis(
    company_name: &str,
    total_score: f64,
    percentage: f64,
    grade: &str,
    tier: RecommendationTier,
    strengths: &[String],
    weaknesses: &[String],
) -> String {
    let mut thesis = format!(
        "{} scores {:.1}/{:.0} ({:.1}%), grade {}, rated {}.",
        company_name,
        total_score,
        TOTAL_MAX_SCORE,
        percentage,
        grade,
        tier.label()
    );
    if let Some(top) = strengths.first() {
        thesis.push_str(&format!(" Leading category: {}.", top));
    }
    if let Some(worst) = weaknesses.first() {
        thesis.push_str(&format!(" Weakest category: {}.", worst));
    }
    thesis
}
