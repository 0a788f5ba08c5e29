use approx::assert_relative_eq;
use chrono::NaiveDate;
use scorecard_core::{Category, CategoryScore, FinancialRecord, ScoreError, ScoringConfig};

use crate::{aggregate, categories, quality, ScorecardEngine};

/// Helper: a healthy large-cap record with every field populated.
fn record() -> FinancialRecord {
    FinancialRecord {
        stock_code: "005930".to_string(),
        company_name: "Samsung Electronics".to_string(),
        fiscal_year: 2024,
        roe: Some(18.5),
        roa: Some(12.3),
        operating_margin: Some(26.4),
        net_margin: Some(18.7),
        ebitda_margin: Some(32.1),
        roic: Some(15.8),
        revenue_growth_3y: Some(8.2),
        net_income_growth_3y: Some(15.4),
        eps_growth_3y: Some(18.3),
        equity_growth_3y: Some(12.1),
        dividend_growth_3y: Some(7.8),
        debt_ratio: Some(28.5),
        current_ratio: Some(185.2),
        interest_coverage: Some(45.3),
        quick_ratio: Some(142.1),
        altman_z: Some(3.8),
        asset_turnover: Some(0.68),
        inventory_turnover: Some(8.2),
        receivables_turnover: Some(12.5),
        per: Some(12.8),
        pbr: Some(1.1),
        peg: Some(0.8),
        dividend_yield: Some(3.2),
        ev_ebitda: Some(8.5),
        net_income: Some(26_900_000_000_000.0),
        shareholders_equity: Some(286_700_000_000_000.0),
    }
}

/// Helper: a prior-year record derived from the base one.
fn prior_record(fiscal_year: i32, operating_margin: f64, equity: f64) -> FinancialRecord {
    FinancialRecord {
        fiscal_year,
        operating_margin: Some(operating_margin),
        shareholders_equity: Some(equity),
        ..record()
    }
}

/// Helper: a fabricated category score for aggregator tests.
fn cat(category: Category, max_points: f64, actual: f64) -> CategoryScore {
    CategoryScore {
        category,
        max_points,
        actual,
        details: Vec::new(),
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 15).unwrap()
}

#[test]
fn default_config_validates() {
    let config = ScoringConfig::default();
    config.validate().unwrap();
    assert_relative_eq!(config.total_max(), 110.0);

    for category in Category::ALL {
        let spec = config.category(category);
        let allocated: f64 = spec.indicators.iter().map(|i| i.max_points).sum();
        assert_relative_eq!(allocated, spec.max_points);
    }
}

#[test]
fn category_scores_stay_within_bounds() {
    let config = ScoringConfig::default();
    let r = record();
    let history = [r.clone(), prior_record(2023, 25.0, 270e12)];

    let scores = [
        categories::profitability(&r, &config),
        categories::growth(&r, &config),
        categories::stability(&r, &config),
        categories::efficiency(&r, &config),
        categories::valuation(&r, &config),
        quality::score(&history, &config),
    ];
    for score in &scores {
        assert!(score.actual >= 0.0, "{:?} went negative", score.category);
        assert!(
            score.actual <= score.max_points,
            "{:?} exceeded its maximum",
            score.category
        );
    }
}

#[test]
fn roe_increase_never_lowers_profitability() {
    let config = ScoringConfig::default();
    let mut last = -1.0;
    for roe in [-5.0, 2.0, 5.0, 9.9, 10.0, 14.0, 15.0, 19.0, 20.0, 35.0] {
        let r = FinancialRecord {
            roe: Some(roe),
            ..record()
        };
        let score = categories::profitability(&r, &config).actual;
        assert!(
            score >= last,
            "profitability dropped from {} to {} when ROE rose to {}",
            last,
            score,
            roe
        );
        last = score;
    }
}

#[test]
fn debt_ratio_increase_never_raises_stability() {
    let config = ScoringConfig::default();
    let mut last = f64::MAX;
    for debt in [10.0, 25.0, 30.0, 35.0, 49.0, 50.0, 99.0, 100.0, 250.0] {
        let r = FinancialRecord {
            debt_ratio: Some(debt),
            ..record()
        };
        let score = categories::stability(&r, &config).actual;
        assert!(
            score <= last,
            "stability rose from {} to {} when debt ratio rose to {}",
            last,
            score,
            debt
        );
        last = score;
    }
}

#[test]
fn absent_valuation_inputs_score_zero_not_error() {
    let config = ScoringConfig::default();
    let full = record();
    let stripped = FinancialRecord {
        per: None,
        pbr: None,
        peg: None,
        dividend_yield: None,
        ev_ebitda: None,
        ..full.clone()
    };

    let valuation = categories::valuation(&stripped, &config);
    assert_relative_eq!(valuation.actual, 0.0);
    assert_eq!(valuation.details.len(), 1);
    assert_eq!(valuation.details[0].note, "insufficient data");

    // The other categories are untouched by the absence.
    assert_relative_eq!(
        categories::profitability(&stripped, &config).actual,
        categories::profitability(&full, &config).actual
    );
    assert_relative_eq!(
        categories::stability(&stripped, &config).actual,
        categories::stability(&full, &config).actual
    );
}

#[test]
fn single_absent_indicator_is_annotated() {
    let config = ScoringConfig::default();
    let r = FinancialRecord {
        peg: None,
        ..record()
    };
    let valuation = categories::valuation(&r, &config);
    let peg = valuation
        .details
        .iter()
        .find(|d| d.indicator == "peg")
        .unwrap();
    assert_relative_eq!(peg.points, 0.0);
    assert_eq!(peg.note, "not available");
}

#[test]
fn grade_boundary_tie_resolves_to_higher_grade() {
    let config = ScoringConfig::default();
    // 99/110 is exactly 90%, the A+/A boundary.
    let scores = vec![
        cat(Category::Profitability, 30.0, 27.0),
        cat(Category::Growth, 25.0, 22.5),
        cat(Category::Stability, 25.0, 22.5),
        cat(Category::Efficiency, 10.0, 9.0),
        cat(Category::Valuation, 20.0, 13.0),
        cat(Category::Quality, 10.0, 5.0),
    ];
    let result = aggregate::aggregate(&record(), date(), scores, &config);
    assert_relative_eq!(result.total_score, 99.0);
    assert_relative_eq!(result.percentage, 90.0);
    assert_eq!(result.grade, "A+");
}

#[test]
fn worked_example_85_3_points() {
    let config = ScoringConfig::default();
    let scores = vec![
        cat(Category::Profitability, 30.0, 23.5),
        cat(Category::Growth, 25.0, 17.0),
        cat(Category::Stability, 25.0, 22.1),
        cat(Category::Efficiency, 10.0, 7.0),
        cat(Category::Valuation, 20.0, 12.7),
        cat(Category::Quality, 10.0, 3.0),
    ];
    let result = aggregate::aggregate(&record(), date(), scores, &config);

    assert_relative_eq!(result.total_score, 85.3, epsilon = 1e-9);
    assert_relative_eq!(result.percentage, 77.545, epsilon = 1e-2);
    assert_eq!(result.grade, "A-");
    assert_eq!(result.tier.label(), "Buy");

    // stability 88.4% is a strength; valuation 63.5% is in neither list.
    assert!(result.strengths.iter().any(|s| s.starts_with("stability")));
    assert!(!result.strengths.iter().any(|s| s.starts_with("valuation")));
    assert!(!result.weaknesses.iter().any(|s| s.starts_with("valuation")));
    // quality 30% is a weakness.
    assert!(result.weaknesses.iter().any(|s| s.starts_with("quality")));
}

#[test]
fn exact_cutoff_lands_in_neither_list() {
    let config = ScoringConfig::default();
    let scores = vec![
        cat(Category::Profitability, 30.0, 24.0), // exactly 80%
        cat(Category::Growth, 25.0, 15.0),        // exactly 60%
        cat(Category::Stability, 25.0, 17.5),
        cat(Category::Efficiency, 10.0, 7.0),
        cat(Category::Valuation, 20.0, 14.0),
        cat(Category::Quality, 10.0, 7.0),
    ];
    let result = aggregate::aggregate(&record(), date(), scores, &config);
    assert!(!result.strengths.iter().any(|s| s.starts_with("profitability")));
    assert!(!result.weaknesses.iter().any(|s| s.starts_with("profitability")));
    assert!(!result.strengths.iter().any(|s| s.starts_with("growth")));
    assert!(!result.weaknesses.iter().any(|s| s.starts_with("growth")));
}

#[test]
fn quality_needs_at_least_two_periods() {
    let config = ScoringConfig::default();
    let history = [record()];
    let score = quality::score(&history, &config);
    assert_relative_eq!(score.actual, 0.0);
    assert_eq!(score.details[0].note, "insufficient data");
}

#[test]
fn consistent_history_earns_full_quality_marks() {
    let config = ScoringConfig::default();
    let history = [
        record(),
        prior_record(2023, 26.0, 270e12),
        prior_record(2022, 25.0, 255e12),
    ];
    let score = quality::score(&history, &config);
    // Profitable every year, small margin swings, equity growing every year.
    assert_relative_eq!(score.actual, score.max_points);
}

#[test]
fn volatile_history_scores_lower_quality() {
    let config = ScoringConfig::default();
    let steady = [
        record(),
        prior_record(2023, 26.0, 270e12),
        prior_record(2022, 25.0, 255e12),
    ];
    let choppy = [
        record(),
        FinancialRecord {
            net_income: Some(-2e12),
            ..prior_record(2023, 8.0, 290e12)
        },
        prior_record(2022, 25.0, 255e12),
    ];
    assert!(quality::score(&choppy, &config).actual < quality::score(&steady, &config).actual);
}

#[test]
fn engine_scores_full_history_end_to_end() {
    let engine = ScorecardEngine::new(ScoringConfig::default()).unwrap();
    let history = vec![
        record(),
        prior_record(2023, 26.0, 270e12),
        prior_record(2022, 25.0, 255e12),
    ];
    let result = engine.evaluate(&history, date()).unwrap();

    assert_eq!(result.stock_code, "005930");
    assert_eq!(result.categories.len(), 6);
    assert!(result.total_score > 0.0 && result.total_score <= 110.0);
    assert_relative_eq!(
        result.total_score,
        result.categories.iter().map(|c| c.actual).sum::<f64>()
    );
    assert!(!result.thesis.is_empty());
}

#[test]
fn engine_rejects_empty_history() {
    let engine = ScorecardEngine::new(ScoringConfig::default()).unwrap();
    let err = engine.evaluate(&[], date()).unwrap_err();
    assert!(matches!(err, ScoreError::InsufficientData(_)));
}

#[test]
fn engine_rejects_non_finite_values() {
    let engine = ScorecardEngine::new(ScoringConfig::default()).unwrap();
    let bad = FinancialRecord {
        roe: Some(f64::NAN),
        ..record()
    };
    let err = engine.evaluate(&[bad], date()).unwrap_err();
    assert!(matches!(err, ScoreError::InvalidRecord(_)));
}

#[test]
fn engine_rejects_malformed_stock_code() {
    let engine = ScorecardEngine::new(ScoringConfig::default()).unwrap();
    let bad = FinancialRecord {
        stock_code: "59A30".to_string(),
        ..record()
    };
    let err = engine.evaluate(&[bad], date()).unwrap_err();
    assert!(matches!(err, ScoreError::InvalidRecord(_)));
}

#[test]
fn misallocated_config_is_rejected_at_startup() {
    let mut config = ScoringConfig::default();
    config.profitability.indicators[0].max_points += 1.0;
    let err = ScorecardEngine::new(config).unwrap_err();
    assert!(matches!(err, ScoreError::Configuration(_)));
}

#[test]
fn category_maxima_must_sum_to_110() {
    let mut config = ScoringConfig::default();
    config.efficiency.max_points = 15.0;
    for indicator in &mut config.efficiency.indicators {
        indicator.max_points *= 1.5;
    }
    let err = ScorecardEngine::new(config).unwrap_err();
    assert!(matches!(err, ScoreError::Configuration(_)));
}

#[test]
fn unknown_indicator_name_is_rejected() {
    let mut config = ScoringConfig::default();
    config.growth.indicators[0].name = "revenue_growth_5y".to_string();
    let err = ScorecardEngine::new(config).unwrap_err();
    assert!(matches!(err, ScoreError::Configuration(_)));
}

#[test]
fn empty_record_totals_zero_but_still_aggregates() {
    let engine = ScorecardEngine::new(ScoringConfig::default()).unwrap();
    let empty = FinancialRecord {
        stock_code: "123456".to_string(),
        company_name: "Shell Co".to_string(),
        fiscal_year: 2024,
        ..FinancialRecord::default()
    };
    let result = engine.evaluate(&[empty], date()).unwrap();
    assert_relative_eq!(result.total_score, 0.0);
    assert_eq!(result.grade, "F");
    assert_eq!(result.tier.label(), "Strong Sell");
    assert_eq!(result.weaknesses.len(), 6);
}
