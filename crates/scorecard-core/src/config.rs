use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::types::{Category, RecommendationTier};

/// The scorecard's declared ceiling. Category maxima must sum to this.
pub const TOTAL_MAX_SCORE: f64 = 110.0;

/// Whether larger raw values earn more points (ROE) or fewer (debt ratio).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// One breakpoint: values at or beyond `threshold` (in the indicator's
/// favorable direction) earn `fraction` of the indicator's points, unless an
/// earlier (stricter) tier already matched. Values beyond every tier earn zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tier {
    pub threshold: f64,
    pub fraction: f64,
}

/// Point allocation and breakpoint table for one sub-indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub name: String,
    pub max_points: f64,
    pub direction: Direction,
    pub tiers: Vec<Tier>,
}

/// Point ceiling and sub-indicator table for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpec {
    pub max_points: f64,
    pub indicators: Vec<IndicatorSpec>,
}

/// Letter-grade boundary: percentages at or above `min_pct` earn `grade`
/// unless a higher band matched first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeBand {
    pub min_pct: f64,
    pub grade: String,
}

/// Recommendation-tier boundary on the same percentage axis as the grades,
/// but with independent cut points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierBand {
    pub min_pct: f64,
    pub tier: RecommendationTier,
}

/// The complete tunable surface of the scorecard: category ceilings, every
/// sub-indicator breakpoint, grade/tier boundary tables, strength/weakness
/// cutoffs and the investability floors. Injected immutably into the engine
/// and filter; never read from module-level constants by the scorers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub profitability: CategorySpec,
    pub growth: CategorySpec,
    pub stability: CategorySpec,
    pub efficiency: CategorySpec,
    pub valuation: CategorySpec,
    pub quality: CategorySpec,

    pub grade_bands: Vec<GradeBand>,
    pub tier_bands: Vec<TierBand>,

    /// Category percentage strictly above this is a strength.
    pub strength_cutoff_pct: f64,
    /// Category percentage strictly below this is a weakness.
    pub weakness_cutoff_pct: f64,

    /// Total score below this is treated as management-designation level and
    /// not investable.
    pub designated_floor: f64,
    /// Raw stability/profitability points (on the category's own scale) below
    /// this raise an ALERT warning.
    pub category_alert_floor: f64,
}

impl ScoringConfig {
    pub fn category(&self, category: Category) -> &CategorySpec {
        match category {
            Category::Profitability => &self.profitability,
            Category::Growth => &self.growth,
            Category::Stability => &self.stability,
            Category::Efficiency => &self.efficiency,
            Category::Valuation => &self.valuation,
            Category::Quality => &self.quality,
        }
    }

    pub fn total_max(&self) -> f64 {
        Category::ALL
            .iter()
            .map(|c| self.category(*c).max_points)
            .sum()
    }

    /// Load from the JSON file named by `SCORING_CONFIG`, or fall back to the
    /// compiled-in defaults. The result still has to pass `validate`.
    pub fn load() -> Result<Self, ScoreError> {
        match std::env::var("SCORING_CONFIG") {
            Ok(path) => Self::from_file(&path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &str) -> Result<Self, ScoreError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ScoreError::Configuration(format!("cannot read {}: {}", path, e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| ScoreError::Configuration(format!("cannot parse {}: {}", path, e)))
    }

    /// Reject inconsistent threshold tables before any scoring runs.
    pub fn validate(&self) -> Result<(), ScoreError> {
        for category in Category::ALL {
            let spec = self.category(category);
            if spec.indicators.is_empty() {
                return Err(ScoreError::Configuration(format!(
                    "{}: no sub-indicators configured",
                    category.as_str()
                )));
            }
            let allocated: f64 = spec.indicators.iter().map(|i| i.max_points).sum();
            if (allocated - spec.max_points).abs() > 1e-6 {
                return Err(ScoreError::Configuration(format!(
                    "{}: sub-indicator points sum to {} but category maximum is {}",
                    category.as_str(),
                    allocated,
                    spec.max_points
                )));
            }
            for indicator in &spec.indicators {
                validate_indicator(category, indicator)?;
            }
        }

        if (self.total_max() - TOTAL_MAX_SCORE).abs() > 1e-6 {
            return Err(ScoreError::Configuration(format!(
                "category maxima sum to {} instead of {}",
                self.total_max(),
                TOTAL_MAX_SCORE
            )));
        }

        validate_descending(
            "grade_bands",
            &self.grade_bands.iter().map(|b| b.min_pct).collect::<Vec<_>>(),
        )?;
        validate_descending(
            "tier_bands",
            &self.tier_bands.iter().map(|b| b.min_pct).collect::<Vec<_>>(),
        )?;

        if self.weakness_cutoff_pct >= self.strength_cutoff_pct {
            return Err(ScoreError::Configuration(
                "weakness cutoff must be below strength cutoff".to_string(),
            ));
        }
        if self.designated_floor < 0.0 || self.category_alert_floor < 0.0 {
            return Err(ScoreError::Configuration(
                "score floors must be non-negative".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_indicator(category: Category, indicator: &IndicatorSpec) -> Result<(), ScoreError> {
    let context = || format!("{}/{}", category.as_str(), indicator.name);

    if indicator.max_points <= 0.0 {
        return Err(ScoreError::Configuration(format!(
            "{}: max_points must be positive",
            context()
        )));
    }
    if indicator.tiers.is_empty() {
        return Err(ScoreError::Configuration(format!(
            "{}: no tiers configured",
            context()
        )));
    }
    for pair in indicator.tiers.windows(2) {
        let ordered = match indicator.direction {
            Direction::HigherIsBetter => pair[0].threshold > pair[1].threshold,
            Direction::LowerIsBetter => pair[0].threshold < pair[1].threshold,
        };
        if !ordered {
            return Err(ScoreError::Configuration(format!(
                "{}: tier thresholds out of order",
                context()
            )));
        }
        if pair[0].fraction <= pair[1].fraction {
            return Err(ScoreError::Configuration(format!(
                "{}: tier fractions must be strictly decreasing",
                context()
            )));
        }
    }
    for tier in &indicator.tiers {
        if tier.fraction <= 0.0 || tier.fraction > 1.0 {
            return Err(ScoreError::Configuration(format!(
                "{}: tier fraction {} outside (0, 1]",
                context(),
                tier.fraction
            )));
        }
    }
    Ok(())
}

fn validate_descending(name: &str, bounds: &[f64]) -> Result<(), ScoreError> {
    if bounds.is_empty() {
        return Err(ScoreError::Configuration(format!("{}: empty table", name)));
    }
    if bounds.windows(2).any(|p| p[0] <= p[1]) {
        return Err(ScoreError::Configuration(format!(
            "{}: boundaries must be strictly descending",
            name
        )));
    }
    Ok(())
}

fn indicator(
    name: &str,
    max_points: f64,
    direction: Direction,
    tiers: &[(f64, f64)],
) -> IndicatorSpec {
    IndicatorSpec {
        name: name.to_string(),
        max_points,
        direction,
        tiers: tiers
            .iter()
            .map(|(threshold, fraction)| Tier {
                threshold: *threshold,
                fraction: *fraction,
            })
            .collect(),
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        use Direction::{HigherIsBetter, LowerIsBetter};

        Self {
            profitability: CategorySpec {
                max_points: 30.0,
                indicators: vec![
                    indicator(
                        "roe",
                        8.0,
                        HigherIsBetter,
                        &[(20.0, 1.0), (15.0, 0.75), (10.0, 0.5), (5.0, 0.25)],
                    ),
                    indicator(
                        "roa",
                        5.0,
                        HigherIsBetter,
                        &[(12.0, 1.0), (8.0, 0.7), (5.0, 0.4), (2.0, 0.2)],
                    ),
                    indicator(
                        "operating_margin",
                        5.0,
                        HigherIsBetter,
                        &[(15.0, 1.0), (10.0, 0.7), (5.0, 0.4), (0.0, 0.2)],
                    ),
                    indicator(
                        "net_margin",
                        5.0,
                        HigherIsBetter,
                        &[(10.0, 1.0), (7.0, 0.7), (4.0, 0.4), (0.0, 0.2)],
                    ),
                    indicator(
                        "ebitda_margin",
                        4.0,
                        HigherIsBetter,
                        &[(20.0, 1.0), (15.0, 0.7), (10.0, 0.4)],
                    ),
                    indicator(
                        "roic",
                        3.0,
                        HigherIsBetter,
                        &[(12.0, 1.0), (8.0, 0.6), (5.0, 0.3)],
                    ),
                ],
            },
            growth: CategorySpec {
                max_points: 25.0,
                indicators: vec![
                    indicator(
                        "revenue_growth_3y",
                        7.0,
                        HigherIsBetter,
                        &[(15.0, 1.0), (10.0, 0.8), (5.0, 0.6), (0.0, 0.3)],
                    ),
                    indicator(
                        "net_income_growth_3y",
                        6.0,
                        HigherIsBetter,
                        &[(15.0, 1.0), (10.0, 0.8), (5.0, 0.6), (0.0, 0.3)],
                    ),
                    indicator(
                        "eps_growth_3y",
                        5.0,
                        HigherIsBetter,
                        &[(15.0, 1.0), (10.0, 0.8), (5.0, 0.6), (0.0, 0.3)],
                    ),
                    indicator(
                        "equity_growth_3y",
                        4.0,
                        HigherIsBetter,
                        &[(15.0, 1.0), (10.0, 0.8), (5.0, 0.6), (0.0, 0.3)],
                    ),
                    indicator(
                        "dividend_growth_3y",
                        3.0,
                        HigherIsBetter,
                        &[(15.0, 1.0), (10.0, 0.8), (5.0, 0.6), (0.0, 0.3)],
                    ),
                ],
            },
            stability: CategorySpec {
                max_points: 25.0,
                indicators: vec![
                    indicator(
                        "debt_ratio",
                        8.0,
                        LowerIsBetter,
                        &[(25.0, 1.0), (35.0, 0.8), (50.0, 0.6), (100.0, 0.3)],
                    ),
                    indicator(
                        "current_ratio",
                        6.0,
                        HigherIsBetter,
                        &[(200.0, 1.0), (150.0, 0.7), (100.0, 0.4)],
                    ),
                    indicator(
                        "interest_coverage",
                        5.0,
                        HigherIsBetter,
                        &[(7.5, 1.0), (5.0, 0.7), (2.0, 0.4)],
                    ),
                    indicator(
                        "quick_ratio",
                        4.0,
                        HigherIsBetter,
                        &[(150.0, 1.0), (100.0, 0.7), (70.0, 0.4)],
                    ),
                    indicator(
                        "altman_z",
                        2.0,
                        HigherIsBetter,
                        &[(3.0, 1.0), (1.8, 0.6)],
                    ),
                ],
            },
            efficiency: CategorySpec {
                max_points: 10.0,
                indicators: vec![
                    indicator(
                        "asset_turnover",
                        3.0,
                        HigherIsBetter,
                        &[(0.65, 1.0), (0.5, 0.6), (0.35, 0.3)],
                    ),
                    indicator(
                        "inventory_turnover",
                        4.0,
                        HigherIsBetter,
                        &[(8.0, 1.0), (6.0, 0.6), (4.0, 0.3)],
                    ),
                    indicator(
                        "receivables_turnover",
                        3.0,
                        HigherIsBetter,
                        &[(10.0, 1.0), (8.0, 0.6), (6.0, 0.3)],
                    ),
                ],
            },
            valuation: CategorySpec {
                max_points: 20.0,
                indicators: vec![
                    indicator(
                        "per",
                        6.0,
                        LowerIsBetter,
                        &[(8.4, 1.0), (12.0, 0.8), (15.0, 0.6), (20.0, 0.3)],
                    ),
                    indicator(
                        "pbr",
                        5.0,
                        LowerIsBetter,
                        &[(0.8, 1.0), (1.0, 0.8), (1.5, 0.6), (3.0, 0.3)],
                    ),
                    indicator(
                        "peg",
                        4.0,
                        LowerIsBetter,
                        &[(0.7, 1.0), (1.0, 0.7), (1.5, 0.4)],
                    ),
                    indicator(
                        "dividend_yield",
                        3.0,
                        HigherIsBetter,
                        &[(3.0, 1.0), (2.4, 0.8), (2.0, 0.6), (1.0, 0.4)],
                    ),
                    indicator(
                        "ev_ebitda",
                        2.0,
                        LowerIsBetter,
                        &[(7.0, 1.0), (8.5, 0.8), (10.0, 0.6), (14.0, 0.3)],
                    ),
                ],
            },
            quality: CategorySpec {
                max_points: 10.0,
                indicators: vec![
                    indicator(
                        "earnings_consistency",
                        4.0,
                        HigherIsBetter,
                        &[(100.0, 1.0), (66.0, 0.5), (33.0, 0.25)],
                    ),
                    indicator(
                        "margin_stability",
                        3.0,
                        LowerIsBetter,
                        &[(3.0, 1.0), (6.0, 0.6), (10.0, 0.3)],
                    ),
                    indicator(
                        "equity_accretion",
                        3.0,
                        HigherIsBetter,
                        &[(100.0, 1.0), (50.0, 0.6)],
                    ),
                ],
            },
            grade_bands: vec![
                GradeBand { min_pct: 95.0, grade: "A++".to_string() },
                GradeBand { min_pct: 90.0, grade: "A+".to_string() },
                GradeBand { min_pct: 85.0, grade: "A".to_string() },
                GradeBand { min_pct: 75.0, grade: "A-".to_string() },
                GradeBand { min_pct: 70.0, grade: "B+".to_string() },
                GradeBand { min_pct: 65.0, grade: "B".to_string() },
                GradeBand { min_pct: 60.0, grade: "B-".to_string() },
                GradeBand { min_pct: 55.0, grade: "C+".to_string() },
                GradeBand { min_pct: 50.0, grade: "C".to_string() },
                GradeBand { min_pct: 45.0, grade: "C-".to_string() },
                GradeBand { min_pct: 40.0, grade: "D+".to_string() },
                GradeBand { min_pct: 35.0, grade: "D".to_string() },
                GradeBand { min_pct: 0.0, grade: "F".to_string() },
            ],
            tier_bands: vec![
                TierBand { min_pct: 85.0, tier: RecommendationTier::StrongBuy },
                TierBand { min_pct: 75.0, tier: RecommendationTier::Buy },
                TierBand { min_pct: 60.0, tier: RecommendationTier::Hold },
                TierBand { min_pct: 50.0, tier: RecommendationTier::WeakHold },
                TierBand { min_pct: 40.0, tier: RecommendationTier::Sell },
                TierBand { min_pct: 0.0, tier: RecommendationTier::StrongSell },
            ],
            strength_cutoff_pct: 80.0,
            weakness_cutoff_pct: 60.0,
            designated_floor: 20.0,
            category_alert_floor: 5.0,
        }
    }
}
