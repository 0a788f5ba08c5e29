//! The pure computational core of the scorecard: six category scorers and the
//! aggregator that turns their sub-scores into a graded, tiered result.
//!
//! Everything here is deterministic arithmetic over a [`FinancialRecord`]
//! window; no I/O, no shared state. Thresholds come exclusively from the
//! injected [`ScoringConfig`].

use chrono::NaiveDate;
use scorecard_core::{Category, FinancialRecord, ScoreError, ScorecardResult, ScoringConfig};

pub mod aggregate;
pub mod categories;
mod indicator;
pub mod quality;

#[cfg(test)]
mod tests;

/// How many trailing fiscal years the quality scorer may look at.
pub const QUALITY_WINDOW_YEARS: usize = 3;

#[derive(Debug)]
pub struct ScorecardEngine {
    config: ScoringConfig,
}

impl ScorecardEngine {
    /// Validates the configuration (threshold tables, point sums, indicator
    /// names) before any scoring can run.
    pub fn new(config: ScoringConfig) -> Result<Self, ScoreError> {
        config.validate()?;

        let probe = FinancialRecord::default();
        for category in Category::ALL {
            for spec in &config.category(category).indicators {
                let known = if category == Category::Quality {
                    quality::DERIVED_INDICATORS.contains(&spec.name.as_str())
                } else {
                    probe.field(&spec.name).is_some()
                };
                if !known {
                    return Err(ScoreError::Configuration(format!(
                        "{}: unknown indicator '{}'",
                        category.as_str(),
                        spec.name
                    )));
                }
            }
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one stock from its trailing record window (latest first). Only
    /// the latest record feeds the five snapshot categories; the quality
    /// scorer sees up to [`QUALITY_WINDOW_YEARS`] records.
    pub fn evaluate(
        &self,
        history: &[FinancialRecord],
        analysis_date: NaiveDate,
    ) -> Result<ScorecardResult, ScoreError> {
        let latest = history
            .first()
            .ok_or_else(|| ScoreError::InsufficientData("no financial records".to_string()))?;
        for record in history {
            record.validate()?;
        }

        let window = &history[..history.len().min(QUALITY_WINDOW_YEARS)];
        let scores = vec![
            categories::profitability(latest, &self.config),
            categories::growth(latest, &self.config),
            categories::stability(latest, &self.config),
            categories::efficiency(latest, &self.config),
            categories::valuation(latest, &self.config),
            quality::score(window, &self.config),
        ];

        Ok(aggregate::aggregate(latest, analysis_date, scores, &self.config))
    }
}
