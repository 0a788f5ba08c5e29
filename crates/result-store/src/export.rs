//! Flat report export: four CSV partitions of the result rows plus a top-50
//! JSON file for downstream dashboards.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::rows::ResultRow;

/// Where each report landed.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub recommendations: PathBuf,
    pub investable: PathBuf,
    pub non_investable: PathBuf,
    pub combined: PathBuf,
    pub top50: PathBuf,
}

/// Rows qualifying for the recommendation report: investable and rated Buy
/// or better.
pub fn is_recommendation(row: &ResultRow) -> bool {
    row.is_investable && matches!(row.tier.as_str(), "Strong Buy" | "Buy")
}

/// Writes the report files into one output directory.
pub struct ReportWriter {
    out_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Write all five reports from one result-row set. Rows should already be
    /// the latest per stock; ordering within each file is highest total first.
    pub fn write_all(&self, rows: &[ResultRow]) -> Result<ReportPaths, StoreError> {
        std::fs::create_dir_all(&self.out_dir)?;

        let mut sorted: Vec<&ResultRow> = rows.iter().collect();
        sorted.sort_by(|a, b| {
            b.total_score
                .partial_cmp(&a.total_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let recommendations: Vec<&ResultRow> = sorted
            .iter()
            .copied()
            .filter(|r| is_recommendation(r))
            .collect();
        let investable: Vec<&ResultRow> =
            sorted.iter().copied().filter(|r| r.is_investable).collect();
        let non_investable: Vec<&ResultRow> =
            sorted.iter().copied().filter(|r| !r.is_investable).collect();

        let paths = ReportPaths {
            recommendations: self.out_dir.join("investable_recommendations.csv"),
            investable: self.out_dir.join("all_investable.csv"),
            non_investable: self.out_dir.join("non_investable.csv"),
            combined: self.out_dir.join("combined_with_status.csv"),
            top50: self.out_dir.join("top50.json"),
        };

        write_csv(&paths.recommendations, &recommendations)?;
        write_csv(&paths.investable, &investable)?;
        write_csv(&paths.non_investable, &non_investable)?;
        write_csv(&paths.combined, &sorted)?;

        let top50: Vec<&ResultRow> = sorted.iter().copied().take(50).collect();
        serde_json::to_writer_pretty(File::create(&paths.top50)?, &top50)?;

        Ok(paths)
    }
}

fn write_csv(path: &Path, rows: &[&ResultRow]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(code: &str, total: f64, tier: &str, investable: bool) -> ResultRow {
        ResultRow {
            stock_code: code.to_string(),
            company_name: format!("Company {}", code),
            analysis_date: NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
            profitability_score: 20.0,
            growth_score: 15.0,
            stability_score: 18.0,
            efficiency_score: 6.0,
            valuation_score: 12.0,
            quality_score: 6.0,
            total_score: total,
            percentage: total / 110.0 * 100.0,
            grade: "B".to_string(),
            tier: tier.to_string(),
            strengths: String::new(),
            weaknesses: String::new(),
            thesis: String::new(),
            is_investable: investable,
            investment_warning: "NONE".to_string(),
            listing_status: "LISTED".to_string(),
            filter_rule: "clean".to_string(),
        }
    }

    #[test]
    fn recommendation_needs_investable_and_buy_tier() {
        assert!(is_recommendation(&row("005930", 90.0, "Strong Buy", true)));
        assert!(is_recommendation(&row("000660", 85.0, "Buy", true)));
        assert!(!is_recommendation(&row("035420", 70.0, "Hold", true)));
        assert!(!is_recommendation(&row("900110", 90.0, "Strong Buy", false)));
    }

    #[test]
    fn partitions_are_disjoint_and_complete() {
        let rows = vec![
            row("005930", 95.0, "Strong Buy", true),
            row("000660", 70.0, "Hold", true),
            row("900110", 40.0, "Sell", false),
        ];
        let dir = tempfile::tempdir().unwrap();
        let paths = ReportWriter::new(dir.path()).write_all(&rows).unwrap();

        let count = |path: &std::path::Path| {
            csv::Reader::from_path(path).unwrap().into_records().count()
        };
        assert_eq!(count(&paths.recommendations), 1);
        assert_eq!(count(&paths.investable), 2);
        assert_eq!(count(&paths.non_investable), 1);
        assert_eq!(count(&paths.combined), 3);

        let top50: Vec<ResultRow> =
            serde_json::from_reader(File::open(&paths.top50).unwrap()).unwrap();
        assert_eq!(top50.len(), 3);
        assert_eq!(top50[0].stock_code, "005930");
    }
}
