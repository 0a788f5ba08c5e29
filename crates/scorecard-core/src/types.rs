use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Normalized per-company, per-fiscal-year financial figures as supplied by
/// the disclosure collector. Ratio fields are percentages unless noted.
/// `None` means the collector did not produce the figure; values are never
/// encoded with sentinels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub stock_code: String,
    pub company_name: String,
    pub fiscal_year: i32,

    // Profitability (percent, except roic which is also percent)
    pub roe: Option<f64>,
    pub roa: Option<f64>,
    pub operating_margin: Option<f64>,
    pub net_margin: Option<f64>,
    pub ebitda_margin: Option<f64>,
    pub roic: Option<f64>,

    // Growth: 3-year CAGR, percent
    pub revenue_growth_3y: Option<f64>,
    pub net_income_growth_3y: Option<f64>,
    pub eps_growth_3y: Option<f64>,
    pub equity_growth_3y: Option<f64>,
    pub dividend_growth_3y: Option<f64>,

    // Stability
    pub debt_ratio: Option<f64>,
    pub current_ratio: Option<f64>,
    pub interest_coverage: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub altman_z: Option<f64>,

    // Efficiency (turnover multiples)
    pub asset_turnover: Option<f64>,
    pub inventory_turnover: Option<f64>,
    pub receivables_turnover: Option<f64>,

    // Valuation: market-dependent, absent when no price data was available
    pub per: Option<f64>,
    pub pbr: Option<f64>,
    pub peg: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub ev_ebitda: Option<f64>,

    // Raw period figures (KRW) consumed by the quality scorer across a
    // trailing window of records
    pub net_income: Option<f64>,
    pub shareholders_equity: Option<f64>,
}

impl FinancialRecord {
    /// Reject records the scorers must never see: malformed stock codes and
    /// non-finite figures (the collector contract is "finite or absent").
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.stock_code.len() != 6 || !self.stock_code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ScoreError::InvalidRecord(format!(
                "malformed stock code '{}'",
                self.stock_code
            )));
        }
        for (name, value) in self.fields() {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(ScoreError::InvalidRecord(format!(
                        "{}: non-finite value for {}",
                        self.stock_code, name
                    )));
                }
            }
        }
        Ok(())
    }

    /// All scorable fields by canonical indicator name.
    pub fn fields(&self) -> [(&'static str, Option<f64>); 26] {
        [
            ("roe", self.roe),
            ("roa", self.roa),
            ("operating_margin", self.operating_margin),
            ("net_margin", self.net_margin),
            ("ebitda_margin", self.ebitda_margin),
            ("roic", self.roic),
            ("revenue_growth_3y", self.revenue_growth_3y),
            ("net_income_growth_3y", self.net_income_growth_3y),
            ("eps_growth_3y", self.eps_growth_3y),
            ("equity_growth_3y", self.equity_growth_3y),
            ("dividend_growth_3y", self.dividend_growth_3y),
            ("debt_ratio", self.debt_ratio),
            ("current_ratio", self.current_ratio),
            ("interest_coverage", self.interest_coverage),
            ("quick_ratio", self.quick_ratio),
            ("altman_z", self.altman_z),
            ("asset_turnover", self.asset_turnover),
            ("inventory_turnover", self.inventory_turnover),
            ("receivables_turnover", self.receivables_turnover),
            ("per", self.per),
            ("pbr", self.pbr),
            ("peg", self.peg),
            ("dividend_yield", self.dividend_yield),
            ("ev_ebitda", self.ev_ebitda),
            ("net_income", self.net_income),
            ("shareholders_equity", self.shareholders_equity),
        ]
    }

    /// Look up a scorable field by its canonical indicator name.
    pub fn field(&self, name: &str) -> Option<Option<f64>> {
        self.fields()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}

/// Exchange listing state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Listed,
    Delisted,
    Suspended,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Listed => "LISTED",
            ListingStatus::Delisted => "DELISTED",
            ListingStatus::Suspended => "SUSPENDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LISTED" => Some(ListingStatus::Listed),
            "DELISTED" => Some(ListingStatus::Delisted),
            "SUSPENDED" => Some(ListingStatus::Suspended),
            _ => None,
        }
    }
}

/// Exchange investment-warning level. Variant order is severity order, so
/// `max` implements the "most severe wins" merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningLevel {
    None,
    Caution,
    Alert,
    Designated,
}

impl WarningLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningLevel::None => "NONE",
            WarningLevel::Caution => "CAUTION",
            WarningLevel::Alert => "ALERT",
            WarningLevel::Designated => "DESIGNATED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NONE" => Some(WarningLevel::None),
            "CAUTION" => Some(WarningLevel::Caution),
            "ALERT" => Some(WarningLevel::Alert),
            "DESIGNATED" => Some(WarningLevel::Designated),
            _ => None,
        }
    }
}

/// Listing/warning snapshot per stock, refreshed by an external updater and
/// read-only at analysis time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
    pub stock_code: String,
    pub listing_status: ListingStatus,
    pub investment_warning: WarningLevel,
}

impl StatusRecord {
    /// Snapshot for a stock the status feed has not covered yet.
    pub fn assumed_listed(stock_code: &str) -> Self {
        Self {
            stock_code: stock_code.to_string(),
            listing_status: ListingStatus::Listed,
            investment_warning: WarningLevel::None,
        }
    }
}

/// The six scorecard categories. A closed set: the engine matches on the
/// variant rather than dispatching dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Profitability,
    Growth,
    Stability,
    Efficiency,
    Valuation,
    Quality,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Profitability,
        Category::Growth,
        Category::Stability,
        Category::Efficiency,
        Category::Valuation,
        Category::Quality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Profitability => "profitability",
            Category::Growth => "growth",
            Category::Stability => "stability",
            Category::Efficiency => "efficiency",
            Category::Valuation => "valuation",
            Category::Quality => "quality",
        }
    }
}

/// Points earned by one sub-indicator, with a short note for the
/// explanation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorScore {
    pub indicator: String,
    pub points: f64,
    pub max_points: f64,
    pub note: String,
}

/// Points earned by one category. Immutable once computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub max_points: f64,
    pub actual: f64,
    pub details: Vec<IndicatorScore>,
}

impl CategoryScore {
    pub fn percentage(&self) -> f64 {
        if self.max_points > 0.0 {
            self.actual / self.max_points * 100.0
        } else {
            0.0
        }
    }
}

/// Investment recommendation tier derived from the percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationTier {
    StrongBuy,
    Buy,
    Hold,
    WeakHold,
    Sell,
    StrongSell,
}

impl RecommendationTier {
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationTier::StrongBuy => "Strong Buy",
            RecommendationTier::Buy => "Buy",
            RecommendationTier::Hold => "Hold",
            RecommendationTier::WeakHold => "Weak Hold",
            RecommendationTier::Sell => "Sell",
            RecommendationTier::StrongSell => "Strong Sell",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Strong Buy" => Some(RecommendationTier::StrongBuy),
            "Buy" => Some(RecommendationTier::Buy),
            "Hold" => Some(RecommendationTier::Hold),
            "Weak Hold" => Some(RecommendationTier::WeakHold),
            "Sell" => Some(RecommendationTier::Sell),
            "Strong Sell" => Some(RecommendationTier::StrongSell),
            _ => None,
        }
    }
}

/// Full scorecard for one (stock, analysis date). Produced once and never
/// mutated; a later analysis date supersedes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorecardResult {
    pub stock_code: String,
    pub company_name: String,
    pub analysis_date: NaiveDate,
    pub categories: Vec<CategoryScore>,
    pub total_score: f64,
    pub percentage: f64,
    pub grade: String,
    pub tier: RecommendationTier,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub thesis: String,
}

impl ScorecardResult {
    pub fn category(&self, category: Category) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Which filter clause produced the investability outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterRule {
    NotListed,
    ScoreFloor,
    CategoryFloor,
    ExchangePassthrough,
    Clean,
}

impl FilterRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterRule::NotListed => "not_listed",
            FilterRule::ScoreFloor => "score_floor",
            FilterRule::CategoryFloor => "category_floor",
            FilterRule::ExchangePassthrough => "exchange_passthrough",
            FilterRule::Clean => "clean",
        }
    }
}

/// Investability decision for one (stock, analysis date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestabilityResult {
    pub stock_code: String,
    pub is_investable: bool,
    pub warning: WarningLevel,
    pub listing_status: ListingStatus,
    pub rule: FilterRule,
}
