use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::indicators::IndicatorValue;

// ---------------------------------------------------------------------------
// Input rows
// ---------------------------------------------------------------------------

/// One normalized row of the vendor sales extract.
///
/// Numeric coercion happens upstream: a value that could not be parsed
/// arrives as `None`, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Brand (DESCRIPTION column)
    pub brand: String,
    /// Retailer or channel (GEOGRAPHY column)
    pub geography: String,
    /// Time-period label, e.g. "12 Weeks 2025-10-05"
    pub time_period: String,
    #[serde(default)]
    pub dollars: f64,
    #[serde(default)]
    pub units: i64,
    /// Dollar change vs. year ago, as a fraction (0.12 = +12%)
    #[serde(default)]
    pub dollars_yoy_change: Option<f64>,
    /// Max % ACV, 0..100
    #[serde(default)]
    pub max_acv: Option<f64>,
    /// Max % ACV change vs. year ago, in ACV points
    #[serde(default)]
    pub max_acv_change_yoy: Option<f64>,
    #[serde(default)]
    pub tdp: f64,
    #[serde(default)]
    pub promo_dollars: f64,
    #[serde(default)]
    pub non_promo_dollars: f64,
    #[serde(default)]
    pub promo_units: f64,
    #[serde(default)]
    pub stores_selling: i64,
}

impl SalesRecord {
    /// Minimal row with identity fields and dollars; everything else empty.
    pub fn new(brand: &str, geography: &str, time_period: &str, dollars: f64) -> Self {
        Self {
            brand: brand.to_string(),
            geography: geography.to_string(),
            time_period: time_period.to_string(),
            dollars,
            units: 0,
            dollars_yoy_change: None,
            max_acv: None,
            max_acv_change_yoy: None,
            tdp: 0.0,
            promo_dollars: 0.0,
            non_promo_dollars: dollars,
            promo_units: 0.0,
            stores_selling: 0,
        }
    }

    pub fn with_growth(mut self, growth: f64) -> Self {
        self.dollars_yoy_change = Some(growth);
        self
    }

    pub fn with_acv(mut self, acv: f64) -> Self {
        self.max_acv = Some(acv);
        self
    }

    pub fn with_acv_change(mut self, points: f64) -> Self {
        self.max_acv_change_yoy = Some(points);
        self
    }

    pub fn with_units(mut self, units: i64, stores_selling: i64) -> Self {
        self.units = units;
        self.stores_selling = stores_selling;
        self
    }

    /// Splits `dollars` into promo / non-promo parts.
    pub fn with_promo(mut self, promo_dollars: f64) -> Self {
        self.promo_dollars = promo_dollars;
        self.non_promo_dollars = self.dollars - promo_dollars;
        self
    }

    /// Units sold per store carrying the product, 0 when no stores sell it.
    pub fn velocity(&self) -> f64 {
        if self.stores_selling > 0 {
            self.units as f64 / self.stores_selling as f64
        } else {
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// Derived metrics
// ---------------------------------------------------------------------------

/// Aggregates for one (brand, period) slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub row_count: usize,
    pub total_sales: f64,
    pub total_units: i64,
    pub total_promo_sales: f64,
    /// Mean YoY growth (fraction); `None` when no row carries growth
    pub avg_growth: Option<f64>,
    /// Dollar-weighted change vs. year ago (fraction) over rows with growth
    pub sales_change: Option<f64>,
    /// Mean Max % ACV; `None` when no row carries ACV
    pub avg_acv: Option<f64>,
    /// Promo share of sales, 0..100
    pub promo_pct: f64,
    /// Units per store across the slice
    pub velocity: f64,
}

/// A metric that could not be derived from the slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricGap {
    InsufficientGrowthData,
    InsufficientAcvData,
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    DecliningSales,
    HighPromoDependency,
    DistributionLoss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    StrongGrowth,
    DistributionGap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub metric: f64,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub kind: OpportunityKind,
    pub title: String,
    pub description: String,
    pub metric: f64,
    pub subject: Option<String>,
    /// Suggested next step
    pub action: String,
}

/// A competitor outgrowing the subject brand at one geography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    pub title: String,
    pub description: String,
    /// Competitor growth (fraction)
    pub metric: f64,
    /// Competitor brand
    pub subject: Option<String>,
    pub geography: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "finding", rename_all = "snake_case")]
pub enum Finding {
    Alert(Alert),
    Opportunity(Opportunity),
    Threat(Threat),
}

impl Finding {
    pub fn title(&self) -> &str {
        match self {
            Finding::Alert(a) => &a.title,
            Finding::Opportunity(o) => &o.title,
            Finding::Threat(t) => &t.title,
        }
    }

    pub fn metric(&self) -> f64 {
        match self {
            Finding::Alert(a) => a.metric,
            Finding::Opportunity(o) => o.metric,
            Finding::Threat(t) => t.metric,
        }
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            Finding::Alert(a) => a.subject.as_deref(),
            Finding::Opportunity(o) => o.subject.as_deref(),
            Finding::Threat(t) => t.subject.as_deref(),
        }
    }

    /// Only alerts carry a severity.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Finding::Alert(a) => Some(a.severity),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring & recommendations
// ---------------------------------------------------------------------------

/// Priority tier, shared by retailer scores and recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: High first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// One scorecard row per retailer (geography).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetailerScore {
    pub retailer: String,
    pub sales: f64,
    /// Raw YoY growth (fraction)
    pub growth: Option<f64>,
    /// 0..100, relative to the best-selling retailer
    pub sales_score: f64,
    /// 0..100, clipped growth mapped linearly
    pub growth_score: f64,
    pub performance_score: f64,
    pub priority: Priority,
    pub units: i64,
    pub acv: Option<f64>,
    pub tdp: f64,
    pub promo_pct: f64,
    pub stores: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    RetailerFocus,
    RetailerRisk,
    PromoStrategy,
    Distribution,
    CompetitiveResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: Priority,
    pub title: String,
    pub rationale: String,
    pub actions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Portfolio quadrants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioQuadrant {
    /// High sales, high growth: invest & grow
    Star,
    /// High sales, low growth: maintain & optimize
    CashCow,
    /// Low sales, high growth: invest to scale
    RisingStar,
    /// Low sales, low growth: fix or exit
    QuestionMark,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub median_sales: f64,
    pub median_growth: Option<f64>,
    pub stars: Vec<String>,
    pub cash_cows: Vec<String>,
    pub rising_stars: Vec<String>,
    pub question_marks: Vec<String>,
}

// ---------------------------------------------------------------------------
// Competitive landscape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandShare {
    pub brand: String,
    pub dollars: f64,
    pub growth: Option<f64>,
    /// Share of geography dollars, 0..100
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveLandscape {
    pub geography: String,
    pub period: String,
    pub total_sales: f64,
    pub top_brands: Vec<BrandShare>,
    /// Growing brands, fastest first
    pub growth_leaders: Vec<BrandShare>,
    /// Shrinking brands, steepest decline first
    pub decliners: Vec<BrandShare>,
    /// 1-based rank of the subject brand among all brands
    pub subject_rank: Option<usize>,
    pub subject_share_pct: Option<f64>,
}

// ---------------------------------------------------------------------------
// Promotional analysis
// ---------------------------------------------------------------------------

/// Promo / non-promo split of one retailer or one period.
/// Percent fields are 0..100 and 0 when the base is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromoMix {
    /// Retailer for per-retailer rows, period label for trend points
    pub label: String,
    pub dollars: f64,
    pub promo_dollars: f64,
    pub non_promo_dollars: f64,
    /// Promo share of dollars
    pub promo_pct: f64,
    pub units: i64,
    pub promo_units: f64,
    /// Promo share of units
    pub units_promo_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoAnalysis {
    pub brand: String,
    pub period: String,
    /// Whole selected slice
    pub summary: PromoMix,
    /// One row per retailer, by descending dollars
    pub retailers: Vec<PromoMix>,
    /// The brand's promo mix in every period, oldest first
    pub trend: Vec<PromoMix>,
}

// ---------------------------------------------------------------------------
// Trend summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    pub dollars: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Accelerating,
    Stable,
    Slowing,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityLevel {
    Low,
    Moderate,
    High,
}

/// `None` fields mean the series was shorter than the comparison window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub channel: String,
    pub points: usize,
    pub direction_pct: Option<f64>,
    pub direction: Option<TrendDirection>,
    pub volatility_pct: Option<f64>,
    pub volatility: Option<VolatilityLevel>,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Everything produced for one (brand, period) query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub brand: String,
    pub period: String,
    pub metrics: MetricSnapshot,
    pub gaps: Vec<MetricGap>,
    pub findings: Vec<Finding>,
    pub retailer_scores: Vec<RetailerScore>,
    pub recommendations: Vec<Recommendation>,
    pub key_indicators: Vec<IndicatorValue>,
}

impl InsightsReport {
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.findings.iter().filter_map(|f| match f {
            Finding::Alert(a) => Some(a),
            _ => None,
        })
    }

    pub fn opportunities(&self) -> impl Iterator<Item = &Opportunity> {
        self.findings.iter().filter_map(|f| match f {
            Finding::Opportunity(o) => Some(o),
            _ => None,
        })
    }

    pub fn threats(&self) -> impl Iterator<Item = &Threat> {
        self.findings.iter().filter_map(|f| match f {
            Finding::Threat(t) => Some(t),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetailerScorecard {
    pub brand: String,
    pub period: String,
    pub scores: Vec<RetailerScore>,
    pub portfolio: PortfolioSummary,
}

// ---------------------------------------------------------------------------
// API request / response
// ---------------------------------------------------------------------------

/// Brand + period selection over a record set.
/// Missing brand falls back to the configured default, missing period to the latest one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsRequest {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    pub records: Vec<SalesRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub report: InsightsReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodsRequest {
    pub records: Vec<SalesRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitiveLandscapeRequest {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    pub geography: String,
    pub records: Vec<SalesRecord>,
}

/// `trend_geography` restricts the over-time series to one channel;
/// without it every retailer of the brand is summed per period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoAnalysisRequest {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub trend_geography: Option<String>,
    pub records: Vec<SalesRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendSummaryRequest {
    pub channel: String,
    pub points: Vec<TrendPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults_optional_fields() {
        let json = r#"{"brand":"HUMBLE","geography":"KROGER","time_period":"12 Weeks","dollars":100.0}"#;
        let record: SalesRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.units, 0);
        assert_eq!(record.dollars_yoy_change, None);
        assert_eq!(record.max_acv, None);
    }

    #[test]
    fn test_record_requires_identity_fields() {
        let json = r#"{"brand":"HUMBLE","time_period":"12 Weeks","dollars":100.0}"#;
        assert!(serde_json::from_str::<SalesRecord>(json).is_err());
    }

    #[test]
    fn test_finding_is_tagged() {
        let finding = Finding::Alert(Alert {
            kind: AlertKind::DecliningSales,
            severity: Severity::High,
            title: "Declining Sales Trend".into(),
            description: String::new(),
            metric: -0.08,
            subject: None,
        });
        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(value["finding"], "alert");
        assert_eq!(value["kind"], "declining_sales");
        assert_eq!(value["severity"], "high");
    }

    #[test]
    fn test_velocity_guards_zero_stores() {
        let record = SalesRecord::new("HUMBLE", "KROGER", "12 Weeks", 10.0).with_units(50, 0);
        assert_eq!(record.velocity(), 0.0);
        let record = record.with_units(50, 10);
        assert_eq!(record.velocity(), 5.0);
    }
}
