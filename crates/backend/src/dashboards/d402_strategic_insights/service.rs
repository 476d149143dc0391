use contracts::dashboards::d402_strategic_insights::{
    CompetitiveLandscape, CompetitiveLandscapeRequest, InsightsReport, InsightsRequest,
    PromoAnalysis, PromoAnalysisRequest, RetailerScorecard, SalesRecord, TrendSummary,
    TrendSummaryRequest,
};

use super::error::InsightsError;
use super::metrics::derive_metrics;
use super::recommendations::{self, RecommendationInput};
use super::rules::{self, RuleInput};
use super::selection::{self, Selection};
use super::{competition, portfolio, promotions, scorer, trends};
use crate::shared::config::InsightsSettings;
use crate::shared::indicators::{metadata, registry::IndicatorRegistry};

/// Distinct period labels present in the records, oldest first.
pub fn available_periods(records: &[SalesRecord]) -> Result<Vec<String>, InsightsError> {
    selection::validate_records(records)?;
    Ok(selection::available_periods(records))
}

/// Build the full strategic insights report for one (brand, period).
///
/// An empty slice yields a zero snapshot and no findings, scores or
/// recommendations. Only blank identity fields abort the call.
pub fn build_report(
    request: &InsightsRequest,
    settings: &InsightsSettings,
) -> Result<InsightsReport, InsightsError> {
    let Selection { brand, period } = select(
        request.brand.as_deref(),
        request.period.as_deref(),
        &request.records,
        settings,
    )?;

    let period_rows = selection::period_slice(&request.records, &period);
    let rows = selection::brand_slice(&period_rows, &brand);

    let derived = derive_metrics(&rows);
    let key_indicators = IndicatorRegistry::new().compute(
        &metadata::executive_summary_ids(),
        &derived.snapshot,
        settings,
    );

    if rows.is_empty() {
        tracing::info!("D402: no rows for brand {} in period {}", brand, period);
        return Ok(InsightsReport {
            brand,
            period,
            metrics: derived.snapshot,
            gaps: derived.gaps,
            findings: Vec::new(),
            retailer_scores: Vec::new(),
            recommendations: Vec::new(),
            key_indicators,
        });
    }

    let findings = rules::evaluate(&RuleInput {
        brand: &brand,
        metrics: &derived.snapshot,
        rows: &rows,
        period_rows: &period_rows,
        thresholds: &settings.thresholds,
    });
    let retailer_scores = scorer::score_retailers(&rows, &settings.scoring);
    let recommendations = recommendations::generate(&RecommendationInput {
        metrics: &derived.snapshot,
        findings: &findings,
        scores: &retailer_scores,
        settings: &settings.recommendations,
    });

    tracing::info!(
        "D402: {} / {}: {} rows, {} findings, {} retailers, {} recommendations",
        brand,
        period,
        rows.len(),
        findings.len(),
        retailer_scores.len(),
        recommendations.len()
    );

    Ok(InsightsReport {
        brand,
        period,
        metrics: derived.snapshot,
        gaps: derived.gaps,
        findings,
        retailer_scores,
        recommendations,
        key_indicators,
    })
}

/// Scorecard with portfolio quadrants, without the rule findings.
pub fn build_scorecard(
    request: &InsightsRequest,
    settings: &InsightsSettings,
) -> Result<RetailerScorecard, InsightsError> {
    let Selection { brand, period } = select(
        request.brand.as_deref(),
        request.period.as_deref(),
        &request.records,
        settings,
    )?;

    let period_rows = selection::period_slice(&request.records, &period);
    let rows = selection::brand_slice(&period_rows, &brand);
    let scores = scorer::score_retailers(&rows, &settings.scoring);
    let portfolio = portfolio::classify(&scores);

    Ok(RetailerScorecard {
        brand,
        period,
        scores,
        portfolio,
    })
}

pub fn build_competitive_landscape(
    request: &CompetitiveLandscapeRequest,
    settings: &InsightsSettings,
) -> Result<CompetitiveLandscape, InsightsError> {
    let Selection { brand, period } = select(
        request.brand.as_deref(),
        request.period.as_deref(),
        &request.records,
        settings,
    )?;

    let period_rows = selection::period_slice(&request.records, &period);
    Ok(competition::competitive_landscape(
        &period_rows,
        &request.geography,
        &period,
        &brand,
        &settings.competition,
    ))
}

pub fn build_promo_analysis(
    request: &PromoAnalysisRequest,
    settings: &InsightsSettings,
) -> Result<PromoAnalysis, InsightsError> {
    let Selection { brand, period } = select(
        request.brand.as_deref(),
        request.period.as_deref(),
        &request.records,
        settings,
    )?;

    Ok(promotions::promo_analysis(
        &request.records,
        &brand,
        &period,
        request.trend_geography.as_deref(),
    ))
}

pub fn build_trend_summary(request: &TrendSummaryRequest, settings: &InsightsSettings) -> TrendSummary {
    trends::summarize_trend(&request.channel, &request.points, &settings.trends)
}

fn select(
    brand: Option<&str>,
    period: Option<&str>,
    records: &[SalesRecord],
    settings: &InsightsSettings,
) -> Result<Selection, InsightsError> {
    selection::validate_records(records)?;
    selection::resolve(brand, period, records, &settings.default_brand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d402_strategic_insights::{
        AlertKind, Finding, Priority, RecommendationCategory, Severity,
    };

    fn request(brand: &str, period: &str, records: Vec<SalesRecord>) -> InsightsRequest {
        InsightsRequest {
            brand: Some(brand.into()),
            period: Some(period.into()),
            records,
        }
    }

    fn market() -> Vec<SalesRecord> {
        vec![
            SalesRecord::new("HUMBLE", "X", "P1", 1_000_000.0)
                .with_growth(0.20)
                .with_acv(70.0)
                .with_units(10_000, 100)
                .with_promo(300_000.0),
            SalesRecord::new("HUMBLE", "Y", "P1", 500_000.0)
                .with_growth(-0.10)
                .with_acv(35.0)
                .with_units(8_000, 50)
                .with_promo(150_000.0),
            SalesRecord::new("RIVAL", "X", "P1", 800_000.0).with_growth(0.40),
            SalesRecord::new("HUMBLE", "X", "P0", 900_000.0).with_growth(0.10),
        ]
    }

    #[test]
    fn test_full_report() {
        let report = build_report(&request("HUMBLE", "P1", market()), &InsightsSettings::default())
            .unwrap();

        assert_eq!(report.metrics.row_count, 2);
        assert_eq!(report.metrics.total_sales, 1_500_000.0);
        assert_eq!(report.retailer_scores.len(), 2);
        assert_eq!(report.retailer_scores[0].retailer, "X");
        assert_eq!(report.retailer_scores[0].priority, Priority::High);
        assert_eq!(report.retailer_scores[1].priority, Priority::Medium);
        assert_eq!(report.key_indicators.len(), 4);

        // avg growth 5%: RIVAL at 40% outgrows by more than 10 points
        assert_eq!(report.threats().count(), 1);
        // strong growth at X (20% > 15%)
        assert_eq!(report.opportunities().count(), 1);

        let categories: Vec<_> = report.recommendations.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![
                RecommendationCategory::RetailerFocus,
                RecommendationCategory::RetailerRisk,
                RecommendationCategory::Distribution,
                RecommendationCategory::CompetitiveResponse,
            ]
        );
    }

    #[test]
    fn test_declining_scenario() {
        let records = vec![
            SalesRecord::new("HUMBLE", "A", "P1", 100.0).with_growth(-0.06),
            SalesRecord::new("HUMBLE", "B", "P1", 100.0).with_growth(-0.10),
        ];
        let report =
            build_report(&request("HUMBLE", "P1", records), &InsightsSettings::default()).unwrap();
        let declining: Vec<_> = report
            .alerts()
            .filter(|a| a.kind == AlertKind::DecliningSales)
            .collect();
        assert_eq!(declining.len(), 1);
        assert_eq!(declining[0].severity, Severity::High);
    }

    #[test]
    fn test_high_promo_scenario() {
        let records = vec![SalesRecord::new("HUMBLE", "A", "P1", 100.0).with_promo(55.0)];
        let report =
            build_report(&request("HUMBLE", "P1", records), &InsightsSettings::default()).unwrap();
        assert!((report.metrics.promo_pct - 55.0).abs() < 1e-9);
        assert!(report.findings.iter().any(|f| matches!(
            f,
            Finding::Alert(a) if a.kind == AlertKind::HighPromoDependency && a.severity == Severity::Medium
        )));
        assert!(!report
            .recommendations
            .iter()
            .any(|r| r.title == "Consider Increased Promotional Activity"));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.title == "Reduce Promotional Dependency"));
    }

    #[test]
    fn test_empty_slice_scenario() {
        let report = build_report(
            &request("HUMBLE", "P9", market()),
            &InsightsSettings::default(),
        )
        .unwrap();
        assert_eq!(report.metrics.total_sales, 0.0);
        assert_eq!(report.metrics.promo_pct, 0.0);
        assert_eq!(report.metrics.avg_growth, None);
        assert!(report.findings.is_empty());
        assert!(report.retailer_scores.is_empty());
        assert!(report.recommendations.is_empty());

        let nothing = build_report(&request("HUMBLE", "P1", Vec::new()), &InsightsSettings::default())
            .unwrap();
        assert!(nothing.findings.is_empty());
    }

    #[test]
    fn test_report_is_idempotent() {
        let settings = InsightsSettings::default();
        let req = request("HUMBLE", "P1", market());
        let first = build_report(&req, &settings).unwrap();
        let second = build_report(&req, &settings).unwrap();
        assert_eq!(first, second);
        for (a, b) in first.retailer_scores.iter().zip(&second.retailer_scores) {
            assert_eq!(a.performance_score.to_bits(), b.performance_score.to_bits());
        }
        assert_eq!(
            first.metrics.total_sales.to_bits(),
            second.metrics.total_sales.to_bits()
        );
    }

    #[test]
    fn test_defaults_brand_and_latest_period() {
        let req = InsightsRequest {
            brand: None,
            period: None,
            records: market(),
        };
        let report = build_report(&req, &InsightsSettings::default()).unwrap();
        assert_eq!(report.brand, "HUMBLE");
        assert_eq!(report.period, "P1");
    }

    #[test]
    fn test_blank_identity_is_a_hard_error() {
        let mut records = market();
        records[2].brand = String::new();
        let result = build_report(&request("HUMBLE", "P1", records), &InsightsSettings::default());
        assert_eq!(
            result.unwrap_err(),
            InsightsError::InvalidRecord {
                index: 2,
                field: "brand"
            }
        );
    }

    #[test]
    fn test_scorecard_and_landscape() {
        let settings = InsightsSettings::default();
        let scorecard = build_scorecard(&request("HUMBLE", "P1", market()), &settings).unwrap();
        assert_eq!(scorecard.scores.len(), 2);
        assert_eq!(scorecard.portfolio.stars, vec!["X"]);
        assert_eq!(scorecard.portfolio.question_marks, vec!["Y"]);

        let landscape = build_competitive_landscape(
            &CompetitiveLandscapeRequest {
                brand: None,
                period: Some("P1".into()),
                geography: "X".into(),
                records: market(),
            },
            &settings,
        )
        .unwrap();
        assert_eq!(landscape.subject_rank, Some(1));
        assert_eq!(landscape.top_brands.len(), 2);
    }

    #[test]
    fn test_promo_analysis_defaults_and_validation() {
        let settings = InsightsSettings::default();
        let analysis = build_promo_analysis(
            &PromoAnalysisRequest {
                brand: None,
                period: None,
                trend_geography: None,
                records: market(),
            },
            &settings,
        )
        .unwrap();
        assert_eq!(analysis.brand, "HUMBLE");
        assert_eq!(analysis.period, "P1");
        let retailers: Vec<_> = analysis.retailers.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(retailers, vec!["X", "Y"]);
        assert_eq!(analysis.summary.promo_pct, 30.0);
        assert_eq!(analysis.trend.len(), 2);

        let mut records = market();
        records[0].geography = " ".into();
        let result = build_promo_analysis(
            &PromoAnalysisRequest {
                brand: None,
                period: None,
                trend_geography: None,
                records,
            },
            &settings,
        );
        assert_eq!(
            result.unwrap_err(),
            InsightsError::InvalidRecord {
                index: 0,
                field: "geography"
            }
        );
    }
}
