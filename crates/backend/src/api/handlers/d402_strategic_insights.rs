use axum::{http::StatusCode, Json};
use chrono::Utc;
use contracts::dashboards::d402_strategic_insights::{
    CompetitiveLandscape, CompetitiveLandscapeRequest, InsightsRequest, InsightsResponse,
    PeriodsRequest, PromoAnalysis, PromoAnalysisRequest, RetailerScorecard, TrendSummary,
    TrendSummaryRequest,
};
use uuid::Uuid;

use crate::dashboards::d402_strategic_insights::{service, InsightsError};
use crate::shared::config::get_config;

fn reject(context: &str, e: InsightsError) -> StatusCode {
    tracing::warn!("D402 Dashboard: {} rejected: {}", context, e);
    StatusCode::UNPROCESSABLE_ENTITY
}

/// POST /api/d402/periods
pub async fn get_available_periods(
    Json(request): Json<PeriodsRequest>,
) -> Result<Json<Vec<String>>, StatusCode> {
    let periods = service::available_periods(&request.records).map_err(|e| reject("periods", e))?;
    tracing::info!("D402 Dashboard: Returning {} available periods", periods.len());
    Ok(Json(periods))
}

/// POST /api/d402/strategic_insights
pub async fn get_strategic_insights(
    Json(request): Json<InsightsRequest>,
) -> Result<Json<InsightsResponse>, StatusCode> {
    tracing::info!(
        "D402 Dashboard: Building insights for brand {:?}, period {:?} from {} records",
        request.brand,
        request.period,
        request.records.len()
    );

    let settings = &get_config().insights;
    let report = service::build_report(&request, settings).map_err(|e| reject("insights", e))?;

    Ok(Json(InsightsResponse {
        report_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        report,
    }))
}

/// POST /api/d402/retailer_scorecard
pub async fn get_retailer_scorecard(
    Json(request): Json<InsightsRequest>,
) -> Result<Json<RetailerScorecard>, StatusCode> {
    let settings = &get_config().insights;
    let scorecard =
        service::build_scorecard(&request, settings).map_err(|e| reject("scorecard", e))?;
    tracing::info!(
        "D402 Dashboard: Returning scorecard with {} retailers for {} / {}",
        scorecard.scores.len(),
        scorecard.brand,
        scorecard.period
    );
    Ok(Json(scorecard))
}

/// POST /api/d402/competitive_landscape
pub async fn get_competitive_landscape(
    Json(request): Json<CompetitiveLandscapeRequest>,
) -> Result<Json<CompetitiveLandscape>, StatusCode> {
    let settings = &get_config().insights;
    let landscape = service::build_competitive_landscape(&request, settings)
        .map_err(|e| reject("competitive landscape", e))?;
    tracing::info!(
        "D402 Dashboard: {} brands at {}",
        landscape.top_brands.len(),
        landscape.geography
    );
    Ok(Json(landscape))
}

/// POST /api/d402/promo_analysis
pub async fn get_promo_analysis(
    Json(request): Json<PromoAnalysisRequest>,
) -> Result<Json<PromoAnalysis>, StatusCode> {
    let settings = &get_config().insights;
    let analysis =
        service::build_promo_analysis(&request, settings).map_err(|e| reject("promo analysis", e))?;
    tracing::info!(
        "D402 Dashboard: Promo analysis for {} / {}: {} retailers, {} trend points",
        analysis.brand,
        analysis.period,
        analysis.retailers.len(),
        analysis.trend.len()
    );
    Ok(Json(analysis))
}

/// POST /api/d402/trend_summary
pub async fn get_trend_summary(Json(request): Json<TrendSummaryRequest>) -> Json<TrendSummary> {
    let settings = &get_config().insights;
    Json(service::build_trend_summary(&request, settings))
}
