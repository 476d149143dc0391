use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D402 STRATEGIC INSIGHTS
        // ========================================
        .route(
            "/api/d402/periods",
            post(handlers::d402_strategic_insights::get_available_periods),
        )
        .route(
            "/api/d402/strategic_insights",
            post(handlers::d402_strategic_insights::get_strategic_insights),
        )
        .route(
            "/api/d402/retailer_scorecard",
            post(handlers::d402_strategic_insights::get_retailer_scorecard),
        )
        .route(
            "/api/d402/competitive_landscape",
            post(handlers::d402_strategic_insights::get_competitive_landscape),
        )
        .route(
            "/api/d402/promo_analysis",
            post(handlers::d402_strategic_insights::get_promo_analysis),
        )
        .route(
            "/api/d402/trend_summary",
            post(handlers::d402_strategic_insights::get_trend_summary),
        )
        // ========================================
        // INDICATORS
        // ========================================
        .route(
            "/api/indicators/meta",
            get(handlers::indicators::get_indicator_catalog),
        )
}
