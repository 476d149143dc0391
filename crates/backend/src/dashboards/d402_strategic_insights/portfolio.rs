use contracts::dashboards::d402_strategic_insights::{
    PortfolioQuadrant, PortfolioSummary, RetailerScore,
};

use super::metrics::median;

/// Place a retailer against the scorecard medians.
/// Missing growth never counts as above-median growth.
pub fn quadrant(score: &RetailerScore, median_sales: f64, median_growth: Option<f64>) -> PortfolioQuadrant {
    let high_sales = score.sales > median_sales;
    let high_growth = matches!(
        (score.growth, median_growth),
        (Some(g), Some(m)) if g > m
    );
    match (high_sales, high_growth) {
        (true, true) => PortfolioQuadrant::Star,
        (true, false) => PortfolioQuadrant::CashCow,
        (false, true) => PortfolioQuadrant::RisingStar,
        (false, false) => PortfolioQuadrant::QuestionMark,
    }
}

/// Split the scorecard into the four growth/size quadrants, keeping score order.
pub fn classify(scores: &[RetailerScore]) -> PortfolioSummary {
    let Some(median_sales) = median(scores.iter().map(|s| s.sales)) else {
        return PortfolioSummary::default();
    };
    let median_growth = median(scores.iter().filter_map(|s| s.growth));

    let mut summary = PortfolioSummary {
        median_sales,
        median_growth,
        ..PortfolioSummary::default()
    };
    for score in scores {
        let bucket = match quadrant(score, median_sales, median_growth) {
            PortfolioQuadrant::Star => &mut summary.stars,
            PortfolioQuadrant::CashCow => &mut summary.cash_cows,
            PortfolioQuadrant::RisingStar => &mut summary.rising_stars,
            PortfolioQuadrant::QuestionMark => &mut summary.question_marks,
        };
        bucket.push(score.retailer.clone());
    }
    summary
}
