use contracts::dashboards::d402_strategic_insights::{Priority, RetailerScore, SalesRecord};
use std::collections::HashMap;

use super::metrics::mean;
use crate::shared::config::ScoringSettings;

/// Per-retailer aggregation of the subject rows.
#[derive(Debug, Default)]
struct RetailerAgg {
    retailer: String,
    sales: f64,
    growths: Vec<f64>,
    units: i64,
    acvs: Vec<f64>,
    tdp: f64,
    promo: f64,
    stores: i64,
}

/// Score every retailer (geography) in the slice, best first.
///
/// `performance = sales_weight * sales_score + growth_weight * growth_score`
/// where `sales_score` is relative to the best-selling retailer and
/// `growth_score` maps clipped growth linearly onto 0..100.
pub fn score_retailers(rows: &[&SalesRecord], settings: &ScoringSettings) -> Vec<RetailerScore> {
    let aggregates = aggregate_by_retailer(rows);

    let max_sales = aggregates.iter().map(|a| a.sales).fold(0.0_f64, f64::max);

    let mut scores: Vec<RetailerScore> = aggregates
        .into_iter()
        .map(|agg| {
            let growth = mean(agg.growths.iter().copied());
            let sales_score = sales_score(agg.sales, max_sales);
            let growth_score = growth_score(growth, settings.growth_clip);
            let performance_score =
                settings.sales_weight * sales_score + settings.growth_weight * growth_score;
            let promo_pct = if agg.sales > 0.0 {
                agg.promo / agg.sales * 100.0
            } else {
                0.0
            };

            RetailerScore {
                retailer: agg.retailer,
                sales: agg.sales,
                growth,
                sales_score,
                growth_score,
                performance_score,
                priority: priority_tier(performance_score, settings),
                units: agg.units,
                acv: mean(agg.acvs.iter().copied()),
                tdp: agg.tdp,
                promo_pct,
                stores: agg.stores,
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        b.performance_score
            .total_cmp(&a.performance_score)
            .then(b.sales.total_cmp(&a.sales))
    });
    scores
}

/// Share of the best retailer's sales, 0..100; all zero when nobody sold.
pub fn sales_score(sales: f64, max_sales: f64) -> f64 {
    if max_sales > 0.0 {
        (sales / max_sales * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// `(clamp(growth, -clip, clip) + clip) / (2 * clip) * 100`.
/// A retailer without growth data sits at the neutral midpoint.
pub fn growth_score(growth: Option<f64>, clip: f64) -> f64 {
    let clipped = growth.filter(|g| g.is_finite()).unwrap_or(0.0).clamp(-clip, clip);
    (clipped + clip) / (2.0 * clip) * 100.0
}

pub fn priority_tier(score: f64, settings: &ScoringSettings) -> Priority {
    if score >= settings.high_cutoff {
        Priority::High
    } else if score >= settings.medium_cutoff {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn aggregate_by_retailer(rows: &[&SalesRecord]) -> Vec<RetailerAgg> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut aggregates: Vec<RetailerAgg> = Vec::new();

    for row in rows {
        let slot = *index.entry(row.geography.as_str()).or_insert_with(|| {
            aggregates.push(RetailerAgg {
                retailer: row.geography.clone(),
                ..RetailerAgg::default()
            });
            aggregates.len() - 1
        });
        let agg = &mut aggregates[slot];
        agg.sales += row.dollars;
        agg.units = agg.units.saturating_add(row.units);
        agg.tdp += row.tdp;
        agg.promo += row.promo_dollars;
        agg.stores = agg.stores.saturating_add(row.stores_selling);
        agg.growths.extend(row.dollars_yoy_change);
        agg.acvs.extend(row.max_acv);
    }

    aggregates
}
