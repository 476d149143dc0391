use contracts::dashboards::d402_strategic_insights::{BrandShare, CompetitiveLandscape, SalesRecord};
use std::collections::HashMap;

use super::metrics::mean;
use crate::shared::config::CompetitionSettings;

/// Rank every brand selling in `geography` by dollars and by growth.
///
/// Growth leaders only list growing brands and decliners only shrinking
/// ones, so a brand with flat or missing growth appears in neither.
pub fn competitive_landscape(
    period_rows: &[&SalesRecord],
    geography: &str,
    period: &str,
    subject_brand: &str,
    settings: &CompetitionSettings,
) -> CompetitiveLandscape {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut brands: Vec<(String, f64, Vec<f64>)> = Vec::new();

    for row in period_rows.iter().filter(|r| r.geography == geography) {
        let slot = *index.entry(row.brand.as_str()).or_insert_with(|| {
            brands.push((row.brand.clone(), 0.0, Vec::new()));
            brands.len() - 1
        });
        brands[slot].1 += row.dollars;
        brands[slot].2.extend(row.dollars_yoy_change);
    }

    let total_sales: f64 = brands.iter().map(|b| b.1).sum();

    let mut ranked: Vec<BrandShare> = brands
        .into_iter()
        .map(|(brand, dollars, growths)| BrandShare {
            share_pct: if total_sales > 0.0 {
                dollars / total_sales * 100.0
            } else {
                0.0
            },
            brand,
            dollars,
            growth: mean(growths.into_iter()),
        })
        .collect();
    ranked.sort_by(|a, b| b.dollars.total_cmp(&a.dollars));

    let subject_position = ranked.iter().position(|b| b.brand == subject_brand);
    let subject_share_pct = subject_position.map(|i| ranked[i].share_pct);

    let mut growth_leaders: Vec<BrandShare> = ranked
        .iter()
        .filter(|b| b.growth.is_some_and(|g| g > 0.0))
        .cloned()
        .collect();
    growth_leaders.sort_by(|a, b| growth_of(b).total_cmp(&growth_of(a)));
    growth_leaders.truncate(settings.growth_leaders);

    let mut decliners: Vec<BrandShare> = ranked
        .iter()
        .filter(|b| b.growth.is_some_and(|g| g < 0.0))
        .cloned()
        .collect();
    decliners.sort_by(|a, b| growth_of(a).total_cmp(&growth_of(b)));
    decliners.truncate(settings.decliners);

    ranked.truncate(settings.top_brands);

    CompetitiveLandscape {
        geography: geography.to_string(),
        period: period.to_string(),
        total_sales,
        top_brands: ranked,
        growth_leaders,
        decliners,
        subject_rank: subject_position.map(|i| i + 1),
        subject_share_pct,
    }
}

fn growth_of(share: &BrandShare) -> f64 {
    share.growth.unwrap_or(0.0)
}
