use contracts::dashboards::d402_strategic_insights::{PromoAnalysis, PromoMix, SalesRecord};
use std::collections::HashMap;

use super::metrics::sum_counts;
use super::selection;

/// Promo split of the selected (brand, period) slice, per retailer, plus the
/// brand's promo mix across every period in the record set.
pub fn promo_analysis(
    records: &[SalesRecord],
    brand: &str,
    period: &str,
    trend_geography: Option<&str>,
) -> PromoAnalysis {
    let period_rows = selection::period_slice(records, period);
    let rows = selection::brand_slice(&period_rows, brand);

    let trend = selection::available_periods(records)
        .into_iter()
        .filter_map(|label| {
            let points: Vec<&SalesRecord> = records
                .iter()
                .filter(|r| r.brand == brand && r.time_period == label)
                .filter(|r| trend_geography.map_or(true, |g| r.geography == g))
                .collect();
            (!points.is_empty()).then(|| promo_mix(label, &points))
        })
        .collect();

    PromoAnalysis {
        brand: brand.to_string(),
        period: period.to_string(),
        summary: promo_mix(period.to_string(), &rows),
        retailers: by_retailer(&rows),
        trend,
    }
}

/// One row per retailer, highest dollars first; ties keep first appearance.
pub fn by_retailer(rows: &[&SalesRecord]) -> Vec<PromoMix> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&SalesRecord>)> = Vec::new();

    for row in rows {
        let slot = *index.entry(row.geography.as_str()).or_insert_with(|| {
            groups.push((row.geography.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(row);
    }

    let mut mixes: Vec<PromoMix> = groups
        .into_iter()
        .map(|(retailer, group)| promo_mix(retailer.to_string(), &group))
        .collect();
    mixes.sort_by(|a, b| b.dollars.total_cmp(&a.dollars));
    mixes
}

pub fn promo_mix(label: String, rows: &[&SalesRecord]) -> PromoMix {
    let dollars: f64 = rows.iter().map(|r| r.dollars).sum();
    let promo_dollars: f64 = rows.iter().map(|r| r.promo_dollars).sum();
    let non_promo_dollars: f64 = rows.iter().map(|r| r.non_promo_dollars).sum();
    let units = sum_counts(rows.iter().map(|r| r.units));
    let promo_units: f64 = rows.iter().map(|r| r.promo_units).sum();

    PromoMix {
        label,
        dollars,
        promo_dollars,
        non_promo_dollars,
        promo_pct: share_pct(promo_dollars, dollars),
        units,
        promo_units,
        units_promo_pct: share_pct(promo_units, units as f64),
    }
}

fn share_pct(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}
