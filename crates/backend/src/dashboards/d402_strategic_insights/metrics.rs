use contracts::dashboards::d402_strategic_insights::{MetricGap, MetricSnapshot, SalesRecord};

/// Snapshot plus the metrics that could not be derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedMetrics {
    pub snapshot: MetricSnapshot,
    pub gaps: Vec<MetricGap>,
}

/// Aggregate one (brand, period) slice.
pub fn derive_metrics(rows: &[&SalesRecord]) -> DerivedMetrics {
    let total_sales: f64 = rows.iter().map(|r| r.dollars).sum();
    let total_units = sum_counts(rows.iter().map(|r| r.units));
    let total_promo_sales: f64 = rows.iter().map(|r| r.promo_dollars).sum();
    let total_stores = sum_counts(rows.iter().map(|r| r.stores_selling));

    let avg_growth = mean(rows.iter().filter_map(|r| r.dollars_yoy_change));
    let avg_acv = mean(rows.iter().filter_map(|r| r.max_acv));
    let sales_change = weighted_sales_change(rows);

    let promo_pct = if total_sales > 0.0 {
        (total_promo_sales / total_sales * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let velocity = if total_stores > 0 {
        total_units as f64 / total_stores as f64
    } else {
        0.0
    };

    let mut gaps = Vec::new();
    if avg_growth.is_none() {
        gaps.push(MetricGap::InsufficientGrowthData);
    }
    if avg_acv.is_none() {
        gaps.push(MetricGap::InsufficientAcvData);
    }

    DerivedMetrics {
        snapshot: MetricSnapshot {
            row_count: rows.len(),
            total_sales,
            total_units,
            total_promo_sales,
            avg_growth,
            sales_change,
            avg_acv,
            promo_pct,
            velocity,
        },
        gaps,
    }
}

/// Change of the slice's dollars against the year-ago dollars implied by each
/// row's growth. Rows without growth, or with growth at or below -100%, are
/// left out of both sides.
pub fn weighted_sales_change(rows: &[&SalesRecord]) -> Option<f64> {
    let (current, prior) = rows
        .iter()
        .filter_map(|r| {
            let growth = r.dollars_yoy_change.filter(|g| g.is_finite() && *g > -1.0)?;
            Some((r.dollars, r.dollars / (1.0 + growth)))
        })
        .fold((0.0, 0.0), |(c, p), (dc, dp)| (c + dc, p + dp));
    (prior > 0.0).then(|| (current - prior) / prior)
}

/// Count total that saturates instead of overflowing on absurd inputs.
pub fn sum_counts(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0, i64::saturating_add)
}

/// Arithmetic mean over finite values; `None` when there are none.
pub fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Median over finite values, averaging the two middle ones for even counts.
pub fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_and_averages() {
        let rows = vec![
            SalesRecord::new("HUMBLE", "KROGER", "P1", 1000.0)
                .with_growth(0.10)
                .with_acv(40.0)
                .with_units(100, 10)
                .with_promo(300.0),
            SalesRecord::new("HUMBLE", "SPROUTS", "P1", 500.0)
                .with_growth(-0.20)
                .with_units(50, 40)
                .with_promo(200.0),
        ];
        let refs: Vec<&SalesRecord> = rows.iter().collect();
        let derived = derive_metrics(&refs);
        let s = &derived.snapshot;

        assert_eq!(s.row_count, 2);
        assert_eq!(s.total_sales, 1500.0);
        assert_eq!(s.total_units, 150);
        assert!((s.avg_growth.unwrap() - (-0.05)).abs() < 1e-12);
        // Missing ACV is excluded, not counted as zero
        assert_eq!(s.avg_acv, Some(40.0));
        assert!((s.promo_pct - 500.0 / 1500.0 * 100.0).abs() < 1e-9);
        assert_eq!(s.velocity, 3.0);
        assert!(derived.gaps.is_empty());
    }

    #[test]
    fn test_missing_growth_is_a_gap_not_zero() {
        let rows = vec![SalesRecord::new("HUMBLE", "KROGER", "P1", 1000.0).with_acv(60.0)];
        let refs: Vec<&SalesRecord> = rows.iter().collect();
        let derived = derive_metrics(&refs);
        assert_eq!(derived.snapshot.avg_growth, None);
        assert_eq!(derived.gaps, vec![MetricGap::InsufficientGrowthData]);
    }

    #[test]
    fn test_zero_sales_guards_promo_pct() {
        let rows = vec![SalesRecord::new("HUMBLE", "KROGER", "P1", 0.0).with_promo(0.0)];
        let refs: Vec<&SalesRecord> = rows.iter().collect();
        let derived = derive_metrics(&refs);
        assert_eq!(derived.snapshot.promo_pct, 0.0);
        assert_eq!(derived.snapshot.velocity, 0.0);
    }

    #[test]
    fn test_promo_pct_clamped_on_inconsistent_input() {
        let over = vec![SalesRecord::new("HUMBLE", "KROGER", "P1", 100.0).with_promo(250.0)];
        let refs: Vec<&SalesRecord> = over.iter().collect();
        assert_eq!(derive_metrics(&refs).snapshot.promo_pct, 100.0);

        let negative = vec![SalesRecord::new("HUMBLE", "KROGER", "P1", 100.0).with_promo(-30.0)];
        let refs: Vec<&SalesRecord> = negative.iter().collect();
        assert_eq!(derive_metrics(&refs).snapshot.promo_pct, 0.0);
    }

    #[test]
    fn test_counts_saturate() {
        let rows = vec![
            SalesRecord::new("HUMBLE", "KROGER", "P1", 1.0).with_units(i64::MAX, i64::MAX),
            SalesRecord::new("HUMBLE", "SPROUTS", "P1", 1.0).with_units(10, 10),
        ];
        let refs: Vec<&SalesRecord> = rows.iter().collect();
        let s = derive_metrics(&refs).snapshot;
        assert_eq!(s.total_units, i64::MAX);
        assert_eq!(s.velocity, 1.0);
    }

    #[test]
    fn test_sales_change_is_dollar_weighted() {
        // year-ago: 1000 + 100 = 1100, now: 1100 + 50 = 1150
        let rows = vec![
            SalesRecord::new("HUMBLE", "KROGER", "P1", 1100.0).with_growth(0.10),
            SalesRecord::new("HUMBLE", "SPROUTS", "P1", 50.0).with_growth(-0.50),
            SalesRecord::new("HUMBLE", "NEW", "P1", 999.0),
        ];
        let refs: Vec<&SalesRecord> = rows.iter().collect();
        let s = derive_metrics(&refs).snapshot;
        assert!((s.sales_change.unwrap() - 50.0 / 1100.0).abs() < 1e-12);
        assert!((s.avg_growth.unwrap() - (-0.20)).abs() < 1e-12);

        let wiped = vec![SalesRecord::new("HUMBLE", "KROGER", "P1", 0.0).with_growth(-1.0)];
        let refs: Vec<&SalesRecord> = wiped.iter().collect();
        assert_eq!(weighted_sales_change(&refs), None);
    }

    #[test]
    fn test_empty_slice() {
        let derived = derive_metrics(&[]);
        assert_eq!(derived.snapshot, MetricSnapshot::default());
        assert_eq!(derived.gaps.len(), 2);
    }

    #[test]
    fn test_median() {
        assert_eq!(median([3.0, 1.0, 2.0].into_iter()), Some(2.0));
        assert_eq!(median([4.0, 1.0, 2.0, 3.0].into_iter()), Some(2.5));
        assert_eq!(median(std::iter::empty()), None);
    }
}
