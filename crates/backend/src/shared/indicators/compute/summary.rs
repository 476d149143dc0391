use contracts::dashboards::d402_strategic_insights::MetricSnapshot;
use contracts::shared::indicators::*;

use crate::shared::config::InsightsSettings;
use crate::shared::indicators::metadata::ids;

fn status_by_growth(growth: Option<f64>, decline: f64) -> IndicatorStatus {
    match growth {
        Some(g) if g > 0.0 => IndicatorStatus::Good,
        Some(g) if g < decline => IndicatorStatus::Bad,
        _ => IndicatorStatus::Neutral,
    }
}

fn as_percent(fraction: Option<f64>) -> Option<f64> {
    fraction.map(|f| f * 100.0)
}

// ---------------------------------------------------------------------------
// Public compute functions
// ---------------------------------------------------------------------------

pub fn compute_total_sales(m: &MetricSnapshot, settings: &InsightsSettings) -> IndicatorValue {
    IndicatorValue {
        id: ids::total_sales(),
        value: Some(m.total_sales),
        change_percent: as_percent(m.sales_change),
        status: status_by_growth(m.sales_change, settings.thresholds.decline_growth),
        subtitle: None,
    }
}

pub fn compute_avg_growth(m: &MetricSnapshot, settings: &InsightsSettings) -> IndicatorValue {
    IndicatorValue {
        id: ids::avg_growth(),
        value: as_percent(m.avg_growth),
        change_percent: None,
        status: status_by_growth(m.avg_growth, settings.thresholds.decline_growth),
        subtitle: m.avg_growth.is_none().then(|| "No growth data".to_string()),
    }
}

pub fn compute_avg_distribution(m: &MetricSnapshot, settings: &InsightsSettings) -> IndicatorValue {
    let status = match m.avg_acv {
        Some(acv) if acv < settings.recommendations.low_acv => IndicatorStatus::Warning,
        _ => IndicatorStatus::Neutral,
    };
    IndicatorValue {
        id: ids::avg_distribution(),
        value: m.avg_acv,
        change_percent: None,
        status,
        subtitle: m.avg_acv.is_none().then(|| "No ACV data".to_string()),
    }
}

pub fn compute_promo_mix(m: &MetricSnapshot, settings: &InsightsSettings) -> IndicatorValue {
    let status = if m.promo_pct > settings.recommendations.reduce_promo_above {
        IndicatorStatus::Warning
    } else {
        IndicatorStatus::Neutral
    };
    IndicatorValue {
        id: ids::promo_mix(),
        value: Some(m.promo_pct),
        change_percent: None,
        status,
        subtitle: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_status() {
        let settings = InsightsSettings::default();
        let mut m = MetricSnapshot {
            avg_growth: Some(0.04),
            ..MetricSnapshot::default()
        };
        assert_eq!(compute_avg_growth(&m, &settings).status, IndicatorStatus::Good);
        m.avg_growth = Some(-0.02);
        assert_eq!(compute_avg_growth(&m, &settings).status, IndicatorStatus::Neutral);
        m.avg_growth = Some(-0.08);
        assert_eq!(compute_avg_growth(&m, &settings).status, IndicatorStatus::Bad);
        m.avg_growth = None;
        let value = compute_avg_growth(&m, &settings);
        assert_eq!(value.value, None);
        assert!(value.subtitle.is_some());
    }

    #[test]
    fn test_total_sales_change_uses_weighted_change() {
        let settings = InsightsSettings::default();
        let m = MetricSnapshot {
            total_sales: 1150.0,
            avg_growth: Some(-0.20),
            sales_change: Some(0.05),
            ..MetricSnapshot::default()
        };
        let value = compute_total_sales(&m, &settings);
        assert_eq!(value.change_percent, Some(5.0));
        assert_eq!(value.status, IndicatorStatus::Good);

        let unknown = compute_total_sales(&MetricSnapshot::default(), &settings);
        assert_eq!(unknown.change_percent, None);
        assert_eq!(unknown.status, IndicatorStatus::Neutral);
    }

    #[test]
    fn test_promo_mix_warning() {
        let settings = InsightsSettings::default();
        let m = MetricSnapshot {
            promo_pct: 45.0,
            ..MetricSnapshot::default()
        };
        assert_eq!(compute_promo_mix(&m, &settings).status, IndicatorStatus::Warning);
    }
}
