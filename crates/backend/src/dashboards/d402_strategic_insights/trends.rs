use contracts::dashboards::d402_strategic_insights::{
    TrendDirection, TrendPoint, TrendSummary, VolatilityLevel,
};

use super::metrics::mean;
use crate::shared::config::TrendSettings;

/// Compare the last `window` periods of a channel series with the first ones
/// and measure how noisy the whole series is.
pub fn summarize_trend(channel: &str, points: &[TrendPoint], settings: &TrendSettings) -> TrendSummary {
    let window = settings.window.max(1);
    if points.len() < window {
        return TrendSummary {
            channel: channel.to_string(),
            points: points.len(),
            direction_pct: None,
            direction: None,
            volatility_pct: None,
            volatility: None,
        };
    }

    let dollars: Vec<f64> = points.iter().map(|p| p.dollars).collect();
    let prior = mean(dollars[..window].iter().copied()).unwrap_or(0.0);
    let recent = mean(dollars[dollars.len() - window..].iter().copied()).unwrap_or(0.0);
    let direction_pct = if prior > 0.0 {
        (recent - prior) / prior * 100.0
    } else {
        0.0
    };

    let volatility_pct = coefficient_of_variation(&dollars);

    TrendSummary {
        channel: channel.to_string(),
        points: points.len(),
        direction_pct: Some(direction_pct),
        direction: Some(classify_direction(direction_pct, settings)),
        volatility_pct: Some(volatility_pct),
        volatility: Some(classify_volatility(volatility_pct, settings)),
    }
}

pub fn classify_direction(pct: f64, settings: &TrendSettings) -> TrendDirection {
    if pct > settings.accelerating_pct {
        TrendDirection::Accelerating
    } else if pct > 0.0 {
        TrendDirection::Stable
    } else if pct > settings.slowing_pct {
        TrendDirection::Slowing
    } else {
        TrendDirection::Declining
    }
}

pub fn classify_volatility(pct: f64, settings: &TrendSettings) -> VolatilityLevel {
    if pct < settings.low_volatility_pct {
        VolatilityLevel::Low
    } else if pct < settings.moderate_volatility_pct {
        VolatilityLevel::Moderate
    } else {
        VolatilityLevel::High
    }
}

/// Sample standard deviation over the mean, in percent; 0 for a flat or
/// single-point series or a non-positive mean.
fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let Some(avg) = mean(values.iter().copied()) else {
        return 0.0;
    };
    if avg <= 0.0 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt() / avg * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<TrendPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| TrendPoint {
                period: format!("W{:02}", i + 1),
                dollars: *v,
            })
            .collect()
    }

    #[test]
    fn test_short_series_is_unclassified() {
        let summary = summarize_trend("NATURAL", &series(&[1.0; 11]), &TrendSettings::default());
        assert_eq!(summary.points, 11);
        assert_eq!(summary.direction, None);
        assert_eq!(summary.volatility, None);
    }

    #[test]
    fn test_flat_series() {
        let summary = summarize_trend("NATURAL", &series(&[100.0; 24]), &TrendSettings::default());
        assert_eq!(summary.direction_pct, Some(0.0));
        assert_eq!(summary.direction, Some(TrendDirection::Slowing));
        assert_eq!(summary.volatility_pct, Some(0.0));
        assert_eq!(summary.volatility, Some(VolatilityLevel::Low));
    }

    #[test]
    fn test_accelerating_series() {
        let mut values = vec![100.0; 12];
        values.extend(vec![150.0; 12]);
        let summary = summarize_trend("NATURAL", &series(&values), &TrendSettings::default());
        assert_eq!(summary.direction_pct, Some(50.0));
        assert_eq!(summary.direction, Some(TrendDirection::Accelerating));
        // std of a 50/50 split of 100 and 150 is ~25.5 around a mean of 125
        assert_eq!(summary.volatility, Some(VolatilityLevel::High));
    }

    #[test]
    fn test_direction_bands() {
        let settings = TrendSettings::default();
        assert_eq!(classify_direction(5.0, &settings), TrendDirection::Stable);
        assert_eq!(classify_direction(-5.0, &settings), TrendDirection::Slowing);
        assert_eq!(classify_direction(-10.0, &settings), TrendDirection::Declining);
        assert_eq!(classify_volatility(15.0, &settings), VolatilityLevel::Moderate);
    }

    #[test]
    fn test_zero_prior_guard() {
        let mut values = vec![0.0; 12];
        values.extend(vec![10.0; 12]);
        let summary = summarize_trend("NATURAL", &series(&values), &TrendSettings::default());
        assert_eq!(summary.direction_pct, Some(0.0));
    }
}
