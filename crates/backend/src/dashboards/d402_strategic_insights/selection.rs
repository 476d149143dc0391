use contracts::dashboards::d402_strategic_insights::SalesRecord;
use std::collections::BTreeSet;

use super::error::InsightsError;

/// Resolved (brand, period) pair a report is built for.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub brand: String,
    pub period: String,
}

/// Reject rows whose identity fields are blank; everything else is trusted.
pub fn validate_records(records: &[SalesRecord]) -> Result<(), InsightsError> {
    for (index, record) in records.iter().enumerate() {
        let identity = [
            ("brand", &record.brand),
            ("geography", &record.geography),
            ("time_period", &record.time_period),
        ];
        for (field, value) in identity {
            if value.trim().is_empty() {
                return Err(InsightsError::InvalidRecord { index, field });
            }
        }
    }
    Ok(())
}

/// Distinct period labels, sorted ascending.
pub fn available_periods(records: &[SalesRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.time_period.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fill in a missing brand with the configured default and a missing period
/// with the latest one present in the records.
pub fn resolve(
    brand: Option<&str>,
    period: Option<&str>,
    records: &[SalesRecord],
    default_brand: &str,
) -> Result<Selection, InsightsError> {
    let brand = match brand.map(str::trim).filter(|b| !b.is_empty()) {
        Some(b) => b.to_string(),
        None if !default_brand.trim().is_empty() => default_brand.trim().to_string(),
        None => return Err(InsightsError::NoBrandSelected),
    };

    let period = match period.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => p.to_string(),
        None => available_periods(records).pop().unwrap_or_default(),
    };

    Ok(Selection { brand, period })
}

/// Every row of one period, all brands.
pub fn period_slice<'a>(records: &'a [SalesRecord], period: &str) -> Vec<&'a SalesRecord> {
    records.iter().filter(|r| r.time_period == period).collect()
}

/// Rows of one brand within an already period-filtered slice.
pub fn brand_slice<'a>(period_rows: &[&'a SalesRecord], brand: &str) -> Vec<&'a SalesRecord> {
    period_rows
        .iter()
        .copied()
        .filter(|r| r.brand == brand)
        .collect()
}
