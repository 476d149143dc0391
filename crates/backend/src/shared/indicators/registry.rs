use contracts::dashboards::d402_strategic_insights::MetricSnapshot;
use contracts::shared::indicators::*;
use std::collections::HashMap;

use super::compute::summary;
use super::metadata::ids;
use crate::shared::config::InsightsSettings;

type ComputeFn = fn(&MetricSnapshot, &InsightsSettings) -> IndicatorValue;

/// Central registry: maps `IndicatorId` to its compute function.
pub struct IndicatorRegistry {
    fns: HashMap<String, ComputeFn>,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        let mut fns: HashMap<String, ComputeFn> = HashMap::new();

        fns.insert(ids::total_sales().0, summary::compute_total_sales);
        fns.insert(ids::avg_growth().0, summary::compute_avg_growth);
        fns.insert(ids::avg_distribution().0, summary::compute_avg_distribution);
        fns.insert(ids::promo_mix().0, summary::compute_promo_mix);

        Self { fns }
    }

    /// Compute the requested indicators in request order; unknown ids are skipped.
    pub fn compute(
        &self,
        ids: &[IndicatorId],
        snapshot: &MetricSnapshot,
        settings: &InsightsSettings,
    ) -> Vec<IndicatorValue> {
        let mut results = Vec::with_capacity(ids.len());

        for id in ids {
            match self.fns.get(&id.0) {
                Some(compute_fn) => results.push(compute_fn(snapshot, settings)),
                None => tracing::warn!("indicator {} not found in registry", id.0),
            }
        }

        results
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::indicators::metadata::executive_summary_ids;

    #[test]
    fn test_computes_in_request_order_and_skips_unknown() {
        let registry = IndicatorRegistry::new();
        let mut requested = executive_summary_ids();
        requested.insert(1, IndicatorId::new("does_not_exist"));

        let values = registry.compute(
            &requested,
            &MetricSnapshot::default(),
            &InsightsSettings::default(),
        );
        let got: Vec<_> = values.iter().map(|v| v.id.clone()).collect();
        assert_eq!(got, executive_summary_ids());
    }
}
