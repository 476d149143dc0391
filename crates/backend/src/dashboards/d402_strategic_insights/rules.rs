//! Threshold rules turning a slice into alerts, opportunities and threats.
//!
//! Each rule is an independent function over [`RuleInput`]; [`evaluate`]
//! runs all of them in [`RULES`] order and concatenates their findings.
//! A row lacking the value a rule needs is skipped by that rule only.

use contracts::dashboards::d402_strategic_insights::{
    Alert, AlertKind, Finding, MetricSnapshot, Opportunity, OpportunityKind, SalesRecord,
    Severity, Threat,
};

use super::metrics::median;
use crate::shared::config::ThresholdSettings;

pub struct RuleInput<'a> {
    /// Subject brand
    pub brand: &'a str,
    pub metrics: &'a MetricSnapshot,
    /// Subject brand rows for the period
    pub rows: &'a [&'a SalesRecord],
    /// All brands for the period, used for competitor comparisons
    pub period_rows: &'a [&'a SalesRecord],
    pub thresholds: &'a ThresholdSettings,
}

type Rule = fn(&RuleInput) -> Vec<Finding>;

pub const RULES: &[(&str, Rule)] = &[
    ("declining_sales", declining_sales),
    ("high_promo_dependency", high_promo_dependency),
    ("distribution_loss", distribution_loss),
    ("strong_growth", strong_growth),
    ("distribution_gap", distribution_gap),
    ("competitor_gaining_share", competitor_gaining_share),
];

pub fn evaluate(input: &RuleInput) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (name, rule) in RULES {
        let produced = rule(input);
        tracing::debug!("rule {}: {} findings", name, produced.len());
        findings.extend(produced);
    }
    findings
}

pub fn declining_sales(input: &RuleInput) -> Vec<Finding> {
    match input.metrics.avg_growth {
        Some(growth) if growth < input.thresholds.decline_growth => vec![Finding::Alert(Alert {
            kind: AlertKind::DecliningSales,
            severity: Severity::High,
            title: "Declining Sales Trend".into(),
            description: format!(
                "Sales are down {:.1}% YoY. Immediate action required.",
                growth.abs() * 100.0
            ),
            metric: growth,
            subject: None,
        })],
        _ => Vec::new(),
    }
}

pub fn high_promo_dependency(input: &RuleInput) -> Vec<Finding> {
    let promo_pct = input.metrics.promo_pct;
    if promo_pct <= input.thresholds.high_promo_pct {
        return Vec::new();
    }
    vec![Finding::Alert(Alert {
        kind: AlertKind::HighPromoDependency,
        severity: Severity::Medium,
        title: "High Promotional Dependency".into(),
        description: format!(
            "{:.1}% of sales come from promotions. Risk of margin erosion.",
            promo_pct
        ),
        metric: promo_pct,
        subject: None,
    })]
}

pub fn distribution_loss(input: &RuleInput) -> Vec<Finding> {
    input
        .rows
        .iter()
        .filter_map(|row| {
            let change = row.max_acv_change_yoy?;
            if change >= input.thresholds.distribution_loss_points {
                return None;
            }
            Some(Finding::Alert(Alert {
                kind: AlertKind::DistributionLoss,
                severity: Severity::High,
                title: format!("Distribution Loss at {}", row.geography),
                description: format!("ACV dropped by {:.1} points.", change.abs()),
                metric: change,
                subject: Some(row.geography.clone()),
            }))
        })
        .collect()
}

pub fn strong_growth(input: &RuleInput) -> Vec<Finding> {
    let mut growing: Vec<(&SalesRecord, f64)> = input
        .rows
        .iter()
        .filter_map(|row| {
            let growth = row.dollars_yoy_change?;
            (growth > input.thresholds.high_growth).then_some((*row, growth))
        })
        .collect();
    // stable: equal growth keeps row order
    growing.sort_by(|a, b| b.1.total_cmp(&a.1));

    growing
        .into_iter()
        .take(input.thresholds.strong_growth_limit)
        .map(|(row, growth)| {
            Finding::Opportunity(Opportunity {
                kind: OpportunityKind::StrongGrowth,
                title: format!("Strong Growth at {}", row.geography),
                description: format!(
                    "Sales up {:.1}% YoY. Consider increasing investment.",
                    growth * 100.0
                ),
                metric: growth,
                subject: Some(row.geography.clone()),
                action: format!(
                    "Expand distribution or promotional support at {}",
                    row.geography
                ),
            })
        })
        .collect()
}

/// Low ACV where the product already sells well per store.
pub fn distribution_gap(input: &RuleInput) -> Vec<Finding> {
    let Some(median_sales) = median(input.rows.iter().map(|r| r.dollars)) else {
        return Vec::new();
    };
    let slice_velocity = input.metrics.velocity;

    input
        .rows
        .iter()
        .filter_map(|row| {
            let acv = row.max_acv?;
            let velocity = row.velocity();
            let is_gap = acv < input.thresholds.distribution_gap_acv
                && row.dollars > median_sales
                && velocity > slice_velocity;
            if !is_gap {
                return None;
            }
            Some(Finding::Opportunity(Opportunity {
                kind: OpportunityKind::DistributionGap,
                title: format!("Distribution Gap at {}", row.geography),
                description: format!(
                    "Strong velocity ({:.1} units/store) but only {:.1}% ACV.",
                    velocity, acv
                ),
                metric: acv,
                subject: Some(row.geography.clone()),
                action: format!("Negotiate expanded distribution at {}", row.geography),
            }))
        })
        .collect()
}

pub fn competitor_gaining_share(input: &RuleInput) -> Vec<Finding> {
    let Some(avg_growth) = input.metrics.avg_growth else {
        return Vec::new();
    };
    let t = input.thresholds;
    let mut findings = Vec::new();

    let mut geographies: Vec<&str> = Vec::new();
    for row in input.rows {
        if !geographies.contains(&row.geography.as_str()) {
            geographies.push(&row.geography);
        }
    }

    for geo in geographies {
        let subject_sales: f64 = input
            .rows
            .iter()
            .filter(|r| r.geography == geo)
            .map(|r| r.dollars)
            .sum();

        let mut competitors: Vec<&SalesRecord> = input
            .period_rows
            .iter()
            .copied()
            .filter(|r| r.geography == geo && r.brand != input.brand)
            .collect();
        competitors.sort_by(|a, b| b.dollars.total_cmp(&a.dollars));

        for comp in competitors.into_iter().take(t.competitor_top_n) {
            let Some(growth) = comp.dollars_yoy_change else {
                continue;
            };
            let outgrowing = growth > avg_growth + t.competitor_outgrowth_margin;
            let significant = comp.dollars >= subject_sales * t.significant_competitor_share;
            if outgrowing && significant {
                findings.push(Finding::Threat(Threat {
                    title: format!("{} Gaining Share", comp.brand),
                    description: format!(
                        "Growing {:.1}% YoY at {}, faster than {}.",
                        growth * 100.0,
                        geo,
                        input.brand
                    ),
                    metric: growth,
                    subject: Some(comp.brand.clone()),
                    geography: geo.to_string(),
                }));
            }
        }
    }

    findings
}
