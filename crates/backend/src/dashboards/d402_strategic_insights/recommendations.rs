use contracts::dashboards::d402_strategic_insights::{
    Finding, MetricSnapshot, Priority, Recommendation, RecommendationCategory, RetailerScore,
};

use crate::shared::config::RecommendationSettings;

pub struct RecommendationInput<'a> {
    pub metrics: &'a MetricSnapshot,
    pub findings: &'a [Finding],
    /// Scorecard, best first
    pub scores: &'a [RetailerScore],
    pub settings: &'a RecommendationSettings,
}

type RecommendationRule = fn(&RecommendationInput) -> Option<Recommendation>;

const RULES: &[RecommendationRule] = &[
    prioritize_top_retailers,
    address_declining_retailers,
    promo_strategy,
    expand_distribution,
    defend_against_threats,
];

/// Run every rule, then group High → Medium → Low keeping rule order inside a group.
pub fn generate(input: &RecommendationInput) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> =
        RULES.iter().filter_map(|rule| rule(input)).collect();
    recommendations.sort_by_key(|r| r.priority.rank());
    recommendations
}

fn growth_text(growth: Option<f64>) -> String {
    match growth {
        Some(g) => format!("{:.1}%", g * 100.0),
        None => "n/a".into(),
    }
}

pub fn prioritize_top_retailers(input: &RecommendationInput) -> Option<Recommendation> {
    if input.scores.is_empty() {
        return None;
    }
    let actions = input
        .scores
        .iter()
        .take(input.settings.top_retailers)
        .map(|s| {
            format!(
                "{}: score {:.1}, sales {:.0}, growth {}",
                s.retailer,
                s.performance_score,
                s.sales,
                growth_text(s.growth)
            )
        })
        .collect();
    Some(Recommendation {
        category: RecommendationCategory::RetailerFocus,
        priority: Priority::High,
        title: "Prioritize High-Performance Retailers".into(),
        rationale: "These retailers show strong performance and growth momentum.".into(),
        actions,
    })
}

pub fn address_declining_retailers(input: &RecommendationInput) -> Option<Recommendation> {
    let actions: Vec<String> = input
        .scores
        .iter()
        .filter_map(|s| {
            let growth = s.growth?;
            (growth < input.settings.declining_growth)
                .then(|| format!("{}: {:.1}% decline", s.retailer, growth * 100.0))
        })
        .take(input.settings.top_retailers)
        .collect();
    if actions.is_empty() {
        return None;
    }
    Some(Recommendation {
        category: RecommendationCategory::RetailerRisk,
        priority: Priority::High,
        title: "Address Declining Retailers".into(),
        rationale: "Immediate intervention needed to reverse negative trends.".into(),
        actions,
    })
}

/// Too much promo erodes margin, too little leaves sales on the table.
/// Between the two levels nothing is recommended.
pub fn promo_strategy(input: &RecommendationInput) -> Option<Recommendation> {
    let promo_pct = input.metrics.promo_pct;
    let settings = input.settings;

    if promo_pct > settings.reduce_promo_above {
        Some(Recommendation {
            category: RecommendationCategory::PromoStrategy,
            priority: Priority::Medium,
            title: "Reduce Promotional Dependency".into(),
            rationale: "High promotional dependency erodes margins and brand equity.".into(),
            actions: vec![
                format!(
                    "Current promo mix: {:.1}% (target: {:.0}-{:.0}%)",
                    promo_pct, settings.increase_promo_below, settings.reduce_promo_above
                ),
                "Improve everyday shelf presence and visibility".into(),
                "Test premium positioning at select retailers".into(),
            ],
        })
    } else if promo_pct < settings.increase_promo_below {
        Some(Recommendation {
            category: RecommendationCategory::PromoStrategy,
            priority: Priority::Low,
            title: "Consider Increased Promotional Activity".into(),
            rationale: "Limited promotional activity may be leaving sales on the table.".into(),
            actions: vec![
                format!("Current promo mix: {:.1}%", promo_pct),
                "Test targeted promotions at underperforming retailers".into(),
                "Trial sampling programs to drive awareness".into(),
            ],
        })
    } else {
        None
    }
}

pub fn expand_distribution(input: &RecommendationInput) -> Option<Recommendation> {
    let actions: Vec<String> = input
        .scores
        .iter()
        .filter_map(|s| {
            let acv = s.acv?;
            (acv < input.settings.low_acv).then(|| format!("{}: {:.1}% ACV", s.retailer, acv))
        })
        .take(input.settings.top_retailers)
        .collect();
    if actions.is_empty() {
        return None;
    }
    Some(Recommendation {
        category: RecommendationCategory::Distribution,
        priority: Priority::Medium,
        title: "Expand Distribution Coverage".into(),
        rationale: "Low ACV indicates significant white space opportunity.".into(),
        actions,
    })
}

pub fn defend_against_threats(input: &RecommendationInput) -> Option<Recommendation> {
    let mut seen: Vec<&str> = Vec::new();
    let mut actions = Vec::new();
    for finding in input.findings {
        let Finding::Threat(threat) = finding else {
            continue;
        };
        let Some(competitor) = threat.subject.as_deref() else {
            continue;
        };
        if seen.contains(&competitor) {
            continue;
        }
        if seen.len() == input.settings.top_retailers {
            break;
        }
        seen.push(competitor);
        actions.push(format!(
            "{} at {}: growing {:.1}% YoY",
            competitor,
            threat.geography,
            threat.metric * 100.0
        ));
    }
    if actions.is_empty() {
        return None;
    }
    Some(Recommendation {
        category: RecommendationCategory::CompetitiveResponse,
        priority: Priority::Medium,
        title: "Defend Against Competitive Threats".into(),
        rationale: "Fast-growing competitors are taking share where the brand is present.".into(),
        actions,
    })
}
