use contracts::shared::indicators::*;

/// Well-known indicator IDs (constants to avoid typos).
pub mod ids {
    use super::*;

    pub fn total_sales() -> IndicatorId {
        IndicatorId::new("total_sales")
    }
    pub fn avg_growth() -> IndicatorId {
        IndicatorId::new("avg_growth")
    }
    pub fn avg_distribution() -> IndicatorId {
        IndicatorId::new("avg_distribution")
    }
    pub fn promo_mix() -> IndicatorId {
        IndicatorId::new("promo_mix")
    }
}

/// Indicators shown at the top of the strategic insights report.
pub fn executive_summary_ids() -> Vec<IndicatorId> {
    vec![
        ids::total_sales(),
        ids::avg_growth(),
        ids::avg_distribution(),
        ids::promo_mix(),
    ]
}

/// Build the full catalogue of indicators + sets.
pub fn build_catalog() -> IndicatorCatalogResponse {
    let indicators = vec![
        IndicatorMeta {
            id: ids::total_sales(),
            label: "Total Sales".into(),
            short_label: Some("Sales".into()),
            icon: "dollar-sign".into(),
            format: ValueFormat::Money {
                currency: "$".into(),
            },
            description: Some("Sum of dollars for the brand in the selected period".into()),
        },
        IndicatorMeta {
            id: ids::avg_growth(),
            label: "Avg YoY Growth".into(),
            short_label: Some("YoY".into()),
            icon: "trending-up".into(),
            format: ValueFormat::Percent { decimals: 1 },
            description: Some("Mean dollar change vs. year ago across retailers".into()),
        },
        IndicatorMeta {
            id: ids::avg_distribution(),
            label: "Avg Distribution".into(),
            short_label: Some("ACV".into()),
            icon: "store".into(),
            format: ValueFormat::Percent { decimals: 1 },
            description: Some(
                "Mean Max % ACV: share of stores, weighted by size, carrying the product".into(),
            ),
        },
        IndicatorMeta {
            id: ids::promo_mix(),
            label: "Promo Mix".into(),
            short_label: None,
            icon: "tag".into(),
            format: ValueFormat::Percent { decimals: 1 },
            description: Some("Share of dollars sold on promotion".into()),
        },
    ];

    let sets = vec![IndicatorSetMeta {
        id: IndicatorSetId::new("executive_summary"),
        label: "Executive Summary".into(),
        indicators: executive_summary_ids(),
        columns: 4,
    }];

    IndicatorCatalogResponse { indicators, sets }
}
