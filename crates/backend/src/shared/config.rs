use once_cell::sync::OnceCell;
use serde::Deserialize;

static APP_CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub insights: InsightsSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

/// Everything the insights engine can be tuned with.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InsightsSettings {
    /// Brand analysed when a request does not name one
    pub default_brand: String,
    pub thresholds: ThresholdSettings,
    pub scoring: ScoringSettings,
    pub recommendations: RecommendationSettings,
    pub trends: TrendSettings,
    pub competition: CompetitionSettings,
}

impl Default for InsightsSettings {
    fn default() -> Self {
        Self {
            default_brand: "HUMBLE".into(),
            thresholds: ThresholdSettings::default(),
            scoring: ScoringSettings::default(),
            recommendations: RecommendationSettings::default(),
            trends: TrendSettings::default(),
            competition: CompetitionSettings::default(),
        }
    }
}

/// Cutoffs for alert / opportunity / threat rules.
/// Growth values are fractions, ACV and promo values are percent points.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThresholdSettings {
    pub decline_growth: f64,
    pub high_promo_pct: f64,
    pub distribution_loss_points: f64,
    pub high_growth: f64,
    pub strong_growth_limit: usize,
    pub distribution_gap_acv: f64,
    pub competitor_top_n: usize,
    pub significant_competitor_share: f64,
    pub competitor_outgrowth_margin: f64,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            decline_growth: -0.05,
            high_promo_pct: 50.0,
            distribution_loss_points: -5.0,
            high_growth: 0.15,
            strong_growth_limit: 3,
            distribution_gap_acv: 50.0,
            competitor_top_n: 5,
            significant_competitor_share: 0.5,
            competitor_outgrowth_margin: 0.10,
        }
    }
}

/// Retailer performance score: weighted sales and growth, bucketed into tiers.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScoringSettings {
    pub sales_weight: f64,
    pub growth_weight: f64,
    /// Growth is clamped to +/- this fraction before scoring
    pub growth_clip: f64,
    pub high_cutoff: f64,
    /// Medium/Low boundary. Some dashboards used 50 here.
    pub medium_cutoff: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            sales_weight: 0.7,
            growth_weight: 0.3,
            growth_clip: 0.5,
            high_cutoff: 70.0,
            medium_cutoff: 40.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RecommendationSettings {
    /// How many retailers a recommendation names at most
    pub top_retailers: usize,
    pub declining_growth: f64,
    pub reduce_promo_above: f64,
    pub increase_promo_below: f64,
    pub low_acv: f64,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            top_retailers: 3,
            declining_growth: -0.05,
            reduce_promo_above: 40.0,
            increase_promo_below: 20.0,
            low_acv: 50.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TrendSettings {
    /// Number of periods compared at each end of the series
    pub window: usize,
    pub accelerating_pct: f64,
    pub slowing_pct: f64,
    pub low_volatility_pct: f64,
    pub moderate_volatility_pct: f64,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            window: 12,
            accelerating_pct: 10.0,
            slowing_pct: -10.0,
            low_volatility_pct: 10.0,
            moderate_volatility_pct: 20.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CompetitionSettings {
    pub top_brands: usize,
    pub growth_leaders: usize,
    pub decliners: usize,
}

impl Default for CompetitionSettings {
    fn default() -> Self {
        Self {
            top_brands: 20,
            growth_leaders: 10,
            decliners: 10,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[insights]
default_brand = "HUMBLE"

[insights.scoring]
sales_weight = 0.7
growth_weight = 0.3
high_cutoff = 70.0
medium_cutoff = 40.0
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    let scoring = &config.insights.scoring;
    if scoring.medium_cutoff > scoring.high_cutoff {
        anyhow::bail!(
            "insights.scoring: medium_cutoff ({}) is above high_cutoff ({})",
            scoring.medium_cutoff,
            scoring.high_cutoff
        );
    }
    if scoring.growth_clip <= 0.0 {
        anyhow::bail!("insights.scoring: growth_clip must be positive");
    }
    Ok(config)
}

/// Load the configuration once at startup.
pub fn initialize_config() -> anyhow::Result<&'static Config> {
    let config = load_config()?;
    Ok(APP_CONFIG.get_or_init(|| config))
}

/// Process-wide configuration; the embedded defaults until `initialize_config` runs.
pub fn get_config() -> &'static Config {
    APP_CONFIG.get_or_init(Config::default)
}
