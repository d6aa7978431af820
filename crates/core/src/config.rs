use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CAMPAIGN_LIFT__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_historic_path")]
    pub historic_path: String,
    #[serde(default = "default_brand_lift_path")]
    pub brand_lift_path: String,
    #[serde(default = "default_creative_path")]
    pub creative_path: String,
    /// Decision threshold passed to the significance tester.
    #[serde(default = "default_significance_alpha")]
    pub significance_alpha: f64,
    #[serde(default)]
    pub on_invalid_row: InvalidRowPolicy,
}

/// What the pipeline does with a row that fails an integrity check
/// during significance testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRowPolicy {
    /// Fail the whole run on the first invalid row.
    #[default]
    Abort,
    /// Drop the row, count it in the quality summary, keep going.
    Skip,
}

fn default_historic_path() -> String {
    "data/historic_campaigns.csv".to_string()
}
fn default_brand_lift_path() -> String {
    "data/brand_lift_results.csv".to_string()
}
fn default_creative_path() -> String {
    "data/creative_performance.csv".to_string()
}
fn default_significance_alpha() -> f64 {
    crate::SIGNIFICANCE_ALPHA
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            historic_path: default_historic_path(),
            brand_lift_path: default_brand_lift_path(),
            creative_path: default_creative_path(),
            significance_alpha: default_significance_alpha(),
            on_invalid_row: InvalidRowPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CAMPAIGN_LIFT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
