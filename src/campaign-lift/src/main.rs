//! Campaign Lift — campaign efficiency and brand-lift effectiveness
//! metrics from historic spend, brand-lift study, and creative
//! performance tables.

use clap::Parser;
use lift_analytics::AnalysisPipeline;
use lift_core::{AppConfig, InvalidRowPolicy};
use lift_reporting::ReportRenderer;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "campaign-lift")]
#[command(about = "Campaign efficiency and brand-lift effectiveness metrics")]
#[command(version)]
struct Cli {
    /// Historic campaign data CSV (overrides config)
    #[arg(long, env = "CAMPAIGN_LIFT__HISTORIC_PATH")]
    historic: Option<String>,

    /// Brand lift study results CSV (overrides config)
    #[arg(long, env = "CAMPAIGN_LIFT__BRAND_LIFT_PATH")]
    brand_lift: Option<String>,

    /// Creative performance report CSV (overrides config)
    #[arg(long, env = "CAMPAIGN_LIFT__CREATIVE_PATH")]
    creative: Option<String>,

    /// Skip brand-lift rows that fail integrity checks instead of aborting
    #[arg(long, default_value_t = false)]
    skip_invalid: bool,

    /// Emit the report as JSON instead of text tables
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_lift=info,lift_analytics=info,lift_ingest=info".into()),
        )
        .init();

    let cli = Cli::parse();

    info!("Campaign Lift starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(path) = cli.historic {
        config.historic_path = path;
    }
    if let Some(path) = cli.brand_lift {
        config.brand_lift_path = path;
    }
    if let Some(path) = cli.creative {
        config.creative_path = path;
    }
    if cli.skip_invalid {
        config.on_invalid_row = InvalidRowPolicy::Skip;
    }

    info!(
        historic = %config.historic_path,
        brand_lift = %config.brand_lift_path,
        creative = %config.creative_path,
        "Configuration loaded"
    );

    let historic = lift_ingest::load_historic(&config.historic_path)?;
    let lift_rows = lift_ingest::load_brand_lift(&config.brand_lift_path)?;
    let creative = lift_ingest::load_creative(&config.creative_path)?;
    if let (Some(first), Some(last)) = (
        creative.iter().map(|r| r.report_date).min(),
        creative.iter().map(|r| r.report_date).max(),
    ) {
        info!(rows = creative.len(), from = %first, to = %last, "Creative performance report covers");
    }

    let report = AnalysisPipeline::from_config(&config).run(&historic, &lift_rows)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", ReportRenderer::new().render(&report));
    }

    Ok(())
}
