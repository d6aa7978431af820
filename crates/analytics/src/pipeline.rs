//! End-to-end derivation pipeline: aggregate → join → metrics →
//! significance → rank. Each stage consumes immutable input and produces
//! a new table; nothing is mutated after creation.

use chrono::Utc;
use lift_core::config::InvalidRowPolicy;
use lift_core::types::{
    AnalysisReport, BrandLiftRecord, CampaignRecord, DataQualitySummary, SpendByMarketRow,
};
use lift_core::{AppConfig, LiftResult};
use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregate::{Aggregator, GroupDimension};
use crate::join::JoinEngine;
use crate::metrics::MetricsEngine;
use crate::rank::Ranker;
use crate::significance::SignificanceTester;

pub struct AnalysisPipeline {
    tester: SignificanceTester,
    on_invalid_row: InvalidRowPolicy,
}

impl AnalysisPipeline {
    pub fn new() -> Self {
        Self {
            tester: SignificanceTester::new(),
            on_invalid_row: InvalidRowPolicy::Abort,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            tester: SignificanceTester::with_alpha(config.significance_alpha),
            on_invalid_row: config.on_invalid_row,
        }
    }

    /// Derives every report table from the two source tables in one pass.
    ///
    /// Data-quality conditions (undefined metrics, dropped join rows, an
    /// empty join) are flagged in the summary and never abort the run.
    /// A brand-lift row that fails the tester's integrity checks aborts
    /// or is skipped per the configured policy.
    pub fn run(
        &self,
        historic: &[CampaignRecord],
        lift: &[BrandLiftRecord],
    ) -> LiftResult<AnalysisReport> {
        let mut quality = DataQualitySummary::default();

        let spend_by_market: Vec<SpendByMarketRow> =
            Aggregator::aggregate(historic, &[GroupDimension::Market])?
                .into_iter()
                .map(|totals| SpendByMarketRow {
                    market: totals.key.0.into_iter().next().unwrap_or_default(),
                    spend_usd: totals.spend_usd,
                })
                .collect();

        let cpa_totals = Aggregator::aggregate(
            historic,
            &[GroupDimension::Market, GroupDimension::Channel],
        )?;
        let (cpa_defined, cpa_undefined): (Vec<_>, Vec<_>) =
            MetricsEngine::cpa_by_market_channel(&cpa_totals)?
                .into_iter()
                .partition(|entry| entry.cpa.is_defined());
        quality.undefined_cpa_rows = cpa_undefined.len();
        if !cpa_undefined.is_empty() {
            warn!(
                rows = cpa_undefined.len(),
                "CPA undefined for zero-conversion cells"
            );
        }

        let historic_totals = Aggregator::aggregate(
            historic,
            &[
                GroupDimension::CampaignName,
                GroupDimension::Market,
                GroupDimension::Channel,
            ],
        )?;
        let join = JoinEngine::join(&historic_totals, lift)?;
        quality.dropped_lift_rows = join.dropped_lift_rows;
        quality.dropped_historic_keys = join.dropped_historic_keys;
        quality.join_empty = join.rows.is_empty();

        let (cplu_defined, cplu_undefined): (Vec<_>, Vec<_>) = MetricsEngine::cplu(&join.rows)
            .into_iter()
            .partition(|entry| entry.cplu.is_defined());
        quality.undefined_cplu_rows = cplu_undefined.len();
        if !cplu_undefined.is_empty() {
            warn!(
                rows = cplu_undefined.len(),
                "CPLU undefined for non-positive lifted users"
            );
        }

        let mut significance = Vec::with_capacity(lift.len());
        for record in lift {
            match self.tester.test_record(record) {
                Ok(row) => significance.push(row),
                Err(err) => match self.on_invalid_row {
                    InvalidRowPolicy::Abort => return Err(err),
                    InvalidRowPolicy::Skip => {
                        quality.skipped_significance_rows += 1;
                        warn!(
                            campaign = %record.campaign_name,
                            market = %record.market,
                            channel = %record.channel,
                            error = %err,
                            "Skipping brand-lift row that failed integrity checks"
                        );
                    }
                },
            }
        }

        let report = AnalysisReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            spend_by_market,
            cpa: Ranker::rank_cpa(cpa_defined),
            cpa_undefined,
            cplu: Ranker::rank_cplu(cplu_defined),
            cplu_undefined,
            significance: Ranker::rank_significance(significance),
            quality,
        };

        info!(
            run_id = %report.run_id,
            cpa_rows = report.cpa.len(),
            cplu_rows = report.cplu.len(),
            significance_rows = report.significance.len(),
            dropped_lift_rows = report.quality.dropped_lift_rows,
            dropped_historic_keys = report.quality.dropped_historic_keys,
            "Analysis pipeline complete"
        );
        Ok(report)
    }
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn campaign(name: &str, market: &str, channel: &str, spend: f64, conv: u64, reach: u64) -> CampaignRecord {
        CampaignRecord {
            campaign_name: name.to_string(),
            market: market.to_string(),
            channel: channel.to_string(),
            week_start: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            spend_usd: spend,
            conversions: conv,
            reach,
        }
    }

    fn lift(name: &str, market: &str, channel: &str, exposed: u64, control: u64, trials: u64) -> BrandLiftRecord {
        BrandLiftRecord {
            campaign_name: name.to_string(),
            market: market.to_string(),
            channel: channel.to_string(),
            exposed_rate: exposed as f64 / trials as f64,
            control_rate: control as f64 / trials as f64,
            exposed_consideration: exposed,
            control_consideration: control,
            exposed_responses: trials,
            control_responses: trials,
            relative_lift: (exposed as f64 - control as f64) / control as f64,
        }
    }

    #[test]
    fn test_abort_policy_fails_on_invalid_lift_row() {
        let historic = vec![campaign("Spring", "UK", "Search", 100.0, 10, 1000)];
        let mut bad = lift("Spring", "UK", "Search", 120, 80, 500);
        bad.exposed_responses = 0;

        assert!(AnalysisPipeline::new().run(&historic, &[bad]).is_err());
    }

    #[test]
    fn test_skip_policy_counts_invalid_rows() {
        let historic = vec![campaign("Spring", "UK", "Search", 100.0, 10, 1000)];
        let good = lift("Spring", "UK", "Search", 120, 80, 500);
        let mut bad = good.clone();
        bad.exposed_responses = 0;

        let config = AppConfig {
            on_invalid_row: InvalidRowPolicy::Skip,
            ..AppConfig::default()
        };
        let report = AnalysisPipeline::from_config(&config)
            .run(&historic, &[good, bad])
            .unwrap();
        assert_eq!(report.significance.len(), 1);
        assert_eq!(report.quality.skipped_significance_rows, 1);
    }

    #[test]
    fn test_empty_join_is_flagged_not_fatal() {
        let historic = vec![campaign("Spring", "UK", "Search", 100.0, 10, 1000)];
        let lift_rows = vec![lift("Autumn", "FR", "Social", 120, 80, 500)];

        let report = AnalysisPipeline::new().run(&historic, &lift_rows).unwrap();
        assert!(report.quality.join_empty);
        assert!(report.cplu.is_empty());
        assert_eq!(report.quality.dropped_lift_rows, 1);
        assert_eq!(report.quality.dropped_historic_keys, 1);
    }
}
