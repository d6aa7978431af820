//! Grouped aggregation — sums the additive measures of campaign history
//! per distinct grouping-key combination.

use std::collections::BTreeMap;

use lift_core::types::CampaignRecord;
use lift_core::{LiftError, LiftResult};
use serde::{Deserialize, Serialize};

/// A categorical attribute of [`CampaignRecord`] usable as a grouping key
/// component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupDimension {
    CampaignName,
    Market,
    Channel,
}

impl GroupDimension {
    fn extract<'a>(&self, record: &'a CampaignRecord) -> &'a str {
        match self {
            GroupDimension::CampaignName => &record.campaign_name,
            GroupDimension::Market => &record.market,
            GroupDimension::Channel => &record.channel,
        }
    }
}

/// Key values for one aggregated group, in the order the dimensions were
/// requested.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey(pub Vec<String>);

/// Summed measures for one grouping-key combination. All three measures
/// are additive, so a finer-grained aggregation always sums up to the
/// coarser one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTotals {
    pub key: GroupKey,
    pub spend_usd: f64,
    pub conversions: u64,
    pub reach: u64,
}

pub struct Aggregator;

impl Aggregator {
    /// Groups `records` by the given dimensions and sums spend,
    /// conversions, and reach per distinct key-value combination.
    ///
    /// Only combinations actually present in the input appear in the
    /// output (no synthesized zero rows), and the output is sorted by key
    /// values, so the result does not depend on input row order. An
    /// empty or repeating dimension list is a malformed grouping key.
    pub fn aggregate(
        records: &[CampaignRecord],
        dimensions: &[GroupDimension],
    ) -> LiftResult<Vec<AggregatedTotals>> {
        if dimensions.is_empty() {
            return Err(LiftError::InvalidInput(
                "grouping key must name at least one dimension".to_string(),
            ));
        }
        for (i, dim) in dimensions.iter().enumerate() {
            if dimensions[..i].contains(dim) {
                return Err(LiftError::InvalidInput(format!(
                    "grouping key repeats dimension {dim:?}"
                )));
            }
        }

        let mut groups: BTreeMap<Vec<String>, (Vec<f64>, u64, u64)> = BTreeMap::new();
        for record in records {
            let key: Vec<String> = dimensions
                .iter()
                .map(|dim| dim.extract(record).to_string())
                .collect();
            let entry = groups.entry(key).or_insert_with(|| (Vec::new(), 0, 0));
            entry.0.push(record.spend_usd);
            entry.1 += record.conversions;
            entry.2 += record.reach;
        }

        Ok(groups
            .into_iter()
            .map(|(values, (mut spends, conversions, reach))| {
                // Spend contributions are summed in value order so the
                // float total is identical for any input row order.
                spends.sort_by(f64::total_cmp);
                AggregatedTotals {
                    key: GroupKey(values),
                    spend_usd: spends.iter().sum(),
                    conversions,
                    reach,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(campaign: &str, market: &str, channel: &str, spend: f64, conv: u64, reach: u64) -> CampaignRecord {
        CampaignRecord {
            campaign_name: campaign.to_string(),
            market: market.to_string(),
            channel: channel.to_string(),
            week_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            spend_usd: spend,
            conversions: conv,
            reach,
        }
    }

    #[test]
    fn test_one_row_per_distinct_combination() {
        let records = vec![
            record("Spring", "UK", "Search", 100.0, 10, 1000),
            record("Spring", "UK", "Search", 50.0, 5, 500),
            record("Spring", "DE", "Search", 70.0, 7, 700),
        ];

        let totals = Aggregator::aggregate(&records, &[GroupDimension::Market]).unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].key.0, vec!["DE".to_string()]);
        assert_eq!(totals[0].spend_usd, 70.0);
        assert_eq!(totals[1].key.0, vec!["UK".to_string()]);
        assert_eq!(totals[1].spend_usd, 150.0);
        assert_eq!(totals[1].conversions, 15);
        assert_eq!(totals[1].reach, 1500);
    }

    #[test]
    fn test_no_zero_rows_for_absent_combinations() {
        // UK/Social never occurs, so no UK/Social row may be fabricated.
        let records = vec![
            record("Spring", "UK", "Search", 100.0, 10, 1000),
            record("Spring", "DE", "Social", 80.0, 8, 800),
        ];

        let totals =
            Aggregator::aggregate(&records, &[GroupDimension::Market, GroupDimension::Channel])
                .unwrap();
        assert_eq!(totals.len(), 2);
        assert!(totals
            .iter()
            .all(|t| t.key.0 != vec!["UK".to_string(), "Social".to_string()]));
    }

    #[test]
    fn test_superset_key_never_merges_differing_rows() {
        let records = vec![
            record("Spring", "UK", "Search", 100.0, 10, 1000),
            record("Spring", "UK", "Social", 50.0, 5, 500),
        ];

        let totals =
            Aggregator::aggregate(&records, &[GroupDimension::Market, GroupDimension::Channel])
                .unwrap();
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn test_additivity_across_key_granularity() {
        let records = vec![
            record("Spring", "UK", "Search", 100.25, 10, 1000),
            record("Spring", "UK", "Social", 50.5, 5, 500),
            record("Summer", "UK", "Search", 25.25, 2, 200),
            record("Summer", "DE", "Search", 60.0, 6, 600),
        ];

        let by_market = Aggregator::aggregate(&records, &[GroupDimension::Market]).unwrap();
        let by_market_channel =
            Aggregator::aggregate(&records, &[GroupDimension::Market, GroupDimension::Channel])
                .unwrap();

        for market_row in &by_market {
            let market = &market_row.key.0[0];
            let finer_sum: f64 = by_market_channel
                .iter()
                .filter(|t| &t.key.0[0] == market)
                .map(|t| t.spend_usd)
                .sum();
            assert_eq!(market_row.spend_usd, finer_sum);
        }
    }

    #[test]
    fn test_input_order_does_not_change_output() {
        let mut records = vec![
            record("Spring", "UK", "Search", 0.1, 1, 10),
            record("Spring", "UK", "Search", 0.2, 2, 20),
            record("Spring", "UK", "Search", 0.3, 3, 30),
            record("Spring", "DE", "Search", 9.9, 9, 90),
        ];

        let forward = Aggregator::aggregate(&records, &[GroupDimension::Market]).unwrap();
        records.reverse();
        let backward = Aggregator::aggregate(&records, &[GroupDimension::Market]).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_empty_grouping_key_rejected() {
        let records = vec![record("Spring", "UK", "Search", 1.0, 1, 1)];
        assert!(Aggregator::aggregate(&records, &[]).is_err());
    }

    #[test]
    fn test_repeated_dimension_rejected() {
        let records = vec![record("Spring", "UK", "Search", 1.0, 1, 1)];
        let result =
            Aggregator::aggregate(&records, &[GroupDimension::Market, GroupDimension::Market]);
        assert!(result.is_err());
    }
}
