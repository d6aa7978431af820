//! Keyed inner join between aggregated historic totals and brand-lift
//! study rows.

use std::collections::HashMap;

use lift_core::types::BrandLiftRecord;
use lift_core::{LiftError, LiftResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::aggregate::AggregatedTotals;

/// One brand-lift row merged with its matching spend/reach totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub campaign_name: String,
    pub market: String,
    pub channel: String,
    pub spend_usd: f64,
    pub reach: u64,
    pub exposed_rate: f64,
    pub control_rate: f64,
}

/// Join result plus the dropped-row counts that keep the data loss
/// observable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinOutcome {
    pub rows: Vec<JoinedRow>,
    /// Brand-lift rows whose key had no historic counterpart.
    pub dropped_lift_rows: usize,
    /// Historic keys no brand-lift row referenced.
    pub dropped_historic_keys: usize,
}

pub struct JoinEngine;

impl JoinEngine {
    /// Inner join on the exact, case-sensitive (campaign, market, channel)
    /// triple. `historic` must be aggregated by that triple. Rows come out
    /// in brand-lift input order; unmatched rows on either side are
    /// dropped and counted, never errored. A zero-row result is a
    /// data-quality condition and is logged, not failed.
    pub fn join(
        historic: &[AggregatedTotals],
        lift: &[BrandLiftRecord],
    ) -> LiftResult<JoinOutcome> {
        let mut by_key: HashMap<(&str, &str, &str), (&AggregatedTotals, bool)> =
            HashMap::with_capacity(historic.len());
        for totals in historic {
            let [campaign, market, channel] = totals.key.0.as_slice() else {
                return Err(LiftError::InvalidInput(format!(
                    "historic totals key {:?} is not a (campaign, market, channel) triple",
                    totals.key.0
                )));
            };
            by_key.insert(
                (campaign.as_str(), market.as_str(), channel.as_str()),
                (totals, false),
            );
        }

        let mut rows = Vec::new();
        let mut dropped_lift_rows = 0usize;
        for record in lift {
            let key = (
                record.campaign_name.as_str(),
                record.market.as_str(),
                record.channel.as_str(),
            );
            match by_key.get_mut(&key) {
                Some((totals, matched)) => {
                    *matched = true;
                    rows.push(JoinedRow {
                        campaign_name: record.campaign_name.clone(),
                        market: record.market.clone(),
                        channel: record.channel.clone(),
                        spend_usd: totals.spend_usd,
                        reach: totals.reach,
                        exposed_rate: record.exposed_rate,
                        control_rate: record.control_rate,
                    });
                }
                None => dropped_lift_rows += 1,
            }
        }

        let dropped_historic_keys = by_key.values().filter(|(_, matched)| !matched).count();

        if !rows.is_empty() && (dropped_lift_rows > 0 || dropped_historic_keys > 0) {
            warn!(
                dropped_lift_rows,
                dropped_historic_keys, "Inner join dropped unmatched rows"
            );
        }
        if rows.is_empty() && (!lift.is_empty() || !historic.is_empty()) {
            warn!(
                lift_rows = lift.len(),
                historic_keys = historic.len(),
                "Historic/lift join produced zero rows; no key matched on both sides"
            );
        }

        Ok(JoinOutcome {
            rows,
            dropped_lift_rows,
            dropped_historic_keys,
        })
    }
}
