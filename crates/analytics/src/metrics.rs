//! CPA and CPLU derivation. Ratio metrics with a zero or non-positive
//! denominator are flagged undefined, never coerced to 0 or ±inf.

use lift_core::types::{CpaEntry, CpluEntry, MetricValue, UndefinedReason};
use lift_core::{LiftError, LiftResult};

use crate::aggregate::AggregatedTotals;
use crate::join::JoinedRow;

pub struct MetricsEngine;

impl MetricsEngine {
    /// Cost per acquisition for each (market, channel) totals row.
    /// CPA is undefined when the cell converted nobody.
    pub fn cpa_by_market_channel(totals: &[AggregatedTotals]) -> LiftResult<Vec<CpaEntry>> {
        totals
            .iter()
            .map(|row| {
                let [market, channel] = row.key.0.as_slice() else {
                    return Err(LiftError::InvalidInput(format!(
                        "CPA totals key {:?} is not a (market, channel) pair",
                        row.key.0
                    )));
                };
                let cpa = if row.conversions == 0 {
                    MetricValue::Undefined(UndefinedReason::ZeroConversions)
                } else {
                    MetricValue::Defined(row.spend_usd / row.conversions as f64)
                };
                Ok(CpaEntry {
                    market: market.clone(),
                    channel: channel.clone(),
                    spend_usd: row.spend_usd,
                    conversions: row.conversions,
                    cpa,
                })
            })
            .collect()
    }

    /// Absolute lift, lifted users, and cost per lifted user for each
    /// joined historic/lift row. A campaign that lifted nobody (or
    /// depressed consideration) has no meaningful cost per lifted user,
    /// so the metric is flagged rather than reported as a low or
    /// negative cost.
    pub fn cplu(rows: &[JoinedRow]) -> Vec<CpluEntry> {
        rows.iter()
            .map(|row| {
                let absolute_lift = row.exposed_rate - row.control_rate;
                let lifted_users = row.reach as f64 * absolute_lift;
                let cplu = if lifted_users > 0.0 {
                    MetricValue::Defined(row.spend_usd / lifted_users)
                } else {
                    MetricValue::Undefined(UndefinedReason::NonPositiveLiftedUsers)
                };
                CpluEntry {
                    campaign_name: row.campaign_name.clone(),
                    market: row.market.clone(),
                    channel: row.channel.clone(),
                    spend_usd: row.spend_usd,
                    reach: row.reach,
                    exposed_rate: row.exposed_rate,
                    control_rate: row.control_rate,
                    absolute_lift,
                    lifted_users,
                    cplu,
                }
            })
            .collect()
    }
}
