//! Domain types — source table records, derived metric entries, and the
//! report tables handed to reporting/visualization consumers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Source Tables ───────────────────────────────────────────────────

/// One week of historic spend/conversion data for a campaign in a
/// market/channel cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub campaign_name: String,
    pub market: String,
    pub channel: String,
    pub week_start: NaiveDate,
    pub spend_usd: f64,
    pub conversions: u64,
    pub reach: u64,
}

/// One brand-lift study result: consideration rates and survey counts for
/// the ad-exposed group and the unexposed control group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandLiftRecord {
    pub campaign_name: String,
    pub market: String,
    pub channel: String,
    pub exposed_rate: f64,
    pub control_rate: f64,
    pub exposed_consideration: u64,
    pub control_consideration: u64,
    pub exposed_responses: u64,
    pub control_responses: u64,
    pub relative_lift: f64,
}

/// One row of the creative performance report. Ingested and validated;
/// no metrics are derived from it yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeRecord {
    pub creative_name: String,
    pub campaign_name: String,
    pub channel: String,
    pub report_date: NaiveDate,
    pub impressions: u64,
    pub clicks: u64,
}

// ─── Metric Values ───────────────────────────────────────────────────

/// A derived ratio metric. Division by a zero or non-positive denominator
/// yields `Undefined` with the reason; it is never collapsed to 0 or ±inf.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    Defined(f64),
    Undefined(UndefinedReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    /// CPA denominator was zero.
    ZeroConversions,
    /// Lifted users came out zero or negative, so cost per lifted user
    /// has no meaningful (non-negative) value.
    NonPositiveLiftedUsers,
}

impl MetricValue {
    pub fn is_defined(&self) -> bool {
        matches!(self, MetricValue::Defined(_))
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Defined(v) => Some(*v),
            MetricValue::Undefined(_) => None,
        }
    }
}

// ─── Output Tables ───────────────────────────────────────────────────

/// Total historic spend for one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendByMarketRow {
    pub market: String,
    pub spend_usd: f64,
}

/// Cost-per-acquisition for one (market, channel) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpaEntry {
    pub market: String,
    pub channel: String,
    pub spend_usd: f64,
    pub conversions: u64,
    pub cpa: MetricValue,
}

/// Cost-per-lifted-user for one (campaign, market, channel) triple that
/// matched in both the historic totals and the brand-lift table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpluEntry {
    pub campaign_name: String,
    pub market: String,
    pub channel: String,
    pub spend_usd: f64,
    pub reach: u64,
    pub exposed_rate: f64,
    pub control_rate: f64,
    pub absolute_lift: f64,
    pub lifted_users: f64,
    pub cplu: MetricValue,
}

/// Significance call for one brand-lift record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceRow {
    pub campaign_name: String,
    pub market: String,
    pub channel: String,
    pub relative_lift: f64,
    pub p_value: f64,
    pub significant: bool,
}

/// Counts for every locally-recovered data-quality condition, so dropped
/// or flagged rows stay observable to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQualitySummary {
    /// Brand-lift rows with no matching historic totals key.
    pub dropped_lift_rows: usize,
    /// Historic totals keys with no matching brand-lift row.
    pub dropped_historic_keys: usize,
    /// The historic/lift join produced zero rows.
    pub join_empty: bool,
    pub undefined_cpa_rows: usize,
    pub undefined_cplu_rows: usize,
    /// Brand-lift rows skipped by the invalid-row policy during
    /// significance testing.
    pub skipped_significance_rows: usize,
}

/// Everything one pipeline run derives. All tables are sorted for
/// presentation; undefined metric rows are reported separately from the
/// ranked tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub spend_by_market: Vec<SpendByMarketRow>,
    /// Ascending by CPA.
    pub cpa: Vec<CpaEntry>,
    pub cpa_undefined: Vec<CpaEntry>,
    /// Ascending by CPLU.
    pub cplu: Vec<CpluEntry>,
    pub cplu_undefined: Vec<CpluEntry>,
    /// Descending by relative lift.
    pub significance: Vec<SignificanceRow>,
    pub quality: DataQualitySummary,
}
