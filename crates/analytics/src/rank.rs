//! Stable presentation ordering for the derived tables. Equal-key rows
//! keep their relative input order so fixtures reproduce exactly.

use lift_core::types::{CpaEntry, CpluEntry, MetricValue, SignificanceRow};

pub struct Ranker;

impl Ranker {
    /// Ascending by CPA. The pipeline strips undefined rows before
    /// ranking; any residual undefined value sorts last.
    pub fn rank_cpa(mut entries: Vec<CpaEntry>) -> Vec<CpaEntry> {
        entries.sort_by(|a, b| sort_key(&a.cpa).total_cmp(&sort_key(&b.cpa)));
        entries
    }

    /// Ascending by CPLU.
    pub fn rank_cplu(mut entries: Vec<CpluEntry>) -> Vec<CpluEntry> {
        entries.sort_by(|a, b| sort_key(&a.cplu).total_cmp(&sort_key(&b.cplu)));
        entries
    }

    /// Descending by relative lift.
    pub fn rank_significance(mut rows: Vec<SignificanceRow>) -> Vec<SignificanceRow> {
        rows.sort_by(|a, b| b.relative_lift.total_cmp(&a.relative_lift));
        rows
    }
}

fn sort_key(value: &MetricValue) -> f64 {
    value.value().unwrap_or(f64::INFINITY)
}
