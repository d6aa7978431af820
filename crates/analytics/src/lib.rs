//! Campaign efficiency and brand-lift effectiveness analytics — grouped
//! aggregation, historic/lift joining, CPA/CPLU derivation, significance
//! testing, and presentation ranking.

pub mod aggregate;
pub mod join;
pub mod metrics;
pub mod pipeline;
pub mod rank;
pub mod significance;

pub use aggregate::{AggregatedTotals, Aggregator, GroupDimension, GroupKey};
pub use join::{JoinEngine, JoinOutcome, JoinedRow};
pub use metrics::MetricsEngine;
pub use pipeline::AnalysisPipeline;
pub use rank::Ranker;
pub use significance::SignificanceTester;
