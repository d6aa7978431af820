pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, InvalidRowPolicy};
pub use error::{LiftError, LiftResult};

/// Fixed p-value threshold for calling a brand-lift result significant.
/// Callers may pass a different alpha to the tester; the algorithm itself
/// never reads anything else.
pub const SIGNIFICANCE_ALPHA: f64 = 0.05;
