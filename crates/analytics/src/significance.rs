//! One-sided two-proportion z-test over brand-lift survey counts.

use lift_core::types::{BrandLiftRecord, SignificanceRow};
use lift_core::{LiftError, LiftResult, SIGNIFICANCE_ALPHA};

/// Classifies each brand-lift record by whether the exposed group's
/// consideration rate is significantly larger than the control group's.
pub struct SignificanceTester {
    alpha: f64,
}

impl SignificanceTester {
    pub fn new() -> Self {
        Self {
            alpha: SIGNIFICANCE_ALPHA,
        }
    }

    /// Same test with a caller-chosen decision threshold.
    pub fn with_alpha(alpha: f64) -> Self {
        Self { alpha }
    }

    /// Runs the z-test on one record. Successes are the consideration
    /// counts, trials the response counts, alternative hypothesis
    /// "exposed proportion is larger". Fails on zero trials or a success
    /// count above its trial count; those are never coerced.
    pub fn test_record(&self, record: &BrandLiftRecord) -> LiftResult<SignificanceRow> {
        let p_value = two_proportion_z_larger(
            [record.exposed_consideration, record.control_consideration],
            [record.exposed_responses, record.control_responses],
        )?;
        Ok(SignificanceRow {
            campaign_name: record.campaign_name.clone(),
            market: record.market.clone(),
            channel: record.channel.clone(),
            relative_lift: record.relative_lift,
            p_value,
            significant: p_value < self.alpha,
        })
    }
}

impl Default for SignificanceTester {
    fn default() -> Self {
        Self::new()
    }
}

/// One-sided two-proportion z-test with pooled variance; alternative
/// hypothesis: the first proportion is larger. Returns a p-value in
/// [0, 1].
///
/// When the pooled rate is 0 or 1 both observed proportions are equal
/// and the variance degenerates to zero; that carries no evidence of a
/// difference, so the p-value is 1.
pub fn two_proportion_z_larger(successes: [u64; 2], trials: [u64; 2]) -> LiftResult<f64> {
    for group in 0..2 {
        if trials[group] == 0 {
            return Err(LiftError::InvalidInput(format!(
                "trial count for group {group} is zero"
            )));
        }
        if successes[group] > trials[group] {
            return Err(LiftError::InvalidInput(format!(
                "success count {} exceeds trial count {} for group {group}",
                successes[group], trials[group]
            )));
        }
    }

    let n1 = trials[0] as f64;
    let n2 = trials[1] as f64;
    let p1 = successes[0] as f64 / n1;
    let p2 = successes[1] as f64 / n2;
    let pooled = (successes[0] + successes[1]) as f64 / (n1 + n2);
    let variance = pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2);
    if variance == 0.0 {
        return Ok(1.0);
    }

    let z = (p1 - p2) / variance.sqrt();
    Ok(normal_sf(z).clamp(0.0, 1.0))
}

/// Standard normal survival function: 1 − Φ(z).
fn normal_sf(z: f64) -> f64 {
    0.5 * libm::erfc(z * std::f64::consts::FRAC_1_SQRT_2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        exposed_consideration: u64,
        control_consideration: u64,
        exposed_responses: u64,
        control_responses: u64,
    ) -> BrandLiftRecord {
        BrandLiftRecord {
            campaign_name: "Spring".to_string(),
            market: "UK".to_string(),
            channel: "Search".to_string(),
            exposed_rate: 0.0,
            control_rate: 0.0,
            exposed_consideration,
            control_consideration,
            exposed_responses,
            control_responses,
            relative_lift: 0.0,
        }
    }

    #[test]
    fn test_clear_lift_is_significant() {
        // 120/500 = 0.24 against 80/500 = 0.16.
        let row = SignificanceTester::new()
            .test_record(&record(120, 80, 500, 500))
            .unwrap();
        assert!(row.p_value < 0.05);
        assert!(row.significant);
        assert!((row.p_value - 0.000783).abs() < 1e-4);
    }

    #[test]
    fn test_equal_rates_give_half() {
        let p = two_proportion_z_larger([50, 50], [500, 500]).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_lower_exposed_rate_is_not_significant() {
        let row = SignificanceTester::new()
            .test_record(&record(60, 80, 500, 500))
            .unwrap();
        assert!(row.p_value > 0.5);
        assert!(!row.significant);
    }

    #[test]
    fn test_p_value_in_unit_interval() {
        for (successes, trials) in [
            ([0u64, 10], [100u64, 100]),
            ([100, 0], [100, 100]),
            ([1, 1], [2, 1000]),
            ([499, 1], [500, 500]),
        ] {
            let p = two_proportion_z_larger(successes, trials).unwrap();
            assert!((0.0..=1.0).contains(&p), "p={p} out of range");
        }
    }

    #[test]
    fn test_degenerate_variance_gives_one() {
        assert_eq!(two_proportion_z_larger([0, 0], [500, 500]).unwrap(), 1.0);
        assert_eq!(
            two_proportion_z_larger([500, 500], [500, 500]).unwrap(),
            1.0
        );
    }

    #[test]
    fn test_zero_trials_rejected() {
        assert!(two_proportion_z_larger([0, 10], [0, 100]).is_err());
        assert!(two_proportion_z_larger([10, 0], [100, 0]).is_err());
    }

    #[test]
    fn test_successes_above_trials_rejected() {
        assert!(two_proportion_z_larger([101, 10], [100, 100]).is_err());
    }

    #[test]
    fn test_significant_tracks_threshold_exactly() {
        let tester = SignificanceTester::with_alpha(0.5);
        // Equal rates give exactly p = 0.5, which is not below 0.5.
        let row = tester.test_record(&record(50, 50, 500, 500)).unwrap();
        assert!(!row.significant);
    }
}
