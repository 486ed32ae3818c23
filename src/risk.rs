//! MoH/KEMRI malaria early warning model.
//!
//! Maximum-temperature anomaly and monthly rainfall are each bucketed into a
//! capped integer code; the sum of the two codes, times ten, is the epidemic
//! risk percentage. At or above [`EPIDEMIC_THRESHOLD_PERCENT`] the district is
//! flagged as epidemic.

use serde::{Deserialize, Serialize};

pub const TEMPERATURE_STEP: f64 = 0.5;
pub const RAINFALL_STEP_MM: f64 = 50.0;
pub const TEMPERATURE_CODE_MAX: i32 = 5;
pub const RAINFALL_CODE_MAX: i32 = 6;
pub const EPIDEMIC_THRESHOLD_PERCENT: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub temperature_code: i32,
    pub rainfall_code: i32,
    pub risk_percent: i64,
    pub epidemic: bool,
    pub threshold: i64,
}

impl RiskAssessment {
    /// One-line summary embedded into logistics prompts.
    pub fn summary_line(&self) -> String {
        format!(
            "Malaria Risk: {}% | Epidemic: {}",
            self.risk_percent, self.epidemic
        )
    }
}

/// Scores a temperature anomaly (degrees C) and rainfall (mm).
///
/// Total over `f64`: negative inputs produce negative codes, NaN scores as
/// code 0 and infinities saturate.
pub fn classify(temperature_anomaly: f64, rainfall_mm: f64) -> RiskAssessment {
    let temperature_code =
        floored_steps(temperature_anomaly, TEMPERATURE_STEP).min(TEMPERATURE_CODE_MAX);
    let rainfall_code = floored_steps(rainfall_mm, RAINFALL_STEP_MM).min(RAINFALL_CODE_MAX);
    let risk_percent = (i64::from(temperature_code) + i64::from(rainfall_code)) * 10;

    RiskAssessment {
        temperature_code,
        rainfall_code,
        risk_percent,
        epidemic: risk_percent >= EPIDEMIC_THRESHOLD_PERCENT,
        threshold: EPIDEMIC_THRESHOLD_PERCENT,
    }
}

/// Floored quotient `value // step` for a positive step.
///
/// Subtracting the euclidean remainder first keeps values just below a
/// bucket edge in the lower bucket, where a plain `(value / step).floor()`
/// can round up.
fn floored_steps(value: f64, step: f64) -> i32 {
    if !value.is_finite() {
        return (value / step) as i32;
    }
    let remainder = value.rem_euclid(step);
    ((value - remainder) / step).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loima_june_surge() {
        let risk = classify(2.0, 293.2);
        assert_eq!(risk.temperature_code, 4);
        assert_eq!(risk.rainfall_code, 5);
        assert_eq!(risk.risk_percent, 90);
        assert!(risk.epidemic);
        assert_eq!(risk.threshold, 30);
    }

    #[test]
    fn test_dry_cool_month_is_quiet() {
        let risk = classify(0.4, 10.0);
        assert_eq!(risk.temperature_code, 0);
        assert_eq!(risk.rainfall_code, 0);
        assert_eq!(risk.risk_percent, 0);
        assert!(!risk.epidemic);
    }

    #[test]
    fn test_temperature_saturates() {
        let risk = classify(3.0, 0.0);
        assert_eq!(risk.temperature_code, 5);
        assert_eq!(risk.rainfall_code, 0);
        assert_eq!(risk.risk_percent, 50);
        assert!(risk.epidemic);
    }

    #[test]
    fn test_rainfall_saturates() {
        let risk = classify(0.0, 950.0);
        assert_eq!(risk.rainfall_code, 6);
        assert_eq!(risk.risk_percent, 60);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 1.0 -> code 2, 50mm -> code 1
        let at_threshold = classify(1.0, 50.0);
        assert_eq!(at_threshold.risk_percent, 30);
        assert!(at_threshold.epidemic);

        let below = classify(1.0, 49.9);
        assert_eq!(below.risk_percent, 20);
        assert!(!below.epidemic);
    }

    #[test]
    fn test_temperature_code_formula_and_monotonic() {
        let mut previous = i32::MIN;
        for i in 0..1000 {
            let t = f64::from(i) * 0.01;
            let code = classify(t, 0.0).temperature_code;
            let expected = ((t / 0.5).floor() as i32).min(5);
            assert_eq!(code, expected, "temperature {t}");
            assert!(code >= previous, "not monotonic at {t}");
            previous = code;
        }
    }

    #[test]
    fn test_rainfall_code_formula_and_monotonic() {
        let mut previous = i32::MIN;
        for i in 0..2000 {
            let r = f64::from(i) * 0.5;
            let code = classify(0.0, r).rainfall_code;
            let expected = ((r / 50.0).floor() as i32).min(6);
            assert_eq!(code, expected, "rainfall {r}");
            assert!(code >= previous, "not monotonic at {r}");
            previous = code;
        }
    }

    #[test]
    fn test_negative_inputs_floor_below_zero() {
        let risk = classify(-0.3, -10.0);
        assert_eq!(risk.temperature_code, -1);
        assert_eq!(risk.rainfall_code, -1);
        assert_eq!(risk.risk_percent, -20);
        assert!(!risk.epidemic);
    }

    #[test]
    fn test_non_finite_inputs_do_not_panic() {
        let nan = classify(f64::NAN, f64::NAN);
        assert_eq!(nan.temperature_code, 0);
        assert_eq!(nan.rainfall_code, 0);

        let hot = classify(f64::INFINITY, 0.0);
        assert_eq!(hot.temperature_code, 5);

        let cold = classify(f64::NEG_INFINITY, f64::NEG_INFINITY);
        assert_eq!(cold.temperature_code, i32::MIN);
        assert!(!cold.epidemic);
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            classify(2.0, 293.2).summary_line(),
            "Malaria Risk: 90% | Epidemic: true"
        );
    }
}
