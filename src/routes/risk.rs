use axum::{Json, extract::rejection::JsonRejection};
use opentelemetry::KeyValue;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::risk::{RiskAssessment, classify};
use crate::telemetry::metrics::RISK_ASSESSMENTS;

#[derive(Debug, Deserialize)]
pub struct RiskBody {
    pub temperature_anomaly: f64,
    pub rainfall_mm: f64,
}

pub async fn assess_risk(
    payload: Result<Json<RiskBody>, JsonRejection>,
) -> AppResult<Json<RiskAssessment>> {
    let Json(body) = payload?;
    if !body.temperature_anomaly.is_finite() {
        return Err(AppError::Validation(
            "temperature_anomaly must be a finite number".into(),
        ));
    }
    if !body.rainfall_mm.is_finite() {
        return Err(AppError::Validation(
            "rainfall_mm must be a finite number".into(),
        ));
    }

    let risk = classify(body.temperature_anomaly, body.rainfall_mm);

    RISK_ASSESSMENTS.add(1, &[KeyValue::new("risk.epidemic", risk.epidemic)]);
    tracing::info!(
        temperature_code = risk.temperature_code,
        rainfall_code = risk.rainfall_code,
        risk_percent = risk.risk_percent,
        epidemic = risk.epidemic,
        "Risk assessed"
    );

    Ok(Json(risk))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_body_deserialize() {
        let body: RiskBody =
            serde_json::from_str(r#"{"temperature_anomaly": 2.0, "rainfall_mm": 293.2}"#).unwrap();
        assert_eq!(body.temperature_anomaly, 2.0);
        assert_eq!(body.rainfall_mm, 293.2);
    }

    #[test]
    fn test_risk_body_requires_both_fields() {
        let result = serde_json::from_str::<RiskBody>(r#"{"temperature_anomaly": 2.0}"#);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_assess_risk_rejects_non_finite() {
        let result = assess_risk(Ok(Json(RiskBody {
            temperature_anomaly: f64::NAN,
            rainfall_mm: 10.0,
        })))
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_assess_risk_allows_negative_anomaly() {
        let Json(risk) = assess_risk(Ok(Json(RiskBody {
            temperature_anomaly: -1.0,
            rainfall_mm: 120.0,
        })))
        .await
        .unwrap();
        assert_eq!(risk.temperature_code, -2);
        assert_eq!(risk.rainfall_code, 2);
        assert_eq!(risk.risk_percent, 0);
    }
}
